//! Persistence round-trip guarantees for solved policy tables.

use std::path::Path;

use tempfile::TempDir;
use tictacslide::{
    adapters::{InMemoryRepository, MsgPackRepository},
    ports::PolicyRepository,
    Error, GameState, GameTreeSolver, PolicyTable,
};

fn full_table() -> PolicyTable {
    let (table, _) = GameTreeSolver::with_seed(101)
        .solve(GameState::new())
        .expect("full solve should succeed");
    table
}

#[test]
fn msgpack_roundtrip_preserves_every_entry() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("full.policy");

    let table = full_table();
    let repo = MsgPackRepository::new();

    repo.save(&table, &path).unwrap();
    let loaded = repo.load(&path).unwrap();

    assert_eq!(loaded.len(), table.len());
    for (key, decision) in table.iter() {
        assert_eq!(loaded.get(key), Some(decision));
    }
}

#[test]
fn in_memory_roundtrip_preserves_every_entry() {
    let table = full_table();
    let repo = InMemoryRepository::new();
    let path = Path::new("table");

    repo.save(&table, path).unwrap();
    let loaded = repo.load(path).unwrap();

    assert_eq!(loaded, table);
}

#[test]
fn loaded_table_answers_lookups_like_the_original() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("lookup.policy");

    let table = full_table();
    let repo = MsgPackRepository::new();
    repo.save(&table, &path).unwrap();
    let loaded = repo.load(&path).unwrap();

    let midgame = GameState::from_label("XX.OX..OO_X").unwrap();
    assert_eq!(
        loaded.lookup(&midgame).unwrap(),
        table.lookup(&midgame).unwrap()
    );
}

#[test]
fn absent_table_is_an_io_error() {
    let repo = MsgPackRepository::new();
    let err = repo
        .load(Path::new("/tmp/definitely_absent_9832.policy"))
        .unwrap_err();
    assert!(matches!(err, Error::Io { .. }));
}

#[test]
fn corrupt_table_is_a_serialization_error() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("corrupt.policy");
    std::fs::write(&path, b"\x00\x01garbage").unwrap();

    let repo = MsgPackRepository::new();
    let err = repo.load(&path).unwrap_err();
    assert!(matches!(err, Error::SerializationContext { .. }));
}
