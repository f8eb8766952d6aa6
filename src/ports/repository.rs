//! Repository port for policy table persistence.
//!
//! This module defines the trait boundary between the solver core and the
//! storage layer, so the expensive full traversal only ever runs when no
//! saved table exists.

use std::path::Path;

use crate::{policy::PolicyTable, Result};

/// Port for persisting and loading solved policy tables.
///
/// This trait abstracts the storage mechanism, allowing different
/// implementations (MessagePack, JSON, in-memory, etc.) without coupling the
/// solver to a serialization format. The only contract the core requires is
/// that round-tripping a table yields identical key-to-decision contents.
///
/// # Examples
///
/// ```no_run
/// use std::path::Path;
/// use tictacslide::ports::PolicyRepository;
/// use tictacslide::{GameState, GameTreeSolver, adapters::MsgPackRepository};
///
/// let repo = MsgPackRepository;
/// let (table, _) = GameTreeSolver::new().solve(GameState::new())?;
///
/// repo.save(&table, Path::new("tictacslide.policy"))?;
/// let loaded = repo.load(Path::new("tictacslide.policy"))?;
/// # Ok::<(), tictacslide::Error>(())
/// ```
pub trait PolicyRepository {
    /// Save a policy table to persistent storage.
    ///
    /// # Errors
    ///
    /// Returns an error if the path cannot be created or written to, or if
    /// serialization fails.
    fn save(&self, table: &PolicyTable, path: &Path) -> Result<()>;

    /// Load a policy table from persistent storage.
    ///
    /// # Errors
    ///
    /// Returns an error if the file does not exist, cannot be read, or does
    /// not deserialize to a policy table. Callers that can recompute should
    /// treat a failed load like an absent table and fall back to solving.
    fn load(&self, path: &Path) -> Result<PolicyTable>;
}
