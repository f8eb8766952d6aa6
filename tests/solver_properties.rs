//! End-to-end properties of the solver over the full reachable state graph.
//!
//! These tests enumerate reachability independently of the solver (plain BFS
//! over the rules) and check the solved table against it.

use std::collections::{HashMap, HashSet, VecDeque};

use tictacslide::{GameState, GameTreeSolver, Outcome, Phase, Player, PolicyTable};

/// Every state reachable from the empty board by legal play. Terminal states
/// are included but not expanded.
fn reachable_states() -> Vec<GameState> {
    let mut visited = HashSet::new();
    let mut states = Vec::new();
    let mut queue = VecDeque::new();

    let root = GameState::new();
    visited.insert(root);
    queue.push_back(root);

    while let Some(state) = queue.pop_front() {
        states.push(state);

        if state.is_terminal() {
            continue;
        }

        for mv in state.legal_moves() {
            let next = state.apply_move(mv).expect("enumerated moves are legal");
            if visited.insert(next) {
                queue.push_back(next);
            }
        }
    }

    states
}

fn solved_table(seed: u64) -> PolicyTable {
    let (table, _) = GameTreeSolver::with_seed(seed)
        .solve(GameState::new())
        .expect("full solve should succeed");
    table
}

#[test]
fn encoding_is_injective_over_reachable_states() {
    let mut seen = HashMap::new();

    for state in reachable_states() {
        let key = state.encode();
        if let Some(previous) = seen.insert(key, state) {
            panic!("key {key} produced by two distinct states: {previous:?} and {state:?}");
        }
    }

    assert!(seen.len() > 1000, "reachability enumeration looks truncated");
}

#[test]
fn decode_inverts_encode_on_reachable_states() {
    for state in reachable_states() {
        let decoded = GameState::decode(state.encode()).expect("reachable keys decode");
        assert_eq!(decoded, state);
    }
}

#[test]
fn every_reachable_state_has_a_decision() {
    let table = solved_table(17);
    let reachable = reachable_states();

    for state in &reachable {
        assert!(
            table.contains(state.encode()),
            "no decision for reachable state '{}'",
            state.label()
        );
    }

    // The solver visits nothing outside the reachable set either
    assert_eq!(table.len(), reachable.len());
}

#[test]
fn sliding_phase_never_stalls() {
    let mut sliding_states = 0;

    for state in reachable_states() {
        if state.phase() == Phase::Sliding && !state.is_terminal() {
            assert!(
                !state.legal_moves().is_empty(),
                "non-terminal sliding state '{}' has no legal move",
                state.label()
            );
            sliding_states += 1;
        }
    }

    assert!(sliding_states > 0, "no sliding states were enumerated");
}

#[test]
fn root_decision_reflects_the_trust_approximation() {
    // Exact play from the empty board is a draw, but the 50% trust coin
    // flip for revisited Draw entries lets the first player's placement
    // attack through on nearly every seed: the root usually evaluates to
    // Win(X) and only occasionally to Draw (seed 134 is one such seed).
    // Deliberately preserved; see the open question in DESIGN.md.
    for seed in [0, 7, 42, 134] {
        let table = solved_table(seed);
        let root = GameState::new();
        let decision = table.lookup(&root).unwrap();

        assert!(
            matches!(decision.outcome, Outcome::Win(Player::X) | Outcome::Draw),
            "seed {seed}: unexpected root outcome {:?}",
            decision.outcome
        );
        let mv = decision.best_move.expect("the empty board is non-terminal");
        assert!(root.legal_moves().contains(&mv));
    }
}

#[test]
fn root_value_is_reproducible_for_a_fixed_seed() {
    // Pins the concrete per-seed value so a behavior change in the
    // traversal or the coin flip shows up as a test failure.
    let table = solved_table(42);
    let decision = table.lookup(&GameState::new()).unwrap();
    assert_eq!(decision.outcome, Outcome::Win(Player::X));
    assert_eq!(decision.plies, 5);
}

#[test]
fn terminal_decisions_are_immediate_and_moveless() {
    let table = solved_table(23);

    for (key, decision) in table.iter() {
        let state = GameState::decode(key).expect("table keys decode");
        if state.is_terminal() {
            assert_eq!(decision.outcome, Outcome::Win(state.winner().unwrap()));
            assert_eq!(decision.plies, 0);
            assert_eq!(decision.best_move, None);
        }
    }
}

#[test]
fn recorded_moves_are_legal() {
    let table = solved_table(29);

    for (key, decision) in table.iter() {
        let state = GameState::decode(key).expect("table keys decode");
        if state.is_terminal() {
            continue;
        }

        let mv = decision
            .best_move
            .unwrap_or_else(|| panic!("non-terminal state '{}' has no move", state.label()));
        assert!(
            state.legal_moves().contains(&mv),
            "recorded move {mv} is illegal in state '{}'",
            state.label()
        );
    }
}

#[test]
fn six_piece_midgame_yields_a_legal_slide() {
    // X at (0,0), (0,1), (1,1); O at (1,0), (2,1), (2,2); X to move.
    let state = GameState::from_label("XX.OX..OO_X").unwrap();
    assert!(!state.is_terminal());
    assert_eq!(state.phase(), Phase::Sliding);

    // Solving from this position must terminate despite the slide cycles
    // reachable from it, and must pick an adjacent slide.
    let (table, _) = GameTreeSolver::with_seed(31)
        .solve(state)
        .expect("midgame solve should terminate");

    let decision = table.lookup(&state).unwrap();
    let mv = decision.best_move.expect("non-terminal state gets a move");
    assert!(mv.from.is_some(), "sliding phase moves carry a source");
    assert!(state.legal_moves().contains(&mv));
}
