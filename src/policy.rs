//! The solved move table, consumed read-only during play.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{
    error::Error,
    game::{GameState, Player},
    key::StateKey,
    solver::{Decision, Outcome},
    Result,
};

/// Immutable mapping from state key to the solver's decision.
///
/// Built by exactly one [`GameTreeSolver`](crate::solver::GameTreeSolver)
/// traversal and read-only thereafter: every key present holds a fully
/// resolved decision once the traversal that created the table completes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyTable {
    decisions: HashMap<StateKey, Decision>,
}

/// Tally of table entries by final outcome
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OutcomeCounts {
    pub x_wins: usize,
    pub o_wins: usize,
    pub draws: usize,
}

impl PolicyTable {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert(&mut self, key: StateKey, decision: Decision) {
        self.decisions.insert(key, decision);
    }

    /// Get the decision for a raw key, if present
    pub fn get(&self, key: StateKey) -> Option<Decision> {
        self.decisions.get(&key).copied()
    }

    /// Look up the decision for a state.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingDecision`] if the state has no entry. After a
    /// completed traversal from the same root that is a solver defect, not a
    /// normal outcome, so it is reported as a distinct error.
    pub fn lookup(&self, state: &GameState) -> Result<Decision> {
        let key = state.encode();
        self.get(key).ok_or_else(|| Error::MissingDecision {
            label: state.label(),
            key: key.as_u32(),
        })
    }

    /// Check whether a key has an entry
    pub fn contains(&self, key: StateKey) -> bool {
        self.decisions.contains_key(&key)
    }

    /// Number of states in the table
    pub fn len(&self) -> usize {
        self.decisions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decisions.is_empty()
    }

    /// Iterate over all (key, decision) entries in arbitrary order
    pub fn iter(&self) -> impl Iterator<Item = (StateKey, Decision)> + '_ {
        self.decisions.iter().map(|(&key, &decision)| (key, decision))
    }

    /// Tally the table's decisions by outcome
    pub fn outcome_counts(&self) -> OutcomeCounts {
        let mut counts = OutcomeCounts::default();
        for decision in self.decisions.values() {
            match decision.outcome {
                Outcome::Win(Player::X) => counts.x_wins += 1,
                Outcome::Win(Player::O) => counts.o_wins += 1,
                Outcome::Draw => counts.draws += 1,
            }
        }
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::GameTreeSolver;

    #[test]
    fn test_lookup_missing_state_is_an_error() {
        let table = PolicyTable::default();
        let state = GameState::new();

        let err = table.lookup(&state).unwrap_err();
        assert!(matches!(err, Error::MissingDecision { .. }));
        assert!(err.to_string().contains("incomplete"));
    }

    #[test]
    fn test_outcome_counts_cover_every_entry() {
        let (table, _) = GameTreeSolver::with_seed(11)
            .solve(GameState::new())
            .unwrap();

        let counts = table.outcome_counts();
        assert_eq!(counts.x_wins + counts.o_wins + counts.draws, table.len());
        assert!(counts.x_wins > 0);
        assert!(counts.o_wins > 0);
    }

    #[test]
    fn test_get_and_contains_agree() {
        let (table, _) = GameTreeSolver::with_seed(11)
            .solve(GameState::new())
            .unwrap();

        let key = GameState::new().encode();
        assert!(table.contains(key));
        assert!(table.get(key).is_some());

        let absent = StateKey::new(0);
        assert!(!table.contains(absent));
        assert!(table.get(absent).is_none());
    }

    #[test]
    fn test_decisions_collect_into_a_set() {
        let (table, _) = GameTreeSolver::with_seed(11)
            .solve(GameState::new())
            .unwrap();

        let distinct: std::collections::HashSet<Decision> =
            table.iter().map(|(_, decision)| decision).collect();
        assert!(!distinct.is_empty());
        assert!(distinct.len() <= table.len());
    }

    #[test]
    fn test_root_decision_has_a_move() {
        let root = GameState::new();
        let (table, _) = GameTreeSolver::with_seed(11).solve(root).unwrap();

        let decision = table.lookup(&root).unwrap();
        assert!(decision.best_move.is_some());
        assert_eq!(root.to_move, Player::X);
    }
}
