//! Compact identifier type for (board, mover) pairs.
//!
//! Keys are base-3 codes produced by [`GameState::encode`]: the mover occupies
//! the lowest-order digit and the nine cells the higher digits, so every
//! distinct pair maps to a distinct integer below 3^10.
//!
//! [`GameState::encode`]: crate::game::GameState::encode

use std::fmt;

use serde::{Deserialize, Serialize};

/// Unique identifier for a board state in the policy table.
///
/// A `StateKey` identifies a (board, mover) pair independently of the piece
/// count, which is recoverable by counting occupied cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct StateKey(u32);

impl StateKey {
    /// Largest code any (board, mover) pair can produce (3^10 - 1).
    pub const MAX_CODE: u32 = 59048;

    /// Create a key from a raw base-3 code.
    pub const fn new(code: u32) -> Self {
        Self(code)
    }

    /// Get the raw code.
    pub const fn as_u32(self) -> u32 {
        self.0
    }
}

impl fmt::Display for StateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for StateKey {
    fn from(code: u32) -> Self {
        Self::new(code)
    }
}

impl From<StateKey> for u32 {
    fn from(key: StateKey) -> Self {
        key.as_u32()
    }
}
