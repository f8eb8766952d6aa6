//! TicTacSlide solver
//!
//! This crate provides:
//! - Complete TicTacSlide game rules (tic-tac-toe placement followed by a
//!   sliding phase once six pieces are on the board)
//! - A bijective base-3 state encoding for (board, mover) pairs
//! - An exhaustive, cycle-aware game tree solver producing the optimal
//!   decision for every reachable state
//! - A persistable policy table consumed read-only at play time

pub mod adapters;
pub mod cli;
pub mod error;
pub mod game;
pub mod key;
pub mod policy;
pub mod ports;
pub mod solver;

pub use error::{Error, Result};
pub use game::{Cell, GameState, Move, Phase, Player};
pub use key::StateKey;
pub use policy::{OutcomeCounts, PolicyTable};
pub use solver::{Decision, GameTreeSolver, Outcome, SolveStats};
