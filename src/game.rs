//! TicTacSlide game rules: board representation, win detection, and legal
//! move enumeration for the placement and sliding phases.

pub mod board;
pub mod lines;

pub use board::{Cell, GameState, Move, Phase, Player};
