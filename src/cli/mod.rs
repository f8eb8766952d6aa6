//! CLI infrastructure for the TicTacSlide solver toolkit
//!
//! This module provides the command-line interface for solving the game,
//! querying positions against the solved table, and summarizing outcomes.

pub mod commands;
pub mod output;
