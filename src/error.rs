//! Error types for the tictacslide crate

use thiserror::Error;

/// Main error type for the tictacslide crate
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("position {position} is out of bounds (must be 0-8)")]
    InvalidPosition { position: usize },

    #[error("invalid move: destination {position} is already occupied")]
    DestinationOccupied { position: usize },

    #[error("invalid move: a slide source was given during the placement phase")]
    SlideDuringPlacement,

    #[error("invalid move: a piece must be slid once six pieces are on the board")]
    PlacementDuringSlide,

    #[error("invalid slide: source {position} does not hold the mover's piece")]
    SourceNotOwn { position: usize },

    #[error("invalid slide: {from} and {to} are not orthogonally adjacent")]
    NotAdjacent { from: usize, to: usize },

    #[error("board label too short: expected {expected} cells, got {got} in '{context}'")]
    InvalidBoardLength {
        expected: usize,
        got: usize,
        context: String,
    },

    #[error("invalid character '{character}' at position {position} in '{context}'")]
    InvalidCellCharacter {
        character: char,
        position: usize,
        context: String,
    },

    #[error("invalid player '{player}' in label '{label}' (expected 'X' or 'O')")]
    InvalidPlayerString { player: String, label: String },

    #[error("invalid board label '{label}': {reason}")]
    InvalidLabel { label: String, reason: String },

    #[error("state key {key} does not decode to a valid (board, mover) pair")]
    InvalidStateKey { key: u32 },

    #[error("internal consistency error: non-terminal sliding state '{label}' has no legal move")]
    NoSlideAvailable { label: String },

    #[error("no decision recorded for state '{label}' (key {key}); the policy table is incomplete")]
    MissingDecision { label: String, key: u32 },

    #[error("failed to {operation}: {source}")]
    Io {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to {operation}: {message}")]
    SerializationContext { operation: String, message: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience type alias for Results using the crate's Error type
pub type Result<T> = std::result::Result<T, Error>;

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Error::Io {
            operation: "IO operation".to_string(),
            source,
        }
    }
}
