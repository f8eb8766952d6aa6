//! Board state representation and the rules of both phases

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{error::Error, key::StateKey, Result};

use super::lines;

/// A cell on the TicTacSlide board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cell {
    Empty,
    X,
    O,
}

impl Cell {
    pub fn to_char(self) -> char {
        match self {
            Cell::Empty => '.',
            Cell::X => 'X',
            Cell::O => 'O',
        }
    }

    pub fn from_char(c: char) -> Option<Cell> {
        match c {
            '.' | ' ' => Some(Cell::Empty),
            'X' | 'x' => Some(Cell::X),
            'O' | 'o' | '0' => Some(Cell::O),
            _ => None,
        }
    }

    pub fn to_player(self) -> Option<Player> {
        match self {
            Cell::X => Some(Player::X),
            Cell::O => Some(Player::O),
            Cell::Empty => None,
        }
    }

    /// Base-3 digit used by the state encoding
    fn digit(self) -> u32 {
        match self {
            Cell::Empty => 0,
            Cell::X => 1,
            Cell::O => 2,
        }
    }
}

/// A player in the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Player {
    X,
    O,
}

impl Player {
    /// Get the opponent player
    pub fn opponent(self) -> Player {
        match self {
            Player::X => Player::O,
            Player::O => Player::X,
        }
    }

    /// Convert player to cell
    pub fn to_cell(self) -> Cell {
        match self {
            Player::X => Cell::X,
            Player::O => Cell::O,
        }
    }

    pub fn to_char(self) -> char {
        match self {
            Player::X => 'X',
            Player::O => 'O',
        }
    }

    /// Base-3 digit used by the state encoding
    fn digit(self) -> u32 {
        match self {
            Player::X => 1,
            Player::O => 2,
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

/// Phase of the game, derived from the number of occupied cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Fewer than six pieces down; each ply adds a piece to an empty cell
    Placement,
    /// Six pieces down; each ply slides one of the mover's pieces to an
    /// orthogonally adjacent empty cell
    Sliding,
}

/// A single move: place a piece on `to`, and during the sliding phase remove
/// the mover's piece from `from`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    pub to: usize,
    pub from: Option<usize>,
}

impl Move {
    /// A placement-phase move
    pub fn place(to: usize) -> Self {
        Move { to, from: None }
    }

    /// A sliding-phase move
    pub fn slide(from: usize, to: usize) -> Self {
        Move {
            to,
            from: Some(from),
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.from {
            Some(from) => write!(f, "{from}->{}", self.to),
            None => write!(f, "{}", self.to),
        }
    }
}

/// Orthogonal adjacency on the 3x3 grid (Manhattan distance exactly 1)
fn adjacent(a: usize, b: usize) -> bool {
    (a / 3).abs_diff(b / 3) + (a % 3).abs_diff(b % 3) == 1
}

/// Complete game state: the cells plus whose turn it is.
///
/// The piece count is not stored anywhere; it is a function of the occupied
/// cells, and the placement phase lasts exactly until six pieces are down.
/// This keeps the type a 10-byte `Copy` value: transitions produce new
/// states, never mutate an existing one in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GameState {
    pub cells: [Cell; 9],
    pub to_move: Player,
}

impl GameState {
    /// Create the canonical initial state: empty board, X to move
    pub fn new() -> Self {
        GameState {
            cells: [Cell::Empty; 9],
            to_move: Player::X,
        }
    }

    /// Helper: parse a player suffix ("X" or "O").
    fn parse_player(player_str: &str, label: &str) -> Result<Player> {
        match player_str {
            "X" | "x" => Ok(Player::X),
            "O" | "o" => Ok(Player::O),
            _ => Err(Error::InvalidPlayerString {
                player: player_str.to_string(),
                label: label.to_string(),
            }),
        }
    }

    /// Helper: parse 9 cells from a slice of characters.
    fn parse_cells(chars: &[char], context: &str) -> Result<[Cell; 9]> {
        if chars.len() != 9 {
            return Err(Error::InvalidBoardLength {
                expected: 9,
                got: chars.len(),
                context: context.to_string(),
            });
        }

        let mut cells = [Cell::Empty; 9];
        for (i, &c) in chars.iter().enumerate() {
            cells[i] = Cell::from_char(c).ok_or_else(|| Error::InvalidCellCharacter {
                character: c,
                position: i,
                context: context.to_string(),
            })?;
        }

        Ok(cells)
    }

    /// Create a state from a label like `"XX.OX..OO_X"`.
    ///
    /// The board part is 9 characters in row-major order (whitespace is
    /// filtered out). The `_X`/`_O` suffix names the mover; it may be omitted
    /// during the placement phase, where the mover follows from the piece
    /// counts, but is required once six pieces are on the board.
    ///
    /// # Errors
    ///
    /// Returns an error if the board part is not 9 valid cell characters, if
    /// the piece counts are unreachable (more than three pieces per player,
    /// O ahead of X, or X ahead by more than one), if a suffix conflicts
    /// with the counts, or if both players hold complete lines.
    pub fn from_label(label: &str) -> Result<Self> {
        let cleaned: String = label.chars().filter(|c| !c.is_whitespace()).collect();
        let (board_part, suffix) = match cleaned.find('_') {
            Some(idx) => {
                let suffix = &cleaned[idx + 1..];
                if suffix.is_empty() {
                    return Err(Error::InvalidPlayerString {
                        player: String::new(),
                        label: label.to_string(),
                    });
                }
                (&cleaned[..idx], Some(Self::parse_player(suffix, label)?))
            }
            None => (cleaned.as_str(), None),
        };

        let chars: Vec<char> = board_part.chars().collect();
        let cells = Self::parse_cells(&chars, label)?;

        let invalid = |reason: &str| Error::InvalidLabel {
            label: label.to_string(),
            reason: reason.to_string(),
        };

        let x_count = cells.iter().filter(|&&c| c == Cell::X).count();
        let o_count = cells.iter().filter(|&&c| c == Cell::O).count();

        if x_count > 3 || o_count > 3 {
            return Err(invalid(&format!(
                "at most three pieces per player (X={x_count}, O={o_count})"
            )));
        }
        if o_count > x_count {
            return Err(invalid(&format!(
                "O cannot have more pieces than X (X={x_count}, O={o_count})"
            )));
        }
        if x_count > o_count + 1 {
            return Err(invalid(&format!(
                "X can be ahead by at most one piece (X={x_count}, O={o_count})"
            )));
        }

        // During placement the mover follows from the counts; with all six
        // pieces down either player may be on move.
        let inferred = if x_count == o_count + 1 {
            Some(Player::O)
        } else if x_count < 3 {
            Some(Player::X)
        } else {
            None
        };

        let to_move = match (inferred, suffix) {
            (Some(player), None) => player,
            (Some(player), Some(given)) if player == given => player,
            (Some(player), Some(_)) => {
                return Err(invalid(&format!(
                    "piece counts (X={x_count}, O={o_count}) require {player} to move"
                )));
            }
            (None, Some(given)) => given,
            (None, None) => {
                return Err(invalid(
                    "a _X or _O suffix is required once six pieces are on the board",
                ));
            }
        };

        if lines::has_won(&cells, Player::X) && lines::has_won(&cells, Player::O) {
            return Err(invalid("both players cannot have winning lines"));
        }

        Ok(GameState { cells, to_move })
    }

    /// Count the number of occupied cells on the board.
    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c != Cell::Empty).count()
    }

    /// Which phase this state is in (placement until six pieces are down)
    pub fn phase(&self) -> Phase {
        if self.occupied_count() < 6 {
            Phase::Placement
        } else {
            Phase::Sliding
        }
    }

    /// Get cell at position (0-8)
    pub fn get(&self, pos: usize) -> Cell {
        self.cells[pos]
    }

    /// Get all empty positions
    pub fn empty_positions(&self) -> Vec<usize> {
        self.cells
            .iter()
            .enumerate()
            .filter(|&(_, &cell)| cell == Cell::Empty)
            .map(|(i, _)| i)
            .collect()
    }

    /// Get all positions holding the given player's pieces
    pub fn positions_of(&self, player: Player) -> Vec<usize> {
        let target = player.to_cell();
        self.cells
            .iter()
            .enumerate()
            .filter(|&(_, &cell)| cell == target)
            .map(|(i, _)| i)
            .collect()
    }

    /// Get the winner if there is one
    pub fn winner(&self) -> Option<Player> {
        lines::winning_line(&self.cells).map(|(player, _)| player)
    }

    /// First complete line in the fixed scan order, with its owner.
    ///
    /// Exposed for presentation highlighting; the solver only needs
    /// [`winner`](Self::winner).
    pub fn winning_line(&self) -> Option<(Player, [usize; 3])> {
        lines::winning_line(&self.cells)
    }

    /// Check if the game is over.
    ///
    /// TicTacSlide has no board-full stalemate: placement stops at six
    /// pieces, so the only terminal states are wins.
    pub fn is_terminal(&self) -> bool {
        self.winner().is_some()
    }

    /// Enumerate the legal moves in this position.
    ///
    /// Terminal states have none. Placement-phase states have one move per
    /// empty cell; sliding-phase states have one move per (empty cell, own
    /// piece) pair at Manhattan distance 1. The enumeration order is fixed
    /// (destinations ascending, then sources ascending) so that downstream
    /// tie-breaking is deterministic.
    pub fn legal_moves(&self) -> Vec<Move> {
        if self.is_terminal() {
            return Vec::new();
        }

        match self.phase() {
            Phase::Placement => self.empty_positions().into_iter().map(Move::place).collect(),
            Phase::Sliding => {
                let mine = self.positions_of(self.to_move);
                let mut moves = Vec::new();
                for to in self.empty_positions() {
                    for &from in &mine {
                        if adjacent(from, to) {
                            moves.push(Move::slide(from, to));
                        }
                    }
                }
                moves
            }
        }
    }

    /// Apply a move and return the resulting state.
    ///
    /// Pure: the destination is set to the mover, the source (if any) is
    /// cleared, and the mover flips. The input state is never mutated.
    ///
    /// # Errors
    ///
    /// Returns an error if a position is out of range, the destination is
    /// occupied, the move shape does not match the phase, the slide source
    /// does not hold the mover's piece, or the slide is not orthogonally
    /// adjacent.
    #[must_use = "apply_move returns a new game state; the original is unchanged"]
    pub fn apply_move(&self, mv: Move) -> Result<GameState> {
        if mv.to >= 9 {
            return Err(Error::InvalidPosition { position: mv.to });
        }
        if self.cells[mv.to] != Cell::Empty {
            return Err(Error::DestinationOccupied { position: mv.to });
        }

        let mut next = *self;
        match (self.phase(), mv.from) {
            (Phase::Placement, Some(_)) => return Err(Error::SlideDuringPlacement),
            (Phase::Sliding, None) => return Err(Error::PlacementDuringSlide),
            (Phase::Placement, None) => {}
            (Phase::Sliding, Some(from)) => {
                if from >= 9 {
                    return Err(Error::InvalidPosition { position: from });
                }
                if self.cells[from] != self.to_move.to_cell() {
                    return Err(Error::SourceNotOwn { position: from });
                }
                if !adjacent(from, mv.to) {
                    return Err(Error::NotAdjacent { from, to: mv.to });
                }
                next.cells[from] = Cell::Empty;
            }
        }

        next.cells[mv.to] = self.to_move.to_cell();
        next.to_move = self.to_move.opponent();
        Ok(next)
    }

    /// Encode this (board, mover) pair as a base-3 state key.
    ///
    /// The mover is the lowest-order digit (X=1, O=2) and the nine cells the
    /// successive higher digits (Empty=0, X=1, O=2) in row-major order. Pure
    /// and injective: distinct pairs always produce distinct keys.
    pub fn encode(&self) -> StateKey {
        let mut code = self.to_move.digit();
        let mut multiplier = 3;
        for cell in &self.cells {
            code += cell.digit() * multiplier;
            multiplier *= 3;
        }
        StateKey::new(code)
    }

    /// Decode a state key back into the (board, mover) pair that produced it.
    ///
    /// # Errors
    ///
    /// Returns an error if the code is out of range or its mover digit is
    /// zero (no key produced by [`encode`](Self::encode) is).
    pub fn decode(key: StateKey) -> Result<GameState> {
        let mut code = key.as_u32();
        if code > StateKey::MAX_CODE {
            return Err(Error::InvalidStateKey { key: key.as_u32() });
        }

        let to_move = match code % 3 {
            1 => Player::X,
            2 => Player::O,
            _ => return Err(Error::InvalidStateKey { key: key.as_u32() }),
        };
        code /= 3;

        let mut cells = [Cell::Empty; 9];
        for cell in cells.iter_mut() {
            *cell = match code % 3 {
                0 => Cell::Empty,
                1 => Cell::X,
                _ => Cell::O,
            };
            code /= 3;
        }

        Ok(GameState { cells, to_move })
    }

    /// Human-readable label, the inverse of [`from_label`](Self::from_label)
    pub fn label(&self) -> String {
        format!(
            "{}_{}",
            self.cells.iter().map(|&c| c.to_char()).collect::<String>(),
            self.to_move.to_char()
        )
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, &cell) in self.cells.iter().enumerate() {
            write!(f, "{}", cell.to_char())?;
            if i % 3 == 2 && i < 8 {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}
