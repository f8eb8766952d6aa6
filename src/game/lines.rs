//! Winning line analysis for the 3x3 board

use super::{Cell, Player};

/// Winning line indices on the 3x3 board
pub const WINNING_LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8], // rows
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8], // columns
    [0, 4, 8],
    [2, 4, 6], // diagonals
];

/// Find the first complete line in the fixed enumeration order.
///
/// Returns the owning player together with the line's cell indices so a
/// presentation layer can highlight it. Legal play never produces two
/// disjoint complete lines (only one piece changes per ply), but the fixed
/// scan order keeps the reported line deterministic regardless.
pub fn winning_line(cells: &[Cell; 9]) -> Option<(Player, [usize; 3])> {
    for &line in &WINNING_LINES {
        if let Some(player) = cells[line[0]].to_player() {
            if cells[line[1]] == cells[line[0]] && cells[line[2]] == cells[line[0]] {
                return Some((player, line));
            }
        }
    }
    None
}

/// Check if a player has won by having three in a row
pub fn has_won(cells: &[Cell; 9], player: Player) -> bool {
    let target = player.to_cell();
    WINNING_LINES
        .iter()
        .any(|line| line.iter().all(|&idx| cells[idx] == target))
}
