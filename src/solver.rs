//! Exhaustive, cycle-aware evaluation of the TicTacSlide state graph.
//!
//! The sliding phase makes the state graph cyclic: a sequence of slides can
//! return the board to an earlier configuration, so plain memoized recursion
//! would not terminate. The solver breaks cycles by writing an optimistic
//! Draw placeholder into the table before expanding a state; any revisit of
//! that state while it is still on the active branch resolves to the
//! placeholder instead of recursing. Draw entries recorded on *other*
//! branches are trusted on a 50% coin flip and re-expanded otherwise, a
//! deliberate, slightly unsound approximation (see DESIGN.md).

use std::collections::HashSet;

use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::{
    error::Error,
    game::{GameState, Move, Player},
    key::StateKey,
    policy::PolicyTable,
    Result,
};

/// Final outcome of optimal play from a state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    Win(Player),
    Draw,
}

impl Outcome {
    /// Sort rank of a candidate outcome from the mover's point of view:
    /// the mover winning beats a draw beats the opponent winning.
    fn priority(self, mover: Player) -> u8 {
        match self {
            Outcome::Win(winner) if winner == mover => 0,
            Outcome::Draw => 1,
            Outcome::Win(_) => 2,
        }
    }
}

/// The solver's verdict for one state: the outcome under optimal play, the
/// number of plies until the game ends, and the move that achieves it
/// (`None` for terminal states).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Decision {
    pub outcome: Outcome,
    pub plies: u32,
    pub best_move: Option<Move>,
}

impl Decision {
    fn terminal(winner: Player) -> Self {
        Decision {
            outcome: Outcome::Win(winner),
            plies: 0,
            best_move: None,
        }
    }

    /// Optimistic placeholder written before a state is expanded, so that a
    /// cycle back to it reads as a draw.
    fn draw_placeholder() -> Self {
        Decision {
            outcome: Outcome::Draw,
            plies: 0,
            best_move: None,
        }
    }
}

/// Counters for a single traversal, scoped to one `solve` call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SolveStats {
    /// Number of distinct states in the finished table
    pub states: usize,
    /// States recorded as terminal on first visit
    pub terminal_states: usize,
    /// Revisits resolved from the table without expansion
    pub trusted_revisits: usize,
    /// Stored Draw entries that lost the trust coin flip and were re-expanded
    pub re_expansions: usize,
    /// Longest active branch observed during the traversal
    pub max_branch_len: usize,
}

/// One move's resolved consequence, from the parent mover's perspective
#[derive(Debug, Clone, Copy)]
struct Candidate {
    outcome: Outcome,
    plies: u32,
    mv: Move,
}

impl Candidate {
    fn from_child(mv: Move, child: Decision) -> Self {
        Candidate {
            outcome: child.outcome,
            plies: child.plies + 1,
            mv,
        }
    }
}

/// A state mid-expansion on the explicit work stack
#[derive(Debug)]
struct Frame {
    state: GameState,
    key: StateKey,
    /// Move in the parent frame that led here (`None` for the root)
    via: Option<Move>,
    moves: Vec<Move>,
    cursor: usize,
    candidates: Vec<Candidate>,
}

impl Frame {
    /// Pick the best candidate for the frame's mover: minimal
    /// (outcome priority, plies). Fewer plies are preferred among equal
    /// outcomes, so wins are as fast as possible and, symmetrically, so
    /// are losses; `plies` is not signed by outcome. Ties resolve to the
    /// first candidate in move-enumeration order.
    fn select_best(&self) -> Decision {
        let mover = self.state.to_move;
        let best = self
            .candidates
            .iter()
            .min_by_key(|c| (c.outcome.priority(mover), c.plies))
            .expect("every enumerated move produced a candidate");

        Decision {
            outcome: best.outcome,
            plies: best.plies,
            best_move: Some(best.mv),
        }
    }
}

/// Depth-first solver that populates a [`PolicyTable`] for every state
/// reachable from a root.
///
/// The solver owns the memo table, the active-branch set, and the RNG for
/// the trust coin flip for the duration of one traversal; nothing is shared
/// or global. The traversal runs on an explicit work stack, so its depth is
/// bounded by the heap rather than the call stack: active branches in the
/// sliding phase can visit many distinct states before bottoming out.
#[derive(Debug)]
pub struct GameTreeSolver {
    rng: StdRng,
}

impl GameTreeSolver {
    /// Create a solver with an OS-seeded RNG
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    /// Create a solver with a fixed seed for reproducible traversals
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Evaluate every state reachable from `root` and return the finished
    /// policy table together with the traversal counters.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoSlideAvailable`] if a non-terminal sliding state
    /// has no legal move. That cannot happen on the fixed 3x3 geometry (with
    /// six of nine cells occupied the mover always has an adjacent slide),
    /// so it is reported as an internal-consistency failure rather than
    /// treated as a game outcome.
    pub fn solve(&mut self, root: GameState) -> Result<(PolicyTable, SolveStats)> {
        let mut table = PolicyTable::new();
        let mut active: HashSet<StateKey> = HashSet::new();
        let mut stats = SolveStats::default();
        let mut stack: Vec<Frame> = Vec::new();

        if self.probe(&root, &mut table, &active, &mut stats).is_none() {
            let frame = Self::open_frame(root, None, &mut table, &mut active, &mut stats)?;
            stack.push(frame);
        }

        while let Some(top) = stack.len().checked_sub(1) {
            let next_move = {
                let frame = &stack[top];
                frame.moves.get(frame.cursor).copied()
            };

            match next_move {
                Some(mv) => {
                    stack[top].cursor += 1;
                    let child = stack[top].state.apply_move(mv)?;
                    match self.probe(&child, &mut table, &active, &mut stats) {
                        Some(decision) => {
                            stack[top].candidates.push(Candidate::from_child(mv, decision));
                        }
                        None => {
                            let frame = Self::open_frame(
                                child,
                                Some(mv),
                                &mut table,
                                &mut active,
                                &mut stats,
                            )?;
                            stack.push(frame);
                        }
                    }
                }
                None => {
                    let frame = stack.pop().expect("loop condition guarantees a frame");
                    let best = frame.select_best();
                    table.insert(frame.key, best);
                    active.remove(&frame.key);

                    if let Some(parent) = stack.last_mut() {
                        let mv = frame
                            .via
                            .expect("non-root frames record the move that reached them");
                        parent.candidates.push(Candidate::from_child(mv, best));
                    }
                }
            }
        }

        stats.states = table.len();
        Ok((table, stats))
    }

    /// Resolve a state from the table without expanding it, when possible.
    ///
    /// Returns the stored decision if the key is present and trusted, records
    /// and returns a terminal decision on the first visit of a won board, and
    /// returns `None` when the state must be (re-)expanded. A stored Draw is
    /// trusted when the state sits on the active branch (a cycle) or on a 50%
    /// coin flip; otherwise it is doubted and re-expanded.
    fn probe(
        &mut self,
        state: &GameState,
        table: &mut PolicyTable,
        active: &HashSet<StateKey>,
        stats: &mut SolveStats,
    ) -> Option<Decision> {
        let key = state.encode();

        if let Some(stored) = table.get(key) {
            if stored.outcome != Outcome::Draw
                || active.contains(&key)
                || self.rng.random_bool(0.5)
            {
                stats.trusted_revisits += 1;
                return Some(stored);
            }
            stats.re_expansions += 1;
            return None;
        }

        if let Some(winner) = state.winner() {
            let decision = Decision::terminal(winner);
            table.insert(key, decision);
            stats.terminal_states += 1;
            return Some(decision);
        }

        None
    }

    /// Start expanding a state: write the cycle-breaking placeholder (unless
    /// a previous Draw evaluation already occupies the slot), mark the key
    /// active, and enumerate its moves.
    fn open_frame(
        state: GameState,
        via: Option<Move>,
        table: &mut PolicyTable,
        active: &mut HashSet<StateKey>,
        stats: &mut SolveStats,
    ) -> Result<Frame> {
        let key = state.encode();

        if table.get(key).is_none() {
            table.insert(key, Decision::draw_placeholder());
        }
        active.insert(key);
        stats.max_branch_len = stats.max_branch_len.max(active.len());

        let moves = state.legal_moves();
        if moves.is_empty() {
            return Err(Error::NoSlideAvailable {
                label: state.label(),
            });
        }

        Ok(Frame {
            state,
            key,
            via,
            moves,
            cursor: 0,
            candidates: Vec::new(),
        })
    }
}

impl Default for GameTreeSolver {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_ranks_mover_win_first() {
        assert_eq!(Outcome::Win(Player::X).priority(Player::X), 0);
        assert_eq!(Outcome::Draw.priority(Player::X), 1);
        assert_eq!(Outcome::Win(Player::O).priority(Player::X), 2);

        assert_eq!(Outcome::Win(Player::O).priority(Player::O), 0);
        assert_eq!(Outcome::Win(Player::X).priority(Player::O), 2);
    }

    #[test]
    fn test_terminal_root_yields_single_entry() {
        // X already holds the top row
        let root = GameState::from_label("XXXOO.O.._O").unwrap();
        let mut solver = GameTreeSolver::with_seed(1);
        let (table, stats) = solver.solve(root).unwrap();

        assert_eq!(table.len(), 1);
        assert_eq!(stats.terminal_states, 1);

        let decision = table.lookup(&root).unwrap();
        assert_eq!(decision.outcome, Outcome::Win(Player::X));
        assert_eq!(decision.plies, 0);
        assert_eq!(decision.best_move, None);
    }

    #[test]
    fn test_immediate_sliding_win_is_found() {
        // X to move; sliding 5 -> 2 completes the top row, and no other
        // single slide wins.
        let root = GameState::from_label("XX.OOX..O_X").unwrap();
        let mut solver = GameTreeSolver::with_seed(2);
        let (table, _) = solver.solve(root).unwrap();

        let decision = table.lookup(&root).unwrap();
        assert_eq!(decision.outcome, Outcome::Win(Player::X));
        assert_eq!(decision.plies, 1);
        assert_eq!(decision.best_move, Some(Move::slide(5, 2)));
    }

    #[test]
    fn test_same_seed_reproduces_table() {
        let root = GameState::new();
        let (table_a, _) = GameTreeSolver::with_seed(7).solve(root).unwrap();
        let (table_b, _) = GameTreeSolver::with_seed(7).solve(root).unwrap();
        assert_eq!(table_a, table_b);
    }

    #[test]
    fn test_full_solve_stats_are_plausible() {
        let mut solver = GameTreeSolver::with_seed(3);
        let (table, stats) = solver.solve(GameState::new()).unwrap();

        assert_eq!(stats.states, table.len());
        assert!(stats.states > 1000, "expected thousands of reachable states");
        assert!(stats.terminal_states > 0);
        // Sliding cycles force branches longer than the 6 placement plies
        assert!(stats.max_branch_len > 6);
    }
}
