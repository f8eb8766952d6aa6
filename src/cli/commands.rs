//! Subcommand implementations for the tictacslide binary

use std::path::{Path, PathBuf};

use clap::Args;
use serde::Serialize;

use crate::{
    adapters::MsgPackRepository,
    cli::output,
    game::GameState,
    policy::PolicyTable,
    ports::PolicyRepository,
    solver::{Decision, GameTreeSolver, Outcome, SolveStats},
    Result,
};

const DEFAULT_TABLE_PATH: &str = "tictacslide.policy";

#[derive(Debug, Args)]
pub struct SolveArgs {
    /// Where to write the solved table
    #[arg(long, default_value = DEFAULT_TABLE_PATH)]
    pub output: PathBuf,

    /// Seed for the solver's trust coin flip, for reproducible tables
    #[arg(long)]
    pub seed: Option<u64>,

    /// Recompute even if a table already exists at the output path
    #[arg(long)]
    pub force: bool,
}

#[derive(Debug, Args)]
pub struct QueryArgs {
    /// Board label, e.g. "XX.OX..OO_X" (row-major, '.' for empty)
    pub label: String,

    /// Path of the solved table (computed and saved if absent)
    #[arg(long, default_value = DEFAULT_TABLE_PATH)]
    pub table: PathBuf,

    /// Print the decision as JSON
    #[arg(long)]
    pub json: bool,

    /// Seed to use if the table has to be recomputed
    #[arg(long)]
    pub seed: Option<u64>,
}

#[derive(Debug, Args)]
pub struct StatsArgs {
    /// Path of the solved table (computed and saved if absent)
    #[arg(long, default_value = DEFAULT_TABLE_PATH)]
    pub table: PathBuf,

    /// Seed to use if the table has to be recomputed
    #[arg(long)]
    pub seed: Option<u64>,
}

#[derive(Debug, Serialize)]
struct QueryReport {
    label: String,
    key: u32,
    decision: Decision,
}

pub fn solve(args: SolveArgs) -> Result<()> {
    let repo = MsgPackRepository::new();

    if !args.force && args.output.exists() {
        if let Ok(table) = repo.load(&args.output) {
            println!(
                "table already present at {:?} ({} states); use --force to recompute",
                args.output,
                output::format_number(table.len())
            );
            return Ok(());
        }
        eprintln!(
            "warning: existing table at {:?} is unreadable; recomputing",
            args.output
        );
    }

    let (table, stats) = run_solver(args.seed)?;
    repo.save(&table, &args.output)?;

    output::print_section("Solve complete");
    print_traversal_stats(&stats);
    println!("\nsaved {} states to {:?}", output::format_number(table.len()), args.output);
    Ok(())
}

pub fn query(args: QueryArgs) -> Result<()> {
    let state = GameState::from_label(&args.label)?;
    let table = ensure_table(&args.table, args.seed)?;
    let decision = table.lookup(&state)?;

    if args.json {
        let report = QueryReport {
            label: state.label(),
            key: state.encode().as_u32(),
            decision,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("{state}");
    println!();
    output::print_kv("mover", &state.to_move.to_string());
    output::print_kv("key", &state.encode().to_string());
    output::print_kv("outcome", &describe_outcome(decision.outcome));
    output::print_kv("plies to end", &decision.plies.to_string());
    match decision.best_move {
        Some(mv) => output::print_kv("best move", &mv.to_string()),
        None => output::print_kv("best move", "none (terminal state)"),
    }
    Ok(())
}

pub fn stats(args: StatsArgs) -> Result<()> {
    let table = ensure_table(&args.table, args.seed)?;
    let counts = table.outcome_counts();

    output::print_section("Policy table outcomes");
    output::print_kv("states", &output::format_number(table.len()));
    output::print_kv("X wins", &output::format_number(counts.x_wins));
    output::print_kv("O wins", &output::format_number(counts.o_wins));
    output::print_kv("draws", &output::format_number(counts.draws));

    let longest_win = table
        .iter()
        .filter(|(_, d)| matches!(d.outcome, Outcome::Win(_)))
        .map(|(_, d)| d.plies)
        .max()
        .unwrap_or(0);
    output::print_kv("longest forced win", &format!("{longest_win} plies"));
    Ok(())
}

/// Load the table at `path`, recomputing (and saving) on absence or on a
/// failed load. A corrupt table is deliberately treated like an absent one:
/// recomputation is expensive but bounded, and always available.
fn ensure_table(path: &Path, seed: Option<u64>) -> Result<PolicyTable> {
    let repo = MsgPackRepository::new();

    if path.exists() {
        match repo.load(path) {
            Ok(table) => return Ok(table),
            Err(err) => {
                eprintln!("warning: failed to load table from {path:?} ({err}); recomputing");
            }
        }
    }

    let (table, _) = run_solver(seed)?;
    repo.save(&table, path)?;
    Ok(table)
}

fn run_solver(seed: Option<u64>) -> Result<(PolicyTable, SolveStats)> {
    let spinner = output::create_spinner("evaluating every reachable state...");
    let mut solver = match seed {
        Some(seed) => GameTreeSolver::with_seed(seed),
        None => GameTreeSolver::new(),
    };
    let result = solver.solve(GameState::new());
    spinner.finish_and_clear();
    result
}

fn print_traversal_stats(stats: &SolveStats) {
    output::print_kv("states", &output::format_number(stats.states));
    output::print_kv("terminal states", &output::format_number(stats.terminal_states));
    output::print_kv("trusted revisits", &output::format_number(stats.trusted_revisits));
    output::print_kv("re-expansions", &output::format_number(stats.re_expansions));
    output::print_kv("max branch length", &output::format_number(stats.max_branch_len));
}

fn describe_outcome(outcome: Outcome) -> String {
    match outcome {
        Outcome::Win(player) => format!("{player} wins"),
        Outcome::Draw => "draw".to_string(),
    }
}
