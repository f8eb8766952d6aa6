//! TicTacSlide CLI - solve the game and inspect the optimal-move table
//!
//! This CLI provides a unified interface for:
//! - Computing the full policy table and persisting it
//! - Querying the optimal decision for a board position
//! - Summarizing outcomes across the solved table

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "tictacslide")]
#[command(version, about = "Exhaustive solver for the TicTacSlide board game", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute the optimal-move table and persist it
    Solve(tictacslide::cli::commands::SolveArgs),

    /// Look up the optimal decision for a board position
    Query(tictacslide::cli::commands::QueryArgs),

    /// Summarize outcomes across the solved table
    Stats(tictacslide::cli::commands::StatsArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Solve(args) => tictacslide::cli::commands::solve(args)?,
        Commands::Query(args) => tictacslide::cli::commands::query(args)?,
        Commands::Stats(args) => tictacslide::cli::commands::stats(args)?,
    }

    Ok(())
}
