//! gridwar CLI - play strategy profiles against each other.

// Allow unwrap in tests (test code is not production)
#![cfg_attr(test, allow(clippy::unwrap_used))]
// Allow print in the CLI binary
#![allow(clippy::print_stdout, clippy::print_stderr)]

mod cli;

use clap::{ArgAction, Parser, Subcommand};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// gridwar - deterministic strategy engine for grid population contests
#[derive(Parser, Debug)]
#[command(name = "gridwar")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// More log output on stderr (-v info, -vv debug). `RUST_LOG` wins.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Play a single match
    Run {
        /// Strategies: doctrine names or JSON profile paths (2-4)
        #[arg(required = true, num_args = 2..=4)]
        strategies: Vec<String>,

        /// Random seed (default: random)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Maximum turns (default: 500)
        #[arg(short, long, default_value = "500")]
        turns: u32,

        /// Universe side length (default: 50)
        #[arg(long, default_value = "50")]
        size: u32,

        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: cli::OutputFormat,

        /// Only print the result
        #[arg(short, long)]
        quiet: bool,
    },

    /// Play many seeds in parallel and aggregate statistics
    Tournament {
        /// Strategies: doctrine names or JSON profile paths (2-4)
        #[arg(required = true, num_args = 2..=4)]
        strategies: Vec<String>,

        /// Number of games to run (default: 100)
        #[arg(short, long, default_value = "100")]
        games: u64,

        /// Starting seed (increments for each game)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Parallel threads (default: CPU count)
        #[arg(short = 'j', long)]
        threads: Option<usize>,

        /// Maximum turns per game (default: 500)
        #[arg(short = 't', long)]
        max_turns: Option<u32>,

        /// Output format: text, json, or csv
        #[arg(short, long, default_value = "text")]
        format: cli::TournamentFormat,

        /// Show progress bar
        #[arg(short, long)]
        progress: bool,
    },

    /// Print a built-in profile as JSON
    Profile {
        /// Doctrine name
        doctrine: String,
    },
}

fn init_logging(verbose: u8) {
    let fallback = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    let result = match args.command {
        Commands::Run {
            strategies,
            seed,
            turns,
            size,
            format,
            quiet,
        } => cli::run::execute(&strategies, seed, turns, size, format, quiet),

        Commands::Tournament {
            strategies,
            games,
            seed,
            threads,
            max_turns,
            format,
            progress,
        } => cli::tournament::execute(
            &strategies,
            games,
            seed,
            threads,
            max_turns,
            format,
            progress,
        ),

        Commands::Profile { doctrine } => cli::profile::execute(&doctrine),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
