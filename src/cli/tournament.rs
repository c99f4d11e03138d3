//! Tournament command implementation.

// Game counts and durations are reported as floats
#![allow(clippy::cast_precision_loss)]

use super::output::{
    format_tournament_csv, format_tournament_text, JsonTournamentResult, TournamentStats,
};
use super::{resolve, seed_or_clock, CliError, TournamentFormat};
use gridwar::sim::{play_match, MatchConfig};
use gridwar::strategy::StrategyConfig;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use std::time::Instant;

/// Execute the tournament command.
///
/// # Errors
///
/// Returns an error if a strategy cannot be resolved or a match cannot be
/// set up.
pub(crate) fn execute(
    strategies: &[String],
    games: u64,
    seed: Option<u64>,
    threads: Option<usize>,
    max_turns: Option<u32>,
    format: TournamentFormat,
    progress: bool,
) -> Result<(), CliError> {
    let contenders = resolve(strategies)?;
    let names: Vec<String> = contenders.iter().map(|c| c.name.clone()).collect();
    let profiles: Vec<StrategyConfig> = contenders.into_iter().map(|c| c.config).collect();

    if let Some(num_threads) = threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .build_global()
            .ok(); // Ignore error if already initialized
    }

    let base_seed = seed_or_clock(seed);
    let mut config = MatchConfig::default();
    if let Some(t) = max_turns {
        config.max_turns = t;
    }

    // Surface setup errors once instead of per game
    play_match(base_seed, &profiles, &MatchConfig { max_turns: 0, ..config })?;

    let pb = if progress {
        let pb = ProgressBar::new(games);
        let style = ProgressStyle::default_bar()
            .template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} games ({per_sec})",
            )
            .map_err(|e| CliError::new(format!("Invalid progress template: {e}")))?
            .progress_chars("=>-");
        pb.set_style(style);
        Some(pb)
    } else {
        None
    };

    let start = Instant::now();
    let num_players = profiles.len();

    let stats = (0..games)
        .into_par_iter()
        .fold(
            || TournamentStats::new(num_players),
            |mut local, i| {
                if let Ok(result) = play_match(base_seed.wrapping_add(i), &profiles, &config) {
                    local.add_result(&result);
                }
                if let Some(pb) = &pb {
                    pb.inc(1);
                }
                local
            },
        )
        .reduce(
            || TournamentStats::new(num_players),
            |mut a, b| {
                a.merge(&b);
                a
            },
        );

    if let Some(pb) = pb {
        pb.finish_with_message("done");
    }

    let duration = start.elapsed();
    let games_per_sec = if duration.as_secs_f64() > 0.0 {
        stats.games_played as f64 / duration.as_secs_f64()
    } else {
        0.0
    };

    match format {
        TournamentFormat::Text => {
            println!();
            print!("{}", format_tournament_text(&stats, &names));
            println!();
            println!(
                "Duration: {:.2}s ({:.0} games/sec)",
                duration.as_secs_f64(),
                games_per_sec
            );
        }
        TournamentFormat::Json => {
            let json = JsonTournamentResult::from_stats(&stats, &names);
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
        TournamentFormat::Csv => print!("{}", format_tournament_csv(&stats, &names)),
    }

    Ok(())
}
