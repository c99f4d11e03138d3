//! Run command implementation.

use super::output::format_text;
use super::{resolve, seed_or_clock, CliError, OutputFormat};
use gridwar::sim::{play_match, MatchConfig};
use gridwar::strategy::StrategyConfig;

/// Execute the run command.
///
/// # Errors
///
/// Returns an error if a strategy cannot be resolved or the match cannot
/// be set up.
pub(crate) fn execute(
    strategies: &[String],
    seed: Option<u64>,
    turns: u32,
    size: u32,
    format: OutputFormat,
    quiet: bool,
) -> Result<(), CliError> {
    let contenders = resolve(strategies)?;
    let names: Vec<String> = contenders.iter().map(|c| c.name.clone()).collect();
    let profiles: Vec<StrategyConfig> = contenders.into_iter().map(|c| c.config).collect();

    let seed = seed_or_clock(seed);
    let config = MatchConfig {
        max_turns: turns,
        size,
        ..MatchConfig::default()
    };

    if !quiet && format == OutputFormat::Text {
        println!("Running match with seed {seed}...");
        println!("Players: {}", names.join(", "));
        println!();
    }

    let result = play_match(seed, &profiles, &config)?;

    match format {
        OutputFormat::Text => print!("{}", format_text(&result, &names)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&result)?),
    }

    Ok(())
}
