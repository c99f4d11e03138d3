//! CLI command implementations for gridwar.

pub(crate) mod profile;
pub(crate) mod run;
pub(crate) mod tournament;

mod output;

use clap::ValueEnum;
use gridwar::error::{ConfigError, MatchError};
use gridwar::strategy::{Doctrine, StrategyConfig};
use std::error::Error;
use std::fmt;
use std::path::Path;

/// Output format for the `run` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    /// Human-readable text output.
    Text,
    /// Machine-readable JSON output.
    Json,
}

/// Output format for the `tournament` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum TournamentFormat {
    /// Human-readable text output.
    Text,
    /// Machine-readable JSON output.
    Json,
    /// CSV format.
    Csv,
}

/// CLI error type.
#[derive(Debug)]
pub(crate) struct CliError {
    message: String,
}

impl CliError {
    /// Create a new CLI error.
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Error for CliError {}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        Self::new(e.to_string())
    }
}

impl From<MatchError> for CliError {
    fn from(e: MatchError) -> Self {
        Self::new(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::new(format!("JSON serialization failed: {e}"))
    }
}

/// A strategy argument resolved to a profile and a display name.
#[derive(Debug, Clone)]
pub(crate) struct Contender {
    pub(crate) name: String,
    pub(crate) config: StrategyConfig,
}

/// Resolve each argument as a doctrine name, or failing that a JSON profile.
pub(crate) fn resolve(args: &[String]) -> Result<Vec<Contender>, CliError> {
    args.iter()
        .map(|arg| {
            if let Ok(doctrine) = arg.parse::<Doctrine>() {
                return Ok(Contender {
                    name: doctrine.to_string(),
                    config: StrategyConfig::preset(doctrine),
                });
            }
            let path = Path::new(arg);
            let config = StrategyConfig::load(path)
                .map_err(|e| CliError::new(format!("{arg}: {e}")))?;
            let name = path
                .file_stem()
                .map_or_else(|| arg.clone(), |n| n.to_string_lossy().to_string());
            Ok(Contender { name, config })
        })
        .collect()
}

/// Seed from the clock when none was given.
#[allow(clippy::cast_possible_truncation)]
pub(crate) fn seed_or_clock(seed: Option<u64>) -> u64 {
    seed.unwrap_or_else(|| {
        use std::time::{SystemTime, UNIX_EPOCH};
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(42)
    })
}
