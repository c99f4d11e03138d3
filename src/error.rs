//! Error types for strategy profiles and matches.

use std::path::PathBuf;

use thiserror::Error;

/// Failure to load or validate a strategy profile.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The profile file could not be read.
    #[error("failed to read profile {path}: {source}")]
    Io {
        /// Path that was being read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The profile is not valid JSON for a strategy configuration.
    #[error("failed to parse profile: {0}")]
    Parse(#[from] serde_json::Error),
    /// A field holds a value the engine cannot work with.
    #[error("invalid `{field}`: {reason}")]
    Invalid {
        /// Name of the offending field.
        field: &'static str,
        /// What is wrong with it.
        reason: String,
    },
}

impl ConfigError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

/// Failure to set up a match in the reference world.
#[derive(Debug, Error)]
pub enum MatchError {
    /// Not enough players (minimum 2).
    #[error("too few players: {0} (minimum 2)")]
    TooFewPlayers(usize),
    /// Too many players for the start layout.
    #[error("too many players: {0} (maximum {max})", max = crate::sim::MAX_PLAYERS)]
    TooManyPlayers(usize),
    /// The universe cannot hold separated starting cells.
    #[error("universe size {0} is too small (minimum {min})", min = crate::sim::MIN_UNIVERSE_SIZE)]
    UniverseTooSmall(u32),
    /// A participating strategy profile is invalid.
    #[error("player {player}: {source}")]
    Strategy {
        /// Which player (1-indexed).
        player: usize,
        /// Validation failure.
        #[source]
        source: ConfigError,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_match_error_display() {
        let err = MatchError::TooFewPlayers(1);
        assert!(err.to_string().contains("too few players"));

        let err = MatchError::TooManyPlayers(9);
        assert!(err.to_string().contains("maximum 4"));
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::invalid("split.viability_floor", "must be positive");
        assert_eq!(
            err.to_string(),
            "invalid `split.viability_floor`: must be positive"
        );
    }
}
