//! Strategy profiles.
//!
//! A profile is a doctrine (which signals drive phase choice) plus the
//! numbers the allocation policy works with. Profiles are plain data and
//! round-trip through JSON.

// Profile fields are checked by `validate`, casts of fractions are intentional
#![allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]

use std::fs;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::strategy::phase::{Phase, TurnSignal};

/// Which signals drive phase selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Doctrine {
    /// Turn window plus friendly-neighbour density; best-scored empty
    /// neighbour gets the expansion.
    Frontier,
    /// Turn window plus hostile pressure from the gravity map.
    Gravity,
    /// Turn window plus inner/outer posture and quadrant around the base.
    Quadrant,
    /// Seeded weighted draw biased by nearby enemies and base distance.
    Weighted,
}

impl Doctrine {
    /// All built-in doctrines.
    pub const ALL: [Doctrine; 4] = [
        Doctrine::Frontier,
        Doctrine::Gravity,
        Doctrine::Quadrant,
        Doctrine::Weighted,
    ];

    /// Lowercase name, as accepted by [`FromStr`].
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Doctrine::Frontier => "frontier",
            Doctrine::Gravity => "gravity",
            Doctrine::Quadrant => "quadrant",
            Doctrine::Weighted => "weighted",
        }
    }
}

impl std::fmt::Display for Doctrine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Doctrine {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Doctrine::ALL
            .into_iter()
            .find(|d| d.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| ConfigError::invalid("doctrine", format!("unknown doctrine `{s}`")))
    }
}

/// Population a cell keeps back before allocating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Reserve {
    /// Everything is usable.
    None,
    /// Keep `max(base, floor(sqrt(turn / 4)))`.
    TurnScaled {
        /// Minimum reserve.
        base: u32,
    },
}

impl Reserve {
    /// Reserve held back on `turn`.
    #[must_use]
    pub fn amount(self, turn: u32) -> u32 {
        match self {
            Reserve::None => 0,
            Reserve::TurnScaled { base } => {
                let scaled = (f64::from(turn) / 4.0).sqrt().floor() as u32;
                base.max(scaled)
            }
        }
    }
}

/// Share of the usable population each phase commits.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Fractions {
    /// Expand share.
    pub expand: f64,
    /// Attack share.
    pub attack: f64,
    /// Defend share.
    pub defend: f64,
    /// Consolidate share.
    pub consolidate: f64,
    /// Expand share from the turn threshold on. Falls back to `expand`.
    #[serde(default)]
    pub territory_expand: Option<f64>,
}

impl Fractions {
    /// Share for `phase` in the given part of the match.
    #[must_use]
    pub fn of(&self, phase: Phase, turn: TurnSignal) -> f64 {
        match (phase, turn) {
            (Phase::Expand, TurnSignal::Territory) => self.territory_expand.unwrap_or(self.expand),
            (Phase::Expand, TurnSignal::Growth) => self.expand,
            (Phase::Attack, _) => self.attack,
            (Phase::Defend, _) => self.defend,
            (Phase::Consolidate, _) => self.consolidate,
        }
    }

    /// `floor(amount * share)` for `phase`.
    #[must_use]
    pub fn apply(&self, phase: Phase, turn: TurnSignal, amount: u32) -> u32 {
        (f64::from(amount) * self.of(phase, turn)).floor() as u32
    }
}

/// Limits for the sequential capped split.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SplitConfig {
    /// Most a destination may hold after a transfer, as a fraction of the
    /// world's maximum population. `None` leaves destinations uncapped.
    pub ceiling: Option<f64>,
    /// Smallest population a destination must reach for a transfer to be
    /// worth sending.
    pub viability_floor: u32,
}

/// Base weights of the weighted doctrine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Weights {
    /// Expand weight.
    pub expand: f64,
    /// Defend weight.
    pub defend: f64,
    /// Attack weight.
    pub attack: f64,
    /// Added to attack when hostile cells are within the search radius.
    pub nearby_enemy_bonus: f64,
    /// Added to defend when the cell lies near the base.
    pub near_base_bonus: f64,
}

/// Fixed spread sent from every cell on the opening turns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Opening {
    /// Turns on which the spread replaces all other logic.
    pub turns: Vec<u32>,
    /// Amount per direction, in up, down, left, right order.
    pub amounts: [u32; 4],
}

/// Complete tunable configuration of one agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyConfig {
    /// Phase-selection rule.
    pub doctrine: Doctrine,
    /// Seed for tie-breaking and weighted draws.
    pub seed: u64,
    /// First turn of the territory window.
    pub turn_threshold: u32,
    /// Usable population at or below this holds.
    pub defense_threshold: u32,
    /// Usable population above this is aggressive.
    pub aggression_threshold: u32,
    /// Hostile neighbours that put a cell under pressure.
    pub pressure_threshold: u8,
    /// Radius of the hostile search.
    pub search_radius: u32,
    /// Manhattan distance from the base that counts as near.
    pub base_radius: u32,
    /// Population held back every turn.
    pub reserve: Reserve,
    /// In the territory window, raise the defense floor to
    /// `soft_limit / (growth_rate - 1)`.
    pub soft_limit: Option<f64>,
    /// Usable population at or above this fraction of the maximum is
    /// spread evenly in all four directions.
    pub saturation: Option<f64>,
    /// Center cells at or below this send everything up.
    pub bisection_floor: u32,
    /// Capped split limits.
    pub split: SplitConfig,
    /// Opening spread, if any.
    pub opening: Option<Opening>,
    /// Per-phase shares.
    pub fractions: Fractions,
    /// Weights of the weighted doctrine.
    pub weights: Weights,
    /// Evaluate cells on the rayon pool.
    pub parallel: bool,
}

impl Default for StrategyConfig {
    fn default() -> Self {
        Self::preset(Doctrine::Quadrant)
    }
}

impl StrategyConfig {
    /// Built-in profile for `doctrine`.
    #[must_use]
    pub fn preset(doctrine: Doctrine) -> Self {
        let base = Self {
            doctrine,
            seed: 0x5eed,
            turn_threshold: 40,
            defense_threshold: 20,
            aggression_threshold: 50,
            pressure_threshold: 2,
            search_radius: 3,
            base_radius: 5,
            reserve: Reserve::None,
            soft_limit: None,
            saturation: None,
            bisection_floor: 4,
            split: SplitConfig {
                ceiling: Some(1.0),
                viability_floor: 5,
            },
            opening: None,
            fractions: Fractions {
                expand: 0.6,
                attack: 0.5,
                defend: 0.3,
                consolidate: 0.25,
                territory_expand: None,
            },
            weights: Weights {
                expand: 0.4,
                defend: 0.3,
                attack: 0.3,
                nearby_enemy_bonus: 0.2,
                near_base_bonus: 0.3,
            },
            parallel: false,
        };

        match doctrine {
            Doctrine::Frontier | Doctrine::Weighted => base,
            Doctrine::Gravity => Self {
                turn_threshold: 50,
                defense_threshold: 10,
                fractions: Fractions {
                    expand: 0.7,
                    territory_expand: Some(1.0 / 3.0),
                    ..base.fractions
                },
                ..base
            },
            Doctrine::Quadrant => Self {
                turn_threshold: 16,
                defense_threshold: 0,
                reserve: Reserve::TurnScaled { base: 5 },
                soft_limit: Some(0.55),
                saturation: Some(1.0 / 4.9),
                opening: Some(Opening {
                    turns: vec![1, 2],
                    amounts: [20, 25, 25, 25],
                }),
                fractions: Fractions {
                    expand: 1.0,
                    attack: 0.5,
                    defend: 1.0,
                    consolidate: 1.0,
                    territory_expand: None,
                },
                ..base
            },
        }
    }

    /// Read a JSON profile and validate it.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not a valid profile,
    /// or fails [`StrategyConfig::validate`].
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Pretty JSON rendering of this profile.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check that every number is something the engine can work with.
    ///
    /// # Errors
    ///
    /// Returns the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let unit = |field: &'static str, value: f64| {
            if (0.0..=1.0).contains(&value) {
                Ok(())
            } else {
                Err(ConfigError::invalid(field, format!("{value} is outside [0, 1]")))
            }
        };

        unit("fractions.expand", self.fractions.expand)?;
        unit("fractions.attack", self.fractions.attack)?;
        unit("fractions.defend", self.fractions.defend)?;
        unit("fractions.consolidate", self.fractions.consolidate)?;
        if let Some(share) = self.fractions.territory_expand {
            unit("fractions.territory_expand", share)?;
        }

        if let Some(ceiling) = self.split.ceiling {
            if ceiling <= 0.0 || ceiling > 1.0 {
                return Err(ConfigError::invalid(
                    "split.ceiling",
                    format!("{ceiling} is outside (0, 1]"),
                ));
            }
        }
        if let Some(saturation) = self.saturation {
            if saturation <= 0.0 || saturation > 1.0 {
                return Err(ConfigError::invalid(
                    "saturation",
                    format!("{saturation} is outside (0, 1]"),
                ));
            }
        }
        if let Some(soft) = self.soft_limit {
            if !soft.is_finite() || soft < 0.0 {
                return Err(ConfigError::invalid(
                    "soft_limit",
                    format!("{soft} must be a non-negative number"),
                ));
            }
        }

        let weights = [
            self.weights.expand,
            self.weights.defend,
            self.weights.attack,
            self.weights.nearby_enemy_bonus,
            self.weights.near_base_bonus,
        ];
        if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(ConfigError::invalid("weights", "weights must be non-negative"));
        }

        if let Some(opening) = &self.opening {
            if opening.turns.is_empty() && opening.amounts.iter().any(|&a| a > 0) {
                return Err(ConfigError::invalid(
                    "opening.turns",
                    "amounts are set but no opening turn is",
                ));
            }
        }

        Ok(())
    }

    /// Absolute destination ceiling for a world capped at `maximum_population`.
    #[must_use]
    pub fn destination_ceiling(&self, maximum_population: u32) -> Option<u32> {
        self.split
            .ceiling
            .map(|c| (f64::from(maximum_population) * c).floor() as u32)
    }

    /// Usable population at or above which a cell saturates.
    #[must_use]
    pub fn saturation_threshold(&self, maximum_population: u32) -> Option<f64> {
        self.saturation.map(|s| f64::from(maximum_population) * s)
    }

    /// Whether `turn` is an opening turn.
    #[must_use]
    pub fn opening_on(&self, turn: u32) -> Option<&Opening> {
        self.opening.as_ref().filter(|o| o.turns.contains(&turn))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reserve_turn_scaled() {
        let reserve = Reserve::TurnScaled { base: 5 };
        assert_eq!(reserve.amount(0), 5);
        assert_eq!(reserve.amount(100), 5);
        // sqrt(144 / 4) = 6
        assert_eq!(reserve.amount(144), 6);
        assert_eq!(reserve.amount(400), 10);
        assert_eq!(Reserve::None.amount(400), 0);
    }

    #[test]
    fn test_fraction_apply_floors() {
        let config = StrategyConfig::preset(Doctrine::Frontier);
        assert_eq!(config.fractions.apply(Phase::Expand, TurnSignal::Growth, 40), 24);
        assert_eq!(config.fractions.apply(Phase::Attack, TurnSignal::Growth, 41), 20);
    }

    #[test]
    fn test_territory_expand_share() {
        let gravity = StrategyConfig::preset(Doctrine::Gravity);
        assert_eq!(gravity.fractions.apply(Phase::Expand, TurnSignal::Growth, 60), 42);
        assert_eq!(gravity.fractions.apply(Phase::Expand, TurnSignal::Territory, 61), 20);

        let frontier = StrategyConfig::preset(Doctrine::Frontier);
        assert_eq!(frontier.fractions.apply(Phase::Expand, TurnSignal::Territory, 40), 24);
    }

    #[test]
    fn test_presets_validate() {
        for doctrine in Doctrine::ALL {
            let config = StrategyConfig::preset(doctrine);
            assert_eq!(config.doctrine, doctrine);
            assert!(config.validate().is_ok(), "{doctrine} preset is invalid");
        }
    }

    #[test]
    fn test_doctrine_from_str() {
        assert_eq!("Quadrant".parse::<Doctrine>().unwrap(), Doctrine::Quadrant);
        assert!("bogus".parse::<Doctrine>().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_fraction() {
        let mut config = StrategyConfig::preset(Doctrine::Frontier);
        config.fractions.attack = 1.5;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("fractions.attack"));
    }

    #[test]
    fn test_validate_rejects_zero_ceiling() {
        let mut config = StrategyConfig::preset(Doctrine::Quadrant);
        config.split.ceiling = Some(0.0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_json_round_trip_through_file() {
        let config = StrategyConfig::preset(Doctrine::Gravity);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gravity.json");
        std::fs::write(&path, config.to_json().unwrap()).unwrap();

        let loaded = StrategyConfig::load(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_missing_file() {
        let err = StrategyConfig::load(Path::new("/nonexistent/profile.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_destination_ceiling() {
        let config = StrategyConfig::preset(Doctrine::Quadrant);
        assert_eq!(config.destination_ceiling(100), Some(100));
        assert!(config.saturation_threshold(100).unwrap() > 20.0);
        assert!(config.opening_on(1).is_some());
        assert!(config.opening_on(3).is_none());
    }
}
