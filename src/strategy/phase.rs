//! Phase selection.
//!
//! A cell's phase is a pure function of a handful of signals gathered for
//! that cell this turn. Nothing here survives the turn except through the
//! turn counter and base anchor kept in [`crate::strategy::AgentState`].

use std::collections::HashMap;

use rand::Rng;

use crate::grid::{Coord, Direction};
use crate::strategy::analyzer::{Analyzer, Posture};
use crate::strategy::config::{Doctrine, StrategyConfig};
use crate::view::WorldView;

/// Operating mode governing how a cell spends its population this turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Claim empty ground.
    Expand,
    /// Push into hostile cells.
    Attack,
    /// Hold the line against pressure.
    Defend,
    /// Move population within our own territory.
    Consolidate,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Phase::Expand => "expand",
            Phase::Attack => "attack",
            Phase::Defend => "defend",
            Phase::Consolidate => "consolidate",
        };
        f.write_str(name)
    }
}

/// Which part of the match we are in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnSignal {
    /// Before the turn threshold.
    Growth,
    /// From the turn threshold on.
    Territory,
}

impl TurnSignal {
    /// Classify `turn` against `threshold`.
    ///
    /// Monotonic: once a turn is `Territory`, every later turn is too.
    #[must_use]
    pub const fn of(turn: u32, threshold: u32) -> Self {
        if turn < threshold {
            TurnSignal::Growth
        } else {
            TurnSignal::Territory
        }
    }
}

/// Population tier of a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    /// At or below the defense floor: the cell does nothing this turn.
    Dormant,
    /// Above the defense floor.
    Defensive,
    /// Above the aggression threshold.
    Aggressive,
}

impl Tier {
    /// Classify `population` against the two thresholds.
    #[must_use]
    pub fn of(population: u32, defense_floor: f64, aggression: u32) -> Self {
        if f64::from(population) <= defense_floor {
            Tier::Dormant
        } else if population > aggression {
            Tier::Aggressive
        } else {
            Tier::Defensive
        }
    }
}

/// Position of a cell relative to the base anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quadrant {
    /// The base itself.
    Center,
    /// Left of and above the base.
    UpperLeft,
    /// Right of and above the base.
    UpperRight,
    /// Left of and below the base.
    LowerLeft,
    /// Right of and below the base.
    LowerRight,
    /// Straight above the base.
    Above,
    /// Straight below the base.
    Below,
    /// Straight left of the base.
    LeftOf,
    /// Straight right of the base.
    RightOf,
}

impl Quadrant {
    /// Classify `cell` relative to `base`.
    #[must_use]
    pub fn of(cell: Coord, base: Coord) -> Self {
        use std::cmp::Ordering::{Equal, Greater, Less};

        match (cell.x.cmp(&base.x), cell.y.cmp(&base.y)) {
            (Equal, Equal) => Quadrant::Center,
            (Less, Less) => Quadrant::UpperLeft,
            (Greater, Less) => Quadrant::UpperRight,
            (Less, Greater) => Quadrant::LowerLeft,
            (Greater, Greater) => Quadrant::LowerRight,
            (Equal, Less) => Quadrant::Above,
            (Equal, Greater) => Quadrant::Below,
            (Less, Equal) => Quadrant::LeftOf,
            (Greater, Equal) => Quadrant::RightOf,
        }
    }

    /// Directions pointing away from the base.
    ///
    /// Two for diagonal quadrants, three for the axes (both perpendiculars
    /// and straight on), none for the center.
    #[must_use]
    pub const fn outward(self) -> &'static [Direction] {
        use Direction::{Down, Left, Right, Up};

        match self {
            Quadrant::Center => &[],
            Quadrant::UpperLeft => &[Left, Up],
            Quadrant::UpperRight => &[Right, Up],
            Quadrant::LowerLeft => &[Left, Down],
            Quadrant::LowerRight => &[Right, Down],
            Quadrant::Above => &[Right, Up, Left],
            Quadrant::Below => &[Right, Down, Left],
            Quadrant::LeftOf => &[Down, Up, Left],
            Quadrant::RightOf => &[Right, Up, Down],
        }
    }
}

/// Hostile pressure on each owned cell, rebuilt every turn.
#[derive(Debug, Clone, Default)]
pub struct GravityMap {
    scores: HashMap<Coord, u8>,
}

impl GravityMap {
    /// Score every cell in `cells` by its number of hostile neighbours.
    #[must_use]
    pub fn compute<V: WorldView + ?Sized>(analyzer: &Analyzer<'_, V>, cells: &[Coord]) -> Self {
        let scores = cells
            .iter()
            .map(|&cell| (cell, analyzer.count_enemy(cell)))
            .collect();
        Self { scores }
    }

    /// Pressure on `cell`, zero for cells that were not scored.
    #[must_use]
    pub fn get(&self, cell: Coord) -> u8 {
        self.scores.get(&cell).copied().unwrap_or(0)
    }

    /// Number of scored cells.
    #[must_use]
    pub fn len(&self) -> usize {
        self.scores.len()
    }

    /// Whether no cell was scored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }
}

/// Everything the controller looks at for one cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Signals {
    /// Growth or territory part of the match.
    pub turn: TurnSignal,
    /// Population tier.
    pub tier: Tier,
    /// Position relative to the base.
    pub quadrant: Quadrant,
    /// Inner/outer/corner classification.
    pub posture: Posture,
    /// Friendly neighbour count.
    pub friendly: u8,
    /// Hostile neighbour count.
    pub gravity: u8,
    /// Nearest hostile cell along an axis, if looked for.
    pub sighted: Option<Direction>,
    /// Whether hostile cells are within the search radius, if looked for.
    pub hostile_nearby: bool,
    /// Whether the cell is close to the base.
    pub near_base: bool,
}

/// Pick the phase for a cell, or `None` when it should hold this turn.
pub fn select<R: Rng>(
    config: &StrategyConfig,
    signals: &Signals,
    rng: &mut R,
) -> Option<Phase> {
    if signals.tier == Tier::Dormant {
        return None;
    }

    let phase = match config.doctrine {
        Doctrine::Frontier => {
            if signals.turn == TurnSignal::Growth && signals.friendly < 3 {
                Phase::Expand
            } else if signals.tier == Tier::Aggressive {
                Phase::Attack
            } else {
                Phase::Defend
            }
        }
        Doctrine::Gravity => match signals.turn {
            TurnSignal::Growth => Phase::Expand,
            TurnSignal::Territory => {
                if signals.tier == Tier::Aggressive && signals.gravity > 0 {
                    Phase::Attack
                } else if signals.tier == Tier::Aggressive {
                    Phase::Expand
                } else if signals.gravity >= config.pressure_threshold {
                    Phase::Defend
                } else {
                    Phase::Consolidate
                }
            }
        },
        Doctrine::Quadrant => match (signals.turn, signals.posture) {
            (TurnSignal::Growth, Posture::Inner) => Phase::Consolidate,
            (TurnSignal::Growth, _) => Phase::Expand,
            (TurnSignal::Territory, _) if signals.sighted.is_some() => Phase::Attack,
            (TurnSignal::Territory, Posture::Inner) => Phase::Defend,
            (TurnSignal::Territory, _) => Phase::Expand,
        },
        Doctrine::Weighted => weighted_draw(config, signals, rng),
    };

    Some(phase)
}

fn weighted_draw<R: Rng>(config: &StrategyConfig, signals: &Signals, rng: &mut R) -> Phase {
    let weights = &config.weights;
    let expand = weights.expand;
    let mut defend = weights.defend;
    let mut attack = weights.attack;

    if signals.hostile_nearby {
        attack += weights.nearby_enemy_bonus;
    }
    if signals.near_base {
        defend += weights.near_base_bonus;
    }

    let total = expand + defend + attack;
    if total <= 0.0 {
        return Phase::Defend;
    }

    let roll = rng.gen_range(0.0..total);
    if roll < expand {
        Phase::Expand
    } else if roll < expand + defend {
        Phase::Defend
    } else {
        Phase::Attack
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn signals() -> Signals {
        Signals {
            turn: TurnSignal::Growth,
            tier: Tier::Defensive,
            quadrant: Quadrant::Center,
            posture: Posture::Outer,
            friendly: 0,
            gravity: 0,
            sighted: None,
            hostile_nearby: false,
            near_base: false,
        }
    }

    #[test]
    fn test_turn_signal_threshold() {
        assert_eq!(TurnSignal::of(39, 40), TurnSignal::Growth);
        assert_eq!(TurnSignal::of(40, 40), TurnSignal::Territory);
        assert_eq!(TurnSignal::of(41, 40), TurnSignal::Territory);
    }

    #[test]
    fn test_tier_boundaries() {
        assert_eq!(Tier::of(20, 20.0, 50), Tier::Dormant);
        assert_eq!(Tier::of(21, 20.0, 50), Tier::Defensive);
        assert_eq!(Tier::of(50, 20.0, 50), Tier::Defensive);
        assert_eq!(Tier::of(51, 20.0, 50), Tier::Aggressive);
    }

    #[test]
    fn test_quadrant_covers_all_nine_classes() {
        let base = Coord::new(5, 5);
        assert_eq!(Quadrant::of(base, base), Quadrant::Center);
        assert_eq!(Quadrant::of(Coord::new(4, 4), base), Quadrant::UpperLeft);
        assert_eq!(Quadrant::of(Coord::new(6, 4), base), Quadrant::UpperRight);
        assert_eq!(Quadrant::of(Coord::new(4, 6), base), Quadrant::LowerLeft);
        assert_eq!(Quadrant::of(Coord::new(6, 6), base), Quadrant::LowerRight);
        assert_eq!(Quadrant::of(Coord::new(5, 1), base), Quadrant::Above);
        assert_eq!(Quadrant::of(Coord::new(5, 9), base), Quadrant::Below);
        assert_eq!(Quadrant::of(Coord::new(1, 5), base), Quadrant::LeftOf);
        assert_eq!(Quadrant::of(Coord::new(9, 5), base), Quadrant::RightOf);
    }

    #[test]
    fn test_outward_directions() {
        assert_eq!(
            Quadrant::UpperLeft.outward(),
            &[Direction::Left, Direction::Up]
        );
        assert_eq!(Quadrant::Above.outward().len(), 3);
        assert!(Quadrant::Center.outward().is_empty());
    }

    #[test]
    fn test_dormant_holds() {
        let config = StrategyConfig::preset(Doctrine::Frontier);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let s = Signals {
            tier: Tier::Dormant,
            ..signals()
        };
        assert_eq!(select(&config, &s, &mut rng), None);
    }

    #[test]
    fn test_frontier_table() {
        let config = StrategyConfig::preset(Doctrine::Frontier);
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        assert_eq!(select(&config, &signals(), &mut rng), Some(Phase::Expand));

        let crowded = Signals {
            friendly: 3,
            ..signals()
        };
        assert_eq!(select(&config, &crowded, &mut rng), Some(Phase::Defend));

        let strong = Signals {
            turn: TurnSignal::Territory,
            tier: Tier::Aggressive,
            ..signals()
        };
        assert_eq!(select(&config, &strong, &mut rng), Some(Phase::Attack));
    }

    #[test]
    fn test_gravity_table() {
        let config = StrategyConfig::preset(Doctrine::Gravity);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let late = Signals {
            turn: TurnSignal::Territory,
            ..signals()
        };

        assert_eq!(select(&config, &signals(), &mut rng), Some(Phase::Expand));
        assert_eq!(select(&config, &late, &mut rng), Some(Phase::Consolidate));

        let pressed = Signals { gravity: 2, ..late };
        assert_eq!(select(&config, &pressed, &mut rng), Some(Phase::Defend));

        let strong = Signals {
            tier: Tier::Aggressive,
            gravity: 1,
            ..late
        };
        assert_eq!(select(&config, &strong, &mut rng), Some(Phase::Attack));

        let unopposed = Signals { gravity: 0, ..strong };
        assert_eq!(select(&config, &unopposed, &mut rng), Some(Phase::Expand));
    }

    #[test]
    fn test_quadrant_table() {
        let config = StrategyConfig::preset(Doctrine::Quadrant);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let inner = Signals {
            posture: Posture::Inner,
            ..signals()
        };
        assert_eq!(select(&config, &inner, &mut rng), Some(Phase::Consolidate));

        let late_inner = Signals {
            turn: TurnSignal::Territory,
            ..inner
        };
        assert_eq!(select(&config, &late_inner, &mut rng), Some(Phase::Defend));

        let sighted = Signals {
            sighted: Some(Direction::Left),
            ..late_inner
        };
        assert_eq!(select(&config, &sighted, &mut rng), Some(Phase::Attack));
    }

    #[test]
    fn test_weighted_draw_is_seeded() {
        let config = StrategyConfig::preset(Doctrine::Weighted);
        let draw = |seed| {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            (0..32)
                .map(|_| select(&config, &signals(), &mut rng))
                .collect::<Vec<_>>()
        };
        assert_eq!(draw(7), draw(7));
        assert!(draw(7).iter().all(Option::is_some));
    }
}
