//! The per-turn decision entry point.
//!
//! One call to [`Strategist::decide`] folds the view into [`AgentState`],
//! precomputes the gravity map, then plans every owned cell independently
//! against its own [`Budget`](crate::strategy::Budget). Cells
//! read nothing another cell writes, so the pass can run on the rayon pool
//! without changing the output.

use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;

use crate::grid::{Coord, Direction};
use crate::strategy::allocation::{Allocation, Limits, Target, Transfer};
use crate::strategy::analyzer::{Analyzer, Layout, Posture};
use crate::strategy::config::{Doctrine, StrategyConfig};
use crate::strategy::emitter::{CommandList, MovementCommand};
use crate::strategy::phase::{self, GravityMap, Phase, Quadrant, Signals, Tier, TurnSignal};
use crate::strategy::state::AgentState;
use crate::view::WorldView;

/// One agent: a fixed profile plus the state it carries between turns.
#[derive(Debug, Clone)]
pub struct Strategist {
    config: StrategyConfig,
    state: AgentState,
}

/// Read-only inputs shared by every cell of one decision call.
struct Turn<'a, V: ?Sized> {
    config: &'a StrategyConfig,
    analyzer: Analyzer<'a, V>,
    gravity: GravityMap,
    base: Coord,
    turn: u32,
}

impl Strategist {
    /// Create an agent with a fresh state.
    #[must_use]
    pub fn new(config: StrategyConfig) -> Self {
        Self {
            config,
            state: AgentState::new(),
        }
    }

    /// The profile this agent plays.
    #[must_use]
    pub const fn config(&self) -> &StrategyConfig {
        &self.config
    }

    /// State carried between turns.
    #[must_use]
    pub const fn state(&self) -> &AgentState {
        &self.state
    }

    /// Decide this turn's commands.
    ///
    /// For every owned cell, the commands naming it as source never send
    /// more than its population at the start of the call.
    pub fn decide<V: WorldView + ?Sized>(&mut self, view: &V) -> Vec<MovementCommand> {
        let owned = view.owned_cells();
        let Some(base) = self.state.observe(view, &owned) else {
            tracing::debug!(turn = view.current_turn(), "no owned cells");
            return Vec::new();
        };
        let turn = self.state.turn();
        let _span = tracing::debug_span!("decide", turn, owned = owned.len()).entered();

        if let Some(opening) = self.config.opening_on(turn) {
            let mut commands = CommandList::with_capacity(owned.len() * 4);
            for &cell in &owned {
                let mut plan = Allocation::new(view.population(cell));
                plan.spread(opening.amounts);
                commands.extend(cell, plan.transfers());
            }
            tracing::debug!(commands = commands.len(), "opening spread");
            return commands.finish();
        }

        let analyzer = Analyzer::new(view);
        let gravity = GravityMap::compute(&analyzer, &owned);
        let ctx = Turn {
            config: &self.config,
            analyzer,
            gravity,
            base,
            turn,
        };

        let plans: Vec<Vec<Transfer>> = if self.config.parallel {
            owned.par_iter().map(|&cell| ctx.plan(cell)).collect()
        } else {
            owned.iter().map(|&cell| ctx.plan(cell)).collect()
        };

        let mut commands = CommandList::with_capacity(owned.len());
        for (&cell, transfers) in owned.iter().zip(&plans) {
            commands.extend(cell, transfers);
        }
        tracing::debug!(commands = commands.len(), "decided");
        commands.finish()
    }
}

/// Seed for one cell on one turn, independent of evaluation order.
#[allow(clippy::cast_sign_loss)]
fn cell_seed(seed: u64, turn: u32, cell: Coord) -> u64 {
    // splitmix64 finalizer over the packed inputs
    let packed = (u64::from(cell.x as u32) << 32) | u64::from(cell.y as u32);
    let mut z = seed ^ u64::from(turn).rotate_left(17) ^ packed.wrapping_mul(0x9e37_79b9_7f4a_7c15);
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}

impl<V: WorldView + ?Sized> Turn<'_, V> {
    fn view(&self) -> &V {
        self.analyzer.view()
    }

    fn plan(&self, cell: Coord) -> Vec<Transfer> {
        let config = self.config;
        let view = self.view();
        let population = view.population(cell);
        let usable = population.saturating_sub(config.reserve.amount(self.turn));
        if usable == 0 {
            return Vec::new();
        }

        let layout = self.analyzer.layout(cell);
        let signals = self.signals(cell, usable, &layout);
        let mut rng = ChaCha8Rng::seed_from_u64(cell_seed(config.seed, self.turn, cell));
        let mut plan = Allocation::new(usable);

        let saturated = signals.turn == TurnSignal::Territory
            && signals.tier != Tier::Dormant
            && config
                .saturation_threshold(view.maximum_population())
                .is_some_and(|threshold| f64::from(usable) >= threshold);

        if saturated {
            plan.saturate();
            tracing::trace!(%cell, usable, "saturated");
            return plan.into_transfers();
        }

        let Some(phase) = phase::select(config, &signals, &mut rng) else {
            return Vec::new();
        };

        match config.doctrine {
            Doctrine::Quadrant => self.quadrant(cell, phase, &signals, &layout, &mut plan),
            Doctrine::Frontier | Doctrine::Gravity | Doctrine::Weighted => {
                if let Some(direction) = self.target(cell, phase, &layout, &mut rng) {
                    plan.focus(direction, config.fractions.apply(phase, signals.turn, usable));
                }
            }
        }

        tracing::trace!(%cell, %phase, usable, sent = plan.total(), "planned");
        plan.into_transfers()
    }

    fn signals(&self, cell: Coord, usable: u32, layout: &Layout) -> Signals {
        let config = self.config;
        let view = self.view();
        let turn = TurnSignal::of(self.turn, config.turn_threshold);

        let mut defense_floor = f64::from(config.defense_threshold);
        if let (TurnSignal::Territory, Some(soft)) = (turn, config.soft_limit) {
            let margin = view.growth_rate() - 1.0;
            if margin > 0.0 {
                defense_floor = defense_floor.max(soft / margin);
            }
        }

        let sighted = if config.doctrine == Doctrine::Quadrant && turn == TurnSignal::Territory {
            self.analyzer.sight_line(cell)
        } else {
            None
        };
        let hostile_nearby = config.doctrine == Doctrine::Weighted
            && !self
                .analyzer
                .enemies_in_radius(cell, config.search_radius)
                .is_empty();

        Signals {
            turn,
            tier: Tier::of(usable, defense_floor, config.aggression_threshold),
            quadrant: Quadrant::of(cell, self.base),
            posture: layout.posture,
            friendly: self.analyzer.count_friendly(cell),
            gravity: self.gravity.get(cell),
            sighted,
            hostile_nearby,
            near_base: view.distance(cell, self.base) <= config.base_radius,
        }
    }

    /// Single destination for the focused doctrines, ties broken by `rng`.
    fn target(
        &self,
        cell: Coord,
        phase: Phase,
        layout: &Layout,
        rng: &mut ChaCha8Rng,
    ) -> Option<Direction> {
        let analyzer = &self.analyzer;
        let gravity = self.config.doctrine == Doctrine::Gravity;
        let candidates = match phase {
            Phase::Expand if !gravity => {
                let empty = analyzer.empty_directions(cell);
                let best = empty
                    .iter()
                    .map(|&d| analyzer.expansion_score(cell, d))
                    .max();
                empty
                    .into_iter()
                    .filter(|&d| Some(analyzer.expansion_score(cell, d)) == best)
                    .collect()
            }
            Phase::Attack if gravity => analyzer.enemy_cluster_directions(cell),
            Phase::Attack => analyzer.weakest_enemy_directions(cell),
            Phase::Defend if gravity => analyzer.weakest_enemy_directions(cell),
            Phase::Expand | Phase::Defend | Phase::Consolidate => layout.outer.clone(),
        };
        candidates.choose(rng).copied()
    }

    fn quadrant(
        &self,
        cell: Coord,
        phase: Phase,
        signals: &Signals,
        layout: &Layout,
        plan: &mut Allocation,
    ) {
        let config = self.config;
        let limits = Limits {
            ceiling: config.destination_ceiling(self.view().maximum_population()),
            floor: config.split.viability_floor,
        };
        if signals.turn == TurnSignal::Growth {
            let directions = match phase {
                Phase::Consolidate => &layout.inner,
                _ => &layout.outer,
            };
            plan.capped_split(&self.targets(cell, directions), limits);
            return;
        }

        if let (Phase::Attack, Some(direction)) = (phase, signals.sighted) {
            plan.focus(direction, config.fractions.apply(phase, signals.turn, plan.remaining()));
        }

        match layout.posture {
            Posture::Inner => plan.bisect(
                signals.quadrant,
                &self.targets(cell, &layout.inner),
                limits,
                config.bisection_floor,
            ),
            Posture::Outer => {
                let parts = u32::try_from(layout.outer.len()).unwrap_or(u32::MAX);
                plan.even_split(&layout.outer, parts);
            }
            Posture::Corner => plan.even_split(&layout.outer, 2),
        }
    }

    fn targets(&self, cell: Coord, directions: &[Direction]) -> Vec<Target> {
        directions
            .iter()
            .map(|&direction| Target {
                direction,
                occupancy: self
                    .analyzer
                    .friendly_population(self.analyzer.neighbor(cell, direction)),
            })
            .collect()
    }
}
