//! Strategy decision engine.
//!
//! Turns a read-only [`WorldView`](crate::view::WorldView) into one turn's
//! movement commands:
//! - Neighbourhood analysis (counts, weakest enemies, clusters, radius search)
//! - Phase selection per cell from turn, tier and spatial signals
//! - Population allocation against a per-cell budget
//! - Command emission in decision order

mod allocation;
mod analyzer;
mod config;
mod emitter;
mod engine;
mod phase;
mod state;

pub use allocation::{Allocation, Budget, Limits, Target, Transfer};
pub use analyzer::{manhattan_distance, Analyzer, Layout, Occupant, Posture};
pub use config::{
    Doctrine, Fractions, Opening, Reserve, SplitConfig, StrategyConfig, Weights,
};
pub use emitter::{CommandList, MovementCommand};
pub use engine::Strategist;
pub use phase::{select, GravityMap, Phase, Quadrant, Signals, Tier, TurnSignal};
pub use state::AgentState;
