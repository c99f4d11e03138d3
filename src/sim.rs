//! Reference world for running strategies against each other.
//!
//! Not part of the decision engine: it exists so agents can be played,
//! benchmarked and tested end to end.
//! - [`Universe`]: square grid of owned, populated cells with turn resolution
//! - [`PlayerView`]: one player's [`WorldView`](crate::view::WorldView)
//! - [`play_match`]: deterministic match from a seed and a set of profiles

mod runner;
mod universe;

pub use runner::{play_match, MatchConfig, MatchResult, PlayerSummary};
pub use universe::{Cell, PlayerView, Topology, Universe};

/// Maximum number of players in one match.
pub const MAX_PLAYERS: usize = 4;

/// Smallest universe that still separates four starting cells.
pub const MIN_UNIVERSE_SIZE: u32 = 4;

/// Player identifier, starting at 1.
pub type PlayerId = u8;
