// Allow unwrap in tests (test code is not production)
#![cfg_attr(test, allow(clippy::unwrap_used))]
//! gridwar: a deterministic strategy engine for turn-based grid population
//! contests.
//!
//! Each turn an agent receives a read-only [`WorldView`] and answers with a
//! list of [`MovementCommand`]s. The crate provides:
//! - Neighbourhood analysis over the view
//! - Per-cell phase selection (expand, attack, defend, consolidate)
//! - Population allocation that never over-commits a cell
//! - A reference world to play profiles against each other
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │   Match Runner (sim, CLI)           │
//! ├─────────────────────────────────────┤
//! │   Strategist::decide                │
//! │   phase ─ allocation ─ emitter      │
//! ├─────────────────────────────────────┤
//! │   Analyzer over WorldView           │
//! └─────────────────────────────────────┘
//! ```

pub mod error;
pub mod grid;
pub mod sim;
pub mod strategy;
pub mod view;

pub use error::{ConfigError, MatchError};
pub use grid::{Coord, Direction};
pub use strategy::{Doctrine, MovementCommand, StrategyConfig, Strategist};
pub use view::WorldView;
