//! Agent state that persists across turns.

use crate::grid::Coord;
use crate::view::WorldView;

/// What one agent remembers between decision calls.
///
/// Only [`crate::strategy::Strategist::decide`] mutates it, once per call
/// and before any cell is evaluated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AgentState {
    base: Option<Coord>,
    turn: u32,
}

impl AgentState {
    /// Fresh state for the start of a match.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            base: None,
            turn: 0,
        }
    }

    /// Remembered base anchor.
    #[must_use]
    pub const fn base(&self) -> Option<Coord> {
        self.base
    }

    /// Latest turn observed. Never decreases.
    #[must_use]
    pub const fn turn(&self) -> u32 {
        self.turn
    }

    /// Fold this turn's view into the state and return the base to use.
    ///
    /// The base is the first owned cell ever seen. If it has been lost it
    /// moves to the owned cell nearest to where it was (ties broken in
    /// row-major order). Returns `None` only when nothing is owned.
    pub fn observe<V: WorldView + ?Sized>(&mut self, view: &V, owned: &[Coord]) -> Option<Coord> {
        self.turn = self.turn.max(view.current_turn());

        let first = *owned.first()?;
        let base = match self.base {
            None => first,
            Some(base) if view.belongs_to_me(base) => base,
            Some(lost) => {
                let anchor = owned
                    .iter()
                    .copied()
                    .min_by_key(|&c| (view.distance(lost, c), c.row_major()))
                    .unwrap_or(first);
                tracing::debug!(%lost, %anchor, turn = self.turn, "base lost, re-anchoring");
                anchor
            }
        };

        self.base = Some(base);
        Some(base)
    }
}
