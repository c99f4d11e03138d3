//! The read-only world contract consumed by the strategy engine.

use crate::grid::{Coord, Direction};

/// Read-only snapshot of the world for one player and one turn.
///
/// Implementations must stay immutable for the duration of a decision
/// call. The engine trusts the data to be internally consistent and may
/// query it from several threads at once.
pub trait WorldView: Sync {
    /// Current turn number.
    fn current_turn(&self) -> u32;

    /// Cells owned by this player, in a stable order.
    fn owned_cells(&self) -> Vec<Coord>;

    /// Population of `cell` (zero for empty cells).
    fn population(&self, cell: Coord) -> u32;

    /// Whether `cell` is owned by this player.
    fn belongs_to_me(&self, cell: Coord) -> bool;

    /// Whether `cell` has no owner.
    fn is_empty(&self, cell: Coord) -> bool;

    /// Per-turn multiplicative growth rate (e.g. `1.1`).
    fn growth_rate(&self) -> f64;

    /// Side length of the universe.
    fn universe_size(&self) -> u32;

    /// Population cap of a single cell.
    fn maximum_population(&self) -> u32;

    /// The cell `steps` away from `cell` along `direction`.
    ///
    /// The default is plain coordinate arithmetic. Worlds with wrapping
    /// edges override this.
    fn neighbor(&self, cell: Coord, direction: Direction, steps: u32) -> Coord {
        cell.step(direction, i32::try_from(steps).unwrap_or(i32::MAX))
    }

    /// Walking distance between two cells. The default is plain Manhattan
    /// distance; wrapped worlds measure the short way round.
    fn distance(&self, a: Coord, b: Coord) -> u32 {
        a.manhattan(b)
    }

    /// Whether `cell` exists in this world. Cells outside a bounded world
    /// are walls: neither friendly, hostile nor empty.
    fn contains(&self, _cell: Coord) -> bool {
        true
    }
}
