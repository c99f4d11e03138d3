//! Grid geometry: coordinates and the four cardinal directions.
//!
//! Everything here is pure arithmetic. Wrapping, bounds and any other
//! topology rule belong to the world (see [`crate::view::WorldView`]).

mod coord;
mod direction;

pub use coord::Coord;
pub use direction::Direction;
