//! Coordinates on the grid.

use crate::grid::Direction;

/// A cell position. `y` grows downwards, so [`Direction::Up`] decreases it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Coord {
    /// Column.
    pub x: i32,
    /// Row.
    pub y: i32,
}

impl Coord {
    /// Create a new coordinate.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The adjacent coordinate in `direction`.
    #[must_use]
    #[inline]
    pub const fn neighbor(self, direction: Direction) -> Self {
        self.step(direction, 1)
    }

    /// The coordinate `steps` cells away along `direction`.
    ///
    /// `steps == 0` returns `self`.
    #[must_use]
    #[inline]
    pub const fn step(self, direction: Direction, steps: i32) -> Self {
        let (dx, dy) = direction.delta();
        Self {
            x: self.x.wrapping_add(dx.wrapping_mul(steps)),
            y: self.y.wrapping_add(dy.wrapping_mul(steps)),
        }
    }

    /// Manhattan distance `|ax - bx| + |ay - by|`.
    #[must_use]
    pub const fn manhattan(self, other: Self) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    /// Row-major sort key, used wherever a stable order among cells is needed.
    #[must_use]
    pub const fn row_major(self) -> (i32, i32) {
        (self.y, self.x)
    }
}

impl std::fmt::Display for Coord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_neighbor_offsets() {
        let c = Coord::new(5, 5);
        assert_eq!(c.neighbor(Direction::Up), Coord::new(5, 4));
        assert_eq!(c.neighbor(Direction::Down), Coord::new(5, 6));
        assert_eq!(c.neighbor(Direction::Left), Coord::new(4, 5));
        assert_eq!(c.neighbor(Direction::Right), Coord::new(6, 5));
    }

    #[test]
    fn test_step_zero_is_identity() {
        let c = Coord::new(-3, 7);
        for dir in Direction::ALL {
            assert_eq!(c.step(dir, 0), c);
        }
    }

    #[test]
    fn test_step_distance() {
        let c = Coord::new(0, 0);
        assert_eq!(c.step(Direction::Right, 4), Coord::new(4, 0));
        assert_eq!(c.step(Direction::Up, 3), Coord::new(0, -3));
    }

    #[test]
    fn test_manhattan() {
        assert_eq!(Coord::new(1, 2).manhattan(Coord::new(4, -2)), 7);
        assert_eq!(Coord::new(3, 3).manhattan(Coord::new(3, 3)), 0);
    }
}
