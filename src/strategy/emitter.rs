//! Turn output: movement commands in decision order.

use crate::grid::{Coord, Direction};
use crate::strategy::allocation::Transfer;

/// Send `amount` population from `source` one cell towards `direction`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MovementCommand {
    /// Cell the population leaves.
    pub source: Coord,
    /// Direction of the neighbouring destination.
    pub direction: Direction,
    /// Population moved.
    pub amount: u32,
}

impl MovementCommand {
    /// Create a new command.
    #[must_use]
    pub const fn new(source: Coord, direction: Direction, amount: u32) -> Self {
        Self {
            source,
            direction,
            amount,
        }
    }
}

impl std::fmt::Display for MovementCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} {}", self.source, self.direction, self.amount)
    }
}

/// Collects a turn's commands.
///
/// Zero amounts are dropped. Nothing is merged or validated: two transfers
/// in the same direction from the same cell become two commands.
#[derive(Debug, Clone, Default)]
pub struct CommandList {
    commands: Vec<MovementCommand>,
}

impl CommandList {
    /// Create an empty list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty list with room for `capacity` commands.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            commands: Vec::with_capacity(capacity),
        }
    }

    /// Append one command unless its amount is zero.
    pub fn push(&mut self, source: Coord, direction: Direction, amount: u32) {
        if amount > 0 {
            self.commands
                .push(MovementCommand::new(source, direction, amount));
        }
    }

    /// Append every transfer planned for `source`.
    pub fn extend(&mut self, source: Coord, transfers: &[Transfer]) {
        for t in transfers {
            self.push(source, t.direction, t.amount);
        }
    }

    /// Number of commands so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Whether no command was collected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Hand the finished list to the caller.
    #[must_use]
    pub fn finish(self) -> Vec<MovementCommand> {
        self.commands
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_amounts_dropped() {
        let mut list = CommandList::new();
        list.push(Coord::new(0, 0), Direction::Up, 0);
        list.push(Coord::new(0, 0), Direction::Down, 3);
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn test_duplicates_kept_in_order() {
        let mut list = CommandList::new();
        let c = Coord::new(1, 1);
        list.extend(
            c,
            &[
                Transfer {
                    direction: Direction::Left,
                    amount: 4,
                },
                Transfer {
                    direction: Direction::Left,
                    amount: 6,
                },
            ],
        );
        let commands = list.finish();
        assert_eq!(
            commands,
            vec![
                MovementCommand::new(c, Direction::Left, 4),
                MovementCommand::new(c, Direction::Left, 6),
            ]
        );
    }

    #[test]
    fn test_display() {
        let cmd = MovementCommand::new(Coord::new(2, 3), Direction::Right, 7);
        assert_eq!(cmd.to_string(), "(2, 3) RIGHT 7");
    }
}
