//! Population allocation.
//!
//! An [`Allocation`] draws from a single [`Budget`] no larger than the
//! source cell's population, so however many sub-policies a plan chains
//! together, the transfers out of one cell never exceed what it holds.

use crate::grid::Direction;
use crate::strategy::phase::Quadrant;

/// One direction and how much population to send there.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transfer {
    /// Where the population goes.
    pub direction: Direction,
    /// How much.
    pub amount: u32,
}

/// Population still available to a cell this turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Budget {
    remaining: u32,
}

impl Budget {
    /// Start with `amount` available.
    #[must_use]
    pub const fn new(amount: u32) -> Self {
        Self { remaining: amount }
    }

    /// Population not yet committed.
    #[must_use]
    pub const fn remaining(&self) -> u32 {
        self.remaining
    }

    /// Commit up to `amount`, returning what was actually taken.
    pub fn take(&mut self, amount: u32) -> u32 {
        let taken = amount.min(self.remaining);
        self.remaining -= taken;
        taken
    }
}

/// A candidate destination for the capped split.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Target {
    /// Direction of the destination.
    pub direction: Direction,
    /// Population already there that counts against the ceiling.
    pub occupancy: u32,
}

/// Destination limits of the capped split.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Limits {
    /// Most a destination may hold after the transfer.
    pub ceiling: Option<u32>,
    /// Least a destination must hold after the transfer.
    pub floor: u32,
}

impl Limits {
    /// No ceiling and no floor.
    pub const UNBOUNDED: Limits = Limits {
        ceiling: None,
        floor: 0,
    };
}

/// Transfers planned for one cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Allocation {
    budget: Budget,
    transfers: Vec<Transfer>,
}

impl Allocation {
    /// Plan against `available` population.
    #[must_use]
    pub fn new(available: u32) -> Self {
        Self {
            budget: Budget::new(available),
            transfers: Vec::with_capacity(4),
        }
    }

    /// Population not yet committed.
    #[must_use]
    pub const fn remaining(&self) -> u32 {
        self.budget.remaining()
    }

    /// Transfers planned so far.
    #[must_use]
    pub fn transfers(&self) -> &[Transfer] {
        &self.transfers
    }

    /// Consume the plan.
    #[must_use]
    pub fn into_transfers(self) -> Vec<Transfer> {
        self.transfers
    }

    /// Sum of all planned amounts.
    #[must_use]
    pub fn total(&self) -> u32 {
        self.transfers.iter().map(|t| t.amount).sum()
    }

    fn send(&mut self, direction: Direction, amount: u32) -> u32 {
        let amount = self.budget.take(amount);
        if amount > 0 {
            self.transfers.push(Transfer { direction, amount });
        }
        amount
    }

    /// Send `amount` (or whatever is left) in one direction.
    pub fn focus(&mut self, direction: Direction, amount: u32) -> u32 {
        self.send(direction, amount)
    }

    /// Sequential capped split over `targets`, in the given order.
    ///
    /// The i-th of k targets is offered `remaining / (k - i)`, cut down to
    /// the room left under the ceiling. A transfer that would leave its
    /// destination below the floor is skipped and its share stays here.
    pub fn capped_split(&mut self, targets: &[Target], limits: Limits) {
        let k = targets.len();
        for (i, target) in targets.iter().enumerate() {
            let left = u32::try_from(k - i).unwrap_or(u32::MAX);
            let share = self.budget.remaining() / left;
            let room = limits
                .ceiling
                .map_or(u32::MAX, |c| c.saturating_sub(target.occupancy));
            let amount = share.min(room);

            if amount > 0 && target.occupancy.saturating_add(amount) >= limits.floor {
                self.send(target.direction, amount);
            }
        }
    }

    /// Give each direction `remaining / parts`, computed once up front.
    pub fn even_split(&mut self, directions: &[Direction], parts: u32) {
        if parts == 0 {
            return;
        }
        let share = self.budget.remaining() / parts;
        for &direction in directions {
            self.send(direction, share);
        }
    }

    /// Dominant-quadrant bisection.
    ///
    /// Off-center cells share the budget evenly among the directions that
    /// point away from the base. The center falls back to a capped split
    /// over `inner`, or sends everything up once it is down to
    /// `small_floor` or less.
    pub fn bisect(&mut self, quadrant: Quadrant, inner: &[Target], limits: Limits, small_floor: u32) {
        let outward = quadrant.outward();
        if !outward.is_empty() {
            self.even_split(outward, u32::try_from(outward.len()).unwrap_or(u32::MAX));
        } else if self.budget.remaining() <= small_floor {
            let all = self.budget.remaining();
            self.send(Direction::Up, all);
        } else {
            self.capped_split(inner, limits);
        }
    }

    /// Send `(remaining - 1) / 4` in every direction.
    pub fn saturate(&mut self) {
        let share = self.budget.remaining().saturating_sub(1) / 4;
        for direction in Direction::ALL {
            self.send(direction, share);
        }
    }

    /// Fixed per-direction amounts, clamped to what is left.
    pub fn spread(&mut self, amounts: [u32; 4]) {
        for direction in Direction::ALL {
            self.send(direction, amounts[direction.index()]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn targets(occupancy: &[u32]) -> Vec<Target> {
        occupancy
            .iter()
            .zip(Direction::ALL)
            .map(|(&occupancy, direction)| Target {
                direction,
                occupancy,
            })
            .collect()
    }

    #[test]
    fn test_capped_split_even_without_caps() {
        let mut a = Allocation::new(100);
        a.capped_split(&targets(&[0, 0, 0]), Limits::UNBOUNDED);
        let amounts: Vec<_> = a.transfers().iter().map(|t| t.amount).collect();
        assert_eq!(amounts, vec![33, 33, 34]);
        assert_eq!(a.remaining(), 0);
    }

    #[test]
    fn test_capped_split_respects_ceiling() {
        let limits = Limits {
            ceiling: Some(100),
            floor: 5,
        };
        let mut a = Allocation::new(90);
        a.capped_split(&targets(&[90, 0]), limits);
        // First destination only has room for 10, the rest rolls on.
        assert_eq!(
            a.transfers(),
            &[
                Transfer {
                    direction: Direction::Up,
                    amount: 10
                },
                Transfer {
                    direction: Direction::Down,
                    amount: 80
                },
            ]
        );
    }

    #[test]
    fn test_capped_split_skips_below_floor() {
        let limits = Limits {
            ceiling: Some(100),
            floor: 5,
        };
        let mut a = Allocation::new(6);
        a.capped_split(&targets(&[0, 0]), limits);
        // 6 / 2 = 3 would leave the destination at 3, so it is skipped;
        // the last target is then offered all 6.
        assert_eq!(a.total(), 6);
        assert_eq!(a.transfers().len(), 1);
        assert_eq!(a.transfers()[0].direction, Direction::Down);
    }

    #[test]
    fn test_capped_split_full_destination_gets_nothing() {
        let limits = Limits {
            ceiling: Some(100),
            floor: 5,
        };
        let mut a = Allocation::new(40);
        a.capped_split(&targets(&[100]), limits);
        assert!(a.transfers().is_empty());
        assert_eq!(a.remaining(), 40);
    }

    #[test]
    fn test_capped_split_empty_targets() {
        let mut a = Allocation::new(40);
        a.capped_split(&[], Limits::UNBOUNDED);
        assert!(a.transfers().is_empty());
    }

    #[test]
    fn test_bisect_diagonal() {
        let mut a = Allocation::new(31);
        a.bisect(Quadrant::UpperLeft, &[], Limits::UNBOUNDED, 4);
        assert_eq!(
            a.transfers(),
            &[
                Transfer {
                    direction: Direction::Left,
                    amount: 15
                },
                Transfer {
                    direction: Direction::Up,
                    amount: 15
                },
            ]
        );
    }

    #[test]
    fn test_bisect_axis_three_ways() {
        let mut a = Allocation::new(30);
        a.bisect(Quadrant::Above, &[], Limits::UNBOUNDED, 4);
        let dirs: Vec<_> = a.transfers().iter().map(|t| t.direction).collect();
        assert_eq!(dirs, vec![Direction::Right, Direction::Up, Direction::Left]);
        assert!(a.transfers().iter().all(|t| t.amount == 10));
    }

    #[test]
    fn test_bisect_center_small_sends_up() {
        let mut a = Allocation::new(4);
        a.bisect(Quadrant::Center, &targets(&[10, 10]), Limits::UNBOUNDED, 4);
        assert_eq!(
            a.transfers(),
            &[Transfer {
                direction: Direction::Up,
                amount: 4
            }]
        );
    }

    #[test]
    fn test_bisect_center_splits_inner() {
        let mut a = Allocation::new(20);
        a.bisect(Quadrant::Center, &targets(&[10, 10]), Limits::UNBOUNDED, 4);
        assert_eq!(a.total(), 20);
        assert_eq!(a.transfers().len(), 2);
    }

    #[test]
    fn test_saturate() {
        let mut a = Allocation::new(41);
        a.saturate();
        assert_eq!(a.transfers().len(), 4);
        assert!(a.transfers().iter().all(|t| t.amount == 10));
        assert_eq!(a.remaining(), 1);
    }

    #[test]
    fn test_spread_clamps_to_budget() {
        let mut a = Allocation::new(50);
        a.spread([20, 25, 25, 25]);
        let amounts: Vec<_> = a.transfers().iter().map(|t| t.amount).collect();
        assert_eq!(amounts, vec![20, 25, 5]);
        assert_eq!(a.remaining(), 0);
    }

    #[test]
    fn test_focus_then_split_shares_one_budget() {
        let mut a = Allocation::new(21);
        a.focus(Direction::Up, 10);
        a.even_split(&[Direction::Left, Direction::Right], 2);
        assert_eq!(a.total(), 20);
        assert!(a.total() <= 21);
    }
}
