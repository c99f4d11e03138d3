//! Neighbourhood analysis over a [`WorldView`].
//!
//! Every query is pure and only reads the view. All movement goes through
//! [`WorldView::neighbor`], so wrapping and bounds are whatever the world
//! says they are. Cells the world does not contain are walls.

use std::collections::{HashSet, VecDeque};

use crate::grid::{Coord, Direction};
use crate::view::WorldView;

/// What occupies a cell, seen from the analysing player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Occupant {
    /// Owned by us.
    Friendly,
    /// Owned by someone else.
    Hostile,
    /// Nobody owns it.
    Vacant,
    /// Outside the world.
    Wall,
}

/// Which side dominates a cell's neighbourhood.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Posture {
    /// More friendly neighbours than foreign ones.
    Inner,
    /// More foreign neighbours than friendly ones.
    Outer,
    /// As many friendly as foreign neighbours.
    Corner,
}

/// A cell's four directions split by the friendliness of the neighbour.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    /// Directions whose neighbour is friendly.
    pub inner: Vec<Direction>,
    /// Directions whose neighbour is vacant or hostile.
    pub outer: Vec<Direction>,
    /// Classification derived from the two counts.
    pub posture: Posture,
}

/// Neighbourhood queries for the player a view belongs to.
#[derive(Debug)]
pub struct Analyzer<'a, V: ?Sized> {
    view: &'a V,
}

impl<'a, V: WorldView + ?Sized> Analyzer<'a, V> {
    /// Wrap a view.
    #[must_use]
    pub const fn new(view: &'a V) -> Self {
        Self { view }
    }

    /// The underlying view.
    #[must_use]
    pub const fn view(&self) -> &'a V {
        self.view
    }

    /// The adjacent cell in `direction`.
    #[must_use]
    #[inline]
    pub fn neighbor(&self, cell: Coord, direction: Direction) -> Coord {
        self.view.neighbor(cell, direction, 1)
    }

    /// Classify a single cell.
    #[must_use]
    pub fn occupant(&self, cell: Coord) -> Occupant {
        if !self.view.contains(cell) {
            Occupant::Wall
        } else if self.view.belongs_to_me(cell) {
            Occupant::Friendly
        } else if self.view.is_empty(cell) {
            Occupant::Vacant
        } else {
            Occupant::Hostile
        }
    }

    /// Whether `cell` is occupied by another player.
    #[must_use]
    #[inline]
    pub fn is_hostile(&self, cell: Coord) -> bool {
        self.occupant(cell) == Occupant::Hostile
    }

    fn neighbors(&self, cell: Coord) -> impl Iterator<Item = (Direction, Coord, Occupant)> + '_ {
        Direction::ALL.into_iter().map(move |dir| {
            let n = self.neighbor(cell, dir);
            (dir, n, self.occupant(n))
        })
    }

    fn directions_where(&self, cell: Coord, occupant: Occupant) -> Vec<Direction> {
        self.neighbors(cell)
            .filter(|&(_, _, o)| o == occupant)
            .map(|(dir, _, _)| dir)
            .collect()
    }

    /// Number of friendly neighbours.
    #[must_use]
    pub fn count_friendly(&self, cell: Coord) -> u8 {
        self.count(cell, Occupant::Friendly)
    }

    /// Number of hostile neighbours. Empty cells never count.
    #[must_use]
    pub fn count_enemy(&self, cell: Coord) -> u8 {
        self.count(cell, Occupant::Hostile)
    }

    fn count(&self, cell: Coord, occupant: Occupant) -> u8 {
        let mut n = 0;
        for (_, _, o) in self.neighbors(cell) {
            if o == occupant {
                n += 1;
            }
        }
        n
    }

    /// Total population over friendly neighbours only.
    #[must_use]
    pub fn neighbor_population_sum(&self, cell: Coord) -> u32 {
        self.neighbors(cell)
            .filter(|&(_, _, o)| o == Occupant::Friendly)
            .map(|(_, n, _)| self.view.population(n))
            .fold(0, u32::saturating_add)
    }

    /// Population already sitting at a friendly destination, zero otherwise.
    #[must_use]
    pub fn friendly_population(&self, cell: Coord) -> u32 {
        if self.occupant(cell) == Occupant::Friendly {
            self.view.population(cell)
        } else {
            0
        }
    }

    /// Every direction whose hostile neighbour has the minimum population.
    ///
    /// Empty when there is no hostile neighbour.
    #[must_use]
    pub fn weakest_enemy_directions(&self, cell: Coord) -> Vec<Direction> {
        let mut weakest = Vec::new();
        let mut min = u32::MAX;

        for (dir, n, o) in self.neighbors(cell) {
            if o != Occupant::Hostile {
                continue;
            }
            let population = self.view.population(n);
            if population < min {
                min = population;
                weakest.clear();
                weakest.push(dir);
            } else if population == min {
                weakest.push(dir);
            }
        }

        weakest
    }

    /// Directions whose neighbour is empty.
    #[must_use]
    pub fn empty_directions(&self, cell: Coord) -> Vec<Direction> {
        self.directions_where(cell, Occupant::Vacant)
    }

    /// Length of the unbroken hostile run starting at the neighbour in
    /// `direction`, bounded by the universe size so wrapped worlds end.
    #[must_use]
    pub fn enemy_run(&self, cell: Coord, direction: Direction) -> u32 {
        let limit = self.view.universe_size().max(1);
        let mut run = 0;
        let mut current = self.neighbor(cell, direction);

        while run < limit && self.is_hostile(current) {
            run += 1;
            current = self.neighbor(current, direction);
        }

        run
    }

    /// Every direction achieving the longest hostile run.
    ///
    /// Empty when no direction starts with a hostile neighbour.
    #[must_use]
    pub fn enemy_cluster_directions(&self, cell: Coord) -> Vec<Direction> {
        let runs = Direction::ALL.map(|dir| self.enemy_run(cell, dir));
        let longest = runs.iter().copied().max().unwrap_or(0);
        if longest == 0 {
            return Vec::new();
        }

        Direction::ALL
            .into_iter()
            .filter(|dir| runs[dir.index()] == longest)
            .collect()
    }

    /// Hostile cells reachable from `cell` through hostile cells without
    /// leaving the `radius` bound, in discovery order.
    #[must_use]
    pub fn enemies_in_radius(&self, cell: Coord, radius: u32) -> Vec<Coord> {
        let mut found = Vec::new();
        let mut queue = VecDeque::from([cell]);
        let mut visited = HashSet::from([cell]);

        while let Some(current) = queue.pop_front() {
            if self.view.distance(cell, current) > radius {
                continue;
            }

            for dir in Direction::ALL {
                let n = self.neighbor(current, dir);
                if visited.contains(&n)
                    || !self.is_hostile(n)
                    || self.view.distance(cell, n) > radius
                {
                    continue;
                }
                visited.insert(n);
                found.push(n);
                queue.push_back(n);
            }
        }

        found
    }

    /// Whether all four neighbours are friendly.
    #[must_use]
    pub fn is_surrounded_by_friendly_cells(&self, cell: Coord) -> bool {
        self.neighbors(cell).all(|(_, _, o)| o == Occupant::Friendly)
    }

    /// Inner/outer split of the cell's directions. Walls count as neither.
    #[must_use]
    pub fn layout(&self, cell: Coord) -> Layout {
        let mut inner = Vec::with_capacity(4);
        let mut outer = Vec::with_capacity(4);

        for (dir, _, o) in self.neighbors(cell) {
            match o {
                Occupant::Friendly => inner.push(dir),
                Occupant::Vacant | Occupant::Hostile => outer.push(dir),
                Occupant::Wall => {}
            }
        }

        let posture = match inner.len().cmp(&outer.len()) {
            std::cmp::Ordering::Equal => Posture::Corner,
            std::cmp::Ordering::Greater => Posture::Inner,
            std::cmp::Ordering::Less => Posture::Outer,
        };

        Layout {
            inner,
            outer,
            posture,
        }
    }

    /// Desirability of the neighbour in `direction` as an expansion target:
    /// two points per friendly cell around it, minus one per hostile cell.
    #[must_use]
    pub fn expansion_score(&self, cell: Coord, direction: Direction) -> i32 {
        let target = self.neighbor(cell, direction);
        2 * i32::from(self.count_friendly(target)) - i32::from(self.count_enemy(target))
    }

    /// Scan outward along all four axes at increasing distance and report
    /// the first axis that meets a hostile cell.
    ///
    /// At equal distance the priority is up, down, right, left.
    #[must_use]
    pub fn sight_line(&self, cell: Coord) -> Option<Direction> {
        const PRIORITY: [Direction; 4] = [
            Direction::Up,
            Direction::Down,
            Direction::Right,
            Direction::Left,
        ];

        for distance in 1..self.view.universe_size() {
            for dir in PRIORITY {
                if self.is_hostile(self.view.neighbor(cell, dir, distance)) {
                    return Some(dir);
                }
            }
        }
        None
    }
}

/// Manhattan distance between two cells, ignoring topology.
#[must_use]
pub const fn manhattan_distance(a: Coord, b: Coord) -> u32 {
    a.manhattan(b)
}
