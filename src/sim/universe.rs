//! Grid state and turn resolution.

// Populations are bounded by the maximum population, casts stay in range
#![allow(
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    clippy::cast_sign_loss
)]

use serde::{Deserialize, Serialize};

use crate::error::MatchError;
use crate::grid::{Coord, Direction};
use crate::sim::{MIN_UNIVERSE_SIZE, PlayerId};
use crate::strategy::MovementCommand;
use crate::view::WorldView;

/// Edge behaviour of the universe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Topology {
    /// Edges wrap around.
    #[default]
    Toroidal,
    /// Cells beyond the edges do not exist.
    Bounded,
}

/// A single grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cell {
    /// Owning player, if any.
    pub owner: Option<PlayerId>,
    /// Population living here.
    pub population: u32,
}

/// Square grid of cells.
#[derive(Debug, Clone)]
pub struct Universe {
    size: u32,
    growth_rate: f64,
    maximum_population: u32,
    topology: Topology,
    turn: u32,
    cells: Vec<Cell>,
}

impl Universe {
    /// Create an empty universe at turn 1.
    ///
    /// # Errors
    ///
    /// Returns [`MatchError::UniverseTooSmall`] below the minimum size.
    pub fn new(
        size: u32,
        growth_rate: f64,
        maximum_population: u32,
        topology: Topology,
    ) -> Result<Self, MatchError> {
        if size < MIN_UNIVERSE_SIZE {
            return Err(MatchError::UniverseTooSmall(size));
        }
        let len = (size as usize) * (size as usize);
        Ok(Self {
            size,
            growth_rate,
            maximum_population,
            topology,
            turn: 1,
            cells: vec![Cell::default(); len],
        })
    }

    /// Side length.
    #[must_use]
    pub const fn size(&self) -> u32 {
        self.size
    }

    /// Edge behaviour.
    #[must_use]
    pub const fn topology(&self) -> Topology {
        self.topology
    }

    /// Current turn.
    #[must_use]
    pub const fn turn(&self) -> u32 {
        self.turn
    }

    /// Override the turn counter.
    pub fn set_turn(&mut self, turn: u32) {
        self.turn = turn;
    }

    /// Canonical form of `coord`, or `None` if it lies outside a bounded
    /// universe.
    #[must_use]
    pub fn normalize(&self, coord: Coord) -> Option<Coord> {
        let size = self.size as i32;
        match self.topology {
            Topology::Toroidal => Some(Coord::new(
                coord.x.rem_euclid(size),
                coord.y.rem_euclid(size),
            )),
            Topology::Bounded => {
                let inside = (0..size).contains(&coord.x) && (0..size).contains(&coord.y);
                inside.then_some(coord)
            }
        }
    }

    fn index(&self, coord: Coord) -> Option<usize> {
        self.normalize(coord)
            .map(|c| c.y as usize * self.size as usize + c.x as usize)
    }

    fn coord_of(&self, index: usize) -> Coord {
        let size = self.size as usize;
        Coord::new((index % size) as i32, (index / size) as i32)
    }

    /// The cell at `coord`.
    #[must_use]
    pub fn get(&self, coord: Coord) -> Option<Cell> {
        self.index(coord).map(|i| self.cells[i])
    }

    /// Give `coord` to `player` with `population`, capped at the maximum.
    /// Ignored outside a bounded universe.
    pub fn place(&mut self, coord: Coord, player: PlayerId, population: u32) {
        if let Some(i) = self.index(coord) {
            self.cells[i] = Cell {
                owner: Some(player),
                population: population.min(self.maximum_population),
            };
        }
    }

    /// Make `coord` empty.
    pub fn clear(&mut self, coord: Coord) {
        if let Some(i) = self.index(coord) {
            self.cells[i] = Cell::default();
        }
    }

    /// Cells owned by `player`, in row-major order.
    #[must_use]
    pub fn cells_owned_by(&self, player: PlayerId) -> Vec<Coord> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| cell.owner == Some(player))
            .map(|(i, _)| self.coord_of(i))
            .collect()
    }

    /// Number of cells and total population of `player`.
    #[must_use]
    pub fn holdings(&self, player: PlayerId) -> (u32, u64) {
        self.cells
            .iter()
            .filter(|cell| cell.owner == Some(player))
            .fold((0, 0), |(cells, population), cell| {
                (cells + 1, population + u64::from(cell.population))
            })
    }

    /// `player`'s view of the universe.
    #[must_use]
    pub const fn view(&self, player: PlayerId) -> PlayerView<'_> {
        PlayerView {
            universe: self,
            player,
        }
    }

    /// Resolve one turn and advance the turn counter.
    ///
    /// Every command is clamped to what its source still has out of its
    /// population at turn start, and commands for cells the player does not
    /// own are ignored. Players are processed in the given order. Arrivals
    /// then merge with the occupant or fight it, populations are capped and
    /// every owned cell grows.
    pub fn apply_turn(&mut self, orders: &[(PlayerId, Vec<MovementCommand>)]) {
        let mut arrivals: Vec<Vec<(PlayerId, u32)>> = vec![Vec::new(); self.cells.len()];

        for (player, commands) in orders {
            for command in commands {
                self.dispatch(*player, command, &mut arrivals);
            }
        }

        for (i, incoming) in arrivals.into_iter().enumerate() {
            if !incoming.is_empty() {
                self.cells[i] = resolve(self.cells[i], &incoming);
            }
        }

        for cell in &mut self.cells {
            if cell.owner.is_some() {
                let grown = (f64::from(cell.population) * self.growth_rate).ceil();
                cell.population = (grown as u32).min(self.maximum_population);
            }
        }

        self.turn += 1;
    }

    fn dispatch(
        &mut self,
        player: PlayerId,
        command: &MovementCommand,
        arrivals: &mut [Vec<(PlayerId, u32)>],
    ) {
        let Some(source) = self.index(command.source) else {
            return;
        };
        let Some(target) = self.index(self.step(command.source, command.direction)) else {
            return;
        };
        let cell = &mut self.cells[source];
        if cell.owner != Some(player) {
            return;
        }

        let amount = command.amount.min(cell.population);
        if amount == 0 {
            return;
        }
        cell.population -= amount;
        if cell.population == 0 {
            cell.owner = None;
        }
        arrivals[target].push((player, amount));
    }

    fn step(&self, cell: Coord, direction: Direction) -> Coord {
        let moved = cell.neighbor(direction);
        self.normalize(moved).unwrap_or(moved)
    }

    fn wrapped_distance(&self, a: Coord, b: Coord) -> u32 {
        let axis = |p: i32, q: i32| {
            let d = p.abs_diff(q) % self.size;
            d.min(self.size - d)
        };
        axis(a.x, b.x) + axis(a.y, b.y)
    }
}

/// Settle a cell after everything sent to it has arrived.
fn resolve(cell: Cell, incoming: &[(PlayerId, u32)]) -> Cell {
    let mut forces: Vec<(PlayerId, u32)> = Vec::with_capacity(incoming.len() + 1);
    if let Some(owner) = cell.owner {
        forces.push((owner, cell.population));
    }
    for &(player, amount) in incoming {
        match forces.iter_mut().find(|(p, _)| *p == player) {
            Some((_, total)) => *total = total.saturating_add(amount),
            None => forces.push((player, amount)),
        }
    }

    forces.sort_by_key(|&(_, total)| std::cmp::Reverse(total));
    match forces.as_slice() {
        [] => Cell::default(),
        [(player, population)] => Cell {
            owner: Some(*player),
            population: *population,
        },
        [(player, first), (_, second), ..] => {
            if first == second {
                Cell::default()
            } else {
                Cell {
                    owner: Some(*player),
                    population: first - second,
                }
            }
        }
    }
}

/// One player's read-only view of a [`Universe`].
#[derive(Debug, Clone, Copy)]
pub struct PlayerView<'a> {
    universe: &'a Universe,
    player: PlayerId,
}

impl PlayerView<'_> {
    /// Player this view belongs to.
    #[must_use]
    pub const fn player(&self) -> PlayerId {
        self.player
    }

    fn cell(&self, coord: Coord) -> Cell {
        self.universe.get(coord).unwrap_or_default()
    }
}

impl WorldView for PlayerView<'_> {
    fn current_turn(&self) -> u32 {
        self.universe.turn
    }

    fn owned_cells(&self) -> Vec<Coord> {
        self.universe.cells_owned_by(self.player)
    }

    fn population(&self, cell: Coord) -> u32 {
        self.cell(cell).population
    }

    fn belongs_to_me(&self, cell: Coord) -> bool {
        self.cell(cell).owner == Some(self.player)
    }

    fn is_empty(&self, cell: Coord) -> bool {
        self.contains(cell) && self.cell(cell).owner.is_none()
    }

    fn growth_rate(&self) -> f64 {
        self.universe.growth_rate
    }

    fn universe_size(&self) -> u32 {
        self.universe.size
    }

    fn maximum_population(&self) -> u32 {
        self.universe.maximum_population
    }

    fn neighbor(&self, cell: Coord, direction: Direction, steps: u32) -> Coord {
        let moved = cell.step(direction, i32::try_from(steps).unwrap_or(i32::MAX));
        match self.universe.topology {
            Topology::Toroidal => self.universe.normalize(moved).unwrap_or(moved),
            Topology::Bounded => moved,
        }
    }

    fn distance(&self, a: Coord, b: Coord) -> u32 {
        match self.universe.topology {
            Topology::Toroidal => self.universe.wrapped_distance(a, b),
            Topology::Bounded => a.manhattan(b),
        }
    }

    fn contains(&self, cell: Coord) -> bool {
        self.universe.normalize(cell).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounded() -> Universe {
        Universe::new(8, 1.0, 100, Topology::Bounded).unwrap()
    }

    fn order(x: i32, y: i32, direction: Direction, amount: u32) -> MovementCommand {
        MovementCommand::new(Coord::new(x, y), direction, amount)
    }

    #[test]
    fn test_too_small() {
        let err = Universe::new(2, 1.1, 100, Topology::Toroidal).unwrap_err();
        assert!(matches!(err, MatchError::UniverseTooSmall(2)));
    }

    #[test]
    fn test_move_into_empty_claims_cell() {
        let mut u = bounded();
        u.place(Coord::new(2, 2), 1, 30);
        u.apply_turn(&[(1, vec![order(2, 2, Direction::Right, 10)])]);

        assert_eq!(u.get(Coord::new(2, 2)).unwrap().population, 20);
        assert_eq!(
            u.get(Coord::new(3, 2)).unwrap(),
            Cell {
                owner: Some(1),
                population: 10
            }
        );
        assert_eq!(u.turn(), 2);
    }

    #[test]
    fn test_commands_clamped_to_population() {
        let mut u = bounded();
        u.place(Coord::new(2, 2), 1, 30);
        u.apply_turn(&[(
            1,
            vec![
                order(2, 2, Direction::Right, 25),
                order(2, 2, Direction::Left, 25),
            ],
        )]);

        assert_eq!(u.get(Coord::new(3, 2)).unwrap().population, 25);
        assert_eq!(u.get(Coord::new(1, 2)).unwrap().population, 5);
        // The source was emptied and is released.
        assert_eq!(u.get(Coord::new(2, 2)).unwrap().owner, None);
    }

    #[test]
    fn test_foreign_source_ignored() {
        let mut u = bounded();
        u.place(Coord::new(2, 2), 2, 30);
        u.apply_turn(&[(1, vec![order(2, 2, Direction::Right, 10)])]);
        assert_eq!(u.get(Coord::new(2, 2)).unwrap().population, 30);
        assert_eq!(u.get(Coord::new(3, 2)).unwrap().owner, None);
    }

    #[test]
    fn test_attack_subtracts_defender() {
        let mut u = bounded();
        u.place(Coord::new(2, 2), 1, 50);
        u.place(Coord::new(3, 2), 2, 15);
        u.apply_turn(&[(1, vec![order(2, 2, Direction::Right, 40)])]);
        assert_eq!(
            u.get(Coord::new(3, 2)).unwrap(),
            Cell {
                owner: Some(1),
                population: 25
            }
        );
    }

    #[test]
    fn test_tied_battle_empties_cell() {
        let mut u = bounded();
        u.place(Coord::new(2, 2), 1, 50);
        u.place(Coord::new(3, 2), 2, 20);
        u.apply_turn(&[(1, vec![order(2, 2, Direction::Right, 20)])]);
        assert_eq!(u.get(Coord::new(3, 2)).unwrap(), Cell::default());
    }

    #[test]
    fn test_growth_rounds_up_and_caps() {
        let mut u = Universe::new(8, 1.1, 100, Topology::Bounded).unwrap();
        u.place(Coord::new(0, 0), 1, 11);
        u.place(Coord::new(1, 1), 1, 95);
        u.apply_turn(&[]);
        // ceil(11 * 1.1) = ceil(12.1) = 13
        assert_eq!(u.get(Coord::new(0, 0)).unwrap().population, 13);
        assert_eq!(u.get(Coord::new(1, 1)).unwrap().population, 100);
    }

    #[test]
    fn test_bounded_edge_drops_command() {
        let mut u = bounded();
        u.place(Coord::new(0, 0), 1, 30);
        u.apply_turn(&[(1, vec![order(0, 0, Direction::Up, 10)])]);
        assert_eq!(u.get(Coord::new(0, 0)).unwrap().population, 30);
    }

    #[test]
    fn test_toroidal_view_wraps() {
        let mut u = Universe::new(8, 1.1, 100, Topology::Toroidal).unwrap();
        u.place(Coord::new(0, 7), 1, 30);
        let view = u.view(1);

        assert_eq!(
            view.neighbor(Coord::new(0, 0), Direction::Up, 1),
            Coord::new(0, 7)
        );
        assert!(view.belongs_to_me(Coord::new(0, -1)));
        assert_eq!(view.distance(Coord::new(0, 0), Coord::new(7, 7)), 2);
        assert!(view.contains(Coord::new(-5, 20)));
    }

    #[test]
    fn test_bounded_view_walls() {
        let u = bounded();
        let view = u.view(1);
        assert!(!view.contains(Coord::new(-1, 0)));
        assert!(!view.is_empty(Coord::new(-1, 0)));
        assert!(view.is_empty(Coord::new(0, 0)));
    }

    #[test]
    fn test_owned_cells_row_major() {
        let mut u = bounded();
        u.place(Coord::new(5, 1), 1, 10);
        u.place(Coord::new(2, 3), 1, 10);
        u.place(Coord::new(1, 1), 1, 10);
        assert_eq!(
            u.cells_owned_by(1),
            vec![Coord::new(1, 1), Coord::new(5, 1), Coord::new(2, 3)]
        );
        assert_eq!(u.holdings(1), (3, 30));
    }
}
