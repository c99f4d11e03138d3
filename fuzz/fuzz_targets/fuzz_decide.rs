#![no_main]

use std::collections::HashMap;

use arbitrary::Arbitrary;
use gridwar::sim::{Topology, Universe};
use gridwar::strategy::{Doctrine, StrategyConfig, Strategist};
use gridwar::{Coord, WorldView};
use libfuzzer_sys::fuzz_target;

/// A cell to place before deciding.
#[derive(Arbitrary, Debug)]
struct Placement {
    x: u8,
    y: u8,
    owner: u8,
    population: u16,
}

/// Structured input for decision fuzzing.
#[derive(Arbitrary, Debug)]
struct DecideInput {
    /// Universe side length (clamped to 4..=32).
    size: u8,
    /// Wrap edges or not.
    toroidal: bool,
    /// Current turn.
    turn: u16,
    /// Maximum population (clamped to at least 1).
    max_population: u16,
    /// Growth rate numerator over 100.
    growth: u8,
    /// Doctrine index.
    doctrine: u8,
    /// Cells to place.
    cells: Vec<Placement>,
}

fuzz_target!(|input: DecideInput| {
    let size = u32::from(input.size).clamp(4, 32);
    let topology = if input.toroidal {
        Topology::Toroidal
    } else {
        Topology::Bounded
    };
    let growth = 1.0 + f64::from(input.growth) / 100.0;
    let max = u32::from(input.max_population).max(1);
    let Ok(mut u) = Universe::new(size, growth, max, topology) else {
        return;
    };

    for p in input.cells.iter().take(512) {
        let coord = Coord::new(i32::from(p.x) % size as i32, i32::from(p.y) % size as i32);
        u.place(coord, p.owner % 4 + 1, u32::from(p.population));
    }
    u.set_turn(u32::from(input.turn));

    let doctrine = Doctrine::ALL[usize::from(input.doctrine) % Doctrine::ALL.len()];
    let view = u.view(1);
    let commands = Strategist::new(StrategyConfig::preset(doctrine)).decide(&view);

    let mut sent: HashMap<Coord, u64> = HashMap::new();
    for c in &commands {
        assert!(c.amount > 0);
        *sent.entry(c.source).or_default() += u64::from(c.amount);
    }
    for (cell, total) in sent {
        assert!(total <= u64::from(view.population(cell)));
    }

    let mut next = u.clone();
    next.apply_turn(&[(1, commands)]);
});
