//! Benchmarks for a single decision call.
//!
//! The decision runs once per player per turn, so it dominates match time.

#![allow(missing_docs)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::unwrap_used)]

use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use gridwar::sim::{Topology, Universe};
use gridwar::strategy::{Doctrine, StrategyConfig, Strategist};
use gridwar::Coord;

/// Half the board ours, a hostile band through the middle.
fn contested(size: u32) -> Universe {
    let mut u = Universe::new(size, 1.1, 100, Topology::Toroidal).unwrap();
    for y in 0..size {
        for x in 0..size {
            let coord = Coord::new(x as i32, y as i32);
            if y < size / 2 {
                u.place(coord, 1, 20 + (x * 7 + y * 3) % 80);
            } else if y < size / 2 + 3 {
                u.place(coord, 2, 10 + (x * 5) % 60);
            }
        }
    }
    u.set_turn(60);
    u
}

fn bench_decide(c: &mut Criterion) {
    let universe = contested(50);
    let view = universe.view(1);

    for doctrine in Doctrine::ALL {
        let config = StrategyConfig::preset(doctrine);
        c.bench_function(&format!("decide_{doctrine}"), |b| {
            b.iter(|| {
                let mut agent = Strategist::new(config.clone());
                black_box(agent.decide(black_box(&view)))
            });
        });
    }
}

fn bench_decide_parallel(c: &mut Criterion) {
    let universe = contested(100);
    let view = universe.view(1);

    let mut group = c.benchmark_group("decide_100x100");
    for parallel in [false, true] {
        let mut config = StrategyConfig::preset(Doctrine::Weighted);
        config.parallel = parallel;
        let name = if parallel { "rayon" } else { "sequential" };
        group.bench_function(name, |b| {
            b.iter(|| {
                let mut agent = Strategist::new(config.clone());
                black_box(agent.decide(black_box(&view)))
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_decide, bench_decide_parallel);
criterion_main!(benches);
