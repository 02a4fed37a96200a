//! Benchmarks for the Game of Life stepper.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use neogrid_core::{Addressing, Simulation};
use neogrid_life::{GameOfLife, LifeConfig, LifeSim};
use rand::SeedableRng;
use rand::rngs::SmallRng;

fn bench_step(c: &mut Criterion) {
    c.bench_function("life_step_8x8", |b| {
        let mut rng = SmallRng::seed_from_u64(12345);
        let mut life = GameOfLife::new(8, 8, Addressing::Wrap);
        life.randomize(&mut rng, 0.4);

        b.iter(|| {
            life.step();
            black_box(&life);
        })
    });

    c.bench_function("life_step_64x64", |b| {
        let mut rng = SmallRng::seed_from_u64(12345);
        let mut life = GameOfLife::new(64, 64, Addressing::Wrap);
        life.randomize(&mut rng, 0.3);

        b.iter(|| {
            life.step();
            black_box(&life);
        })
    });
}

fn bench_sim_tick(c: &mut Criterion) {
    c.bench_function("life_sim_tick_8x8", |b| {
        let mut sim = LifeSim::new(LifeConfig::default().with_seed(7)).unwrap();

        b.iter(|| {
            black_box(sim.tick());
        })
    });
}

criterion_group!(benches, bench_step, bench_sim_tick);
criterion_main!(benches);
