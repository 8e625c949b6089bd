//! Benchmarks for floor generation and the enemy turn.
//!
//! Run with: cargo bench --bench simulation

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use delve::{generate_floor, run_enemy_turn, FloorConfig};

fn bench_floor_generation(c: &mut Criterion) {
    let mut group = c.benchmark_group("floor_generation");

    for size in [12u32, 24, 48].iter() {
        let config = FloorConfig {
            width: *size,
            height: *size,
            enemy_budget: size / 3,
            ..FloorConfig::new(3)
        };

        group.bench_with_input(BenchmarkId::from_parameter(format!("{}x{}", size, size)), size, |b, _| {
            b.iter(|| black_box(generate_floor(black_box("bench"), &config)));
        });
    }

    group.finish();
}

fn bench_enemy_turn(c: &mut Criterion) {
    let mut group = c.benchmark_group("enemy_turn");

    for enemies in [4u32, 16, 48].iter() {
        let config = FloorConfig {
            width: 32,
            height: 32,
            wall_density: 0.15,
            enemy_budget: *enemies,
            ..FloorConfig::new(5)
        };
        let floor = generate_floor("bench-turn", &config);
        let player = floor.entrance;

        group.bench_with_input(BenchmarkId::from_parameter(format!("{}_enemies", enemies)), enemies, |b, _| {
            b.iter(|| black_box(run_enemy_turn(floor.clone(), player, 4)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_floor_generation, bench_enemy_turn);
criterion_main!(benches);
