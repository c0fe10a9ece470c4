//! Criterion benchmarks for the slab design engine.
//!
//! Uses synthetic instances with seeded RNG so runs are comparable:
//! construction alone, single-replica annealing, and the multi-start
//! facade.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use slabmill::model::Instance;
use slabmill::optimizer::{Optimizer, OptimizerConfig};
use slabmill::search::{greedy_assignment, SearchConfig, SearchEngine};

/// Synthetic instance: a handful of catalog sizes, orders with weights
/// well below the largest size so feasibility is never in question.
fn synthetic_instance(order_count: usize, seed: u64) -> Instance {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let sizes = vec![25, 50, 75, 110, 150];
    let color_count = 8u32;
    let orders: Vec<(u64, u32)> = (0..order_count)
        .map(|_| {
            (
                rng.random_range(5..60u64),
                rng.random_range(0..color_count),
            )
        })
        .collect();
    Instance::new(sizes, color_count, orders).unwrap()
}

fn bench_construction(c: &mut Criterion) {
    let mut group = c.benchmark_group("construction");
    for &n in &[20usize, 100, 400] {
        let instance = synthetic_instance(n, 7);
        group.bench_with_input(BenchmarkId::from_parameter(n), &instance, |b, instance| {
            b.iter(|| greedy_assignment(black_box(instance)));
        });
    }
    group.finish();
}

fn bench_annealing(c: &mut Criterion) {
    let mut group = c.benchmark_group("annealing");
    group.sample_size(10);
    for &n in &[20usize, 100] {
        let instance = synthetic_instance(n, 7);
        let config = SearchConfig::default()
            .with_initial_temperature(100.0)
            .with_min_temperature(0.1)
            .with_cooling_rate(0.95)
            .with_iterations_per_temperature(200)
            .with_max_iterations(20_000)
            .with_seed(42);
        group.bench_with_input(BenchmarkId::from_parameter(n), &instance, |b, instance| {
            b.iter(|| SearchEngine::new(black_box(instance), config.clone()).run());
        });
    }
    group.finish();
}

fn bench_multi_start(c: &mut Criterion) {
    let mut group = c.benchmark_group("multi_start");
    group.sample_size(10);
    let instance = synthetic_instance(100, 7);
    let config = OptimizerConfig::default()
        .with_replicas(4)
        .with_seed(42)
        .with_search(
            SearchConfig::default()
                .with_initial_temperature(100.0)
                .with_min_temperature(0.1)
                .with_cooling_rate(0.95)
                .with_iterations_per_temperature(200)
                .with_max_iterations(10_000),
        );
    group.bench_function("replicas_4", |b| {
        b.iter(|| Optimizer::run(black_box(&instance), black_box(&config)));
    });
    group.finish();
}

criterion_group!(benches, bench_construction, bench_annealing, bench_multi_start);
criterion_main!(benches);
