//! Benchmarks for the matching solver and the equivalency engine.
//!
//! ## Running Benchmarks
//!
//! ```bash
//! # Run all benchmarks
//! cargo bench
//!
//! # Run specific benchmark
//! cargo bench -- solver
//! ```
//!
//! Results are saved to `target/criterion/` with HTML reports.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::time::Duration;

use deep_equivalency::matching::solve_by;
use deep_equivalency::{EquivalencyEngine, EquivalencyOptions, Object, Value};

// ============================================================================
// HELPER FUNCTIONS - Deterministic graph generation
// ============================================================================

/// Random acceptance matrix with the given edge density.
fn random_matrix(size: usize, density: f64, seed: u64) -> Vec<Vec<bool>> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..size)
        .map(|_| (0..size).map(|_| rng.gen_bool(density)).collect())
        .collect()
}

/// Worst case for greedy assignment: predicate p accepts elements p..n.
fn staircase_matrix(size: usize) -> Vec<Vec<bool>> {
    (0..size)
        .map(|p| (0..size).map(|e| e >= p).collect())
        .collect()
}

/// A chain of nested objects `depth` levels deep.
fn nested(depth: usize, leaf: i64) -> Value {
    let mut value = Object::new("Leaf").with("value", leaf).into_value();
    for level in 0..depth {
        value = Object::new("Node")
            .with("level", level)
            .with("child", value)
            .into_value();
    }
    value
}

/// Records and a shuffled, separately built copy for unordered comparison.
fn records(count: usize, seed: u64) -> (Value, Value) {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let fields: Vec<(usize, i64)> = (0..count).map(|i| (i, rng.gen_range(0..1_000))).collect();
    let record = |&(id, score): &(usize, i64)| {
        Object::new("Record")
            .with("id", id)
            .with("score", score)
            .into_value()
    };

    let mut shuffled = fields.clone();
    for i in (1..shuffled.len()).rev() {
        shuffled.swap(i, rng.gen_range(0..=i));
    }
    (
        Value::seq(shuffled.iter().map(record)),
        Value::seq(fields.iter().map(record)),
    )
}

// ============================================================================
// BENCHMARK: Solver
// ============================================================================

fn bench_solver(c: &mut Criterion) {
    let mut group = c.benchmark_group("solver");
    group.measurement_time(Duration::from_secs(5));

    for size in [8, 32, 128] {
        group.throughput(Throughput::Elements((size * size) as u64));

        let sparse = random_matrix(size, 0.1, 42);
        group.bench_with_input(BenchmarkId::new("sparse", size), &sparse, |b, matrix| {
            b.iter(|| {
                black_box(solve_by::<(), _>(size, size, |p, e| Ok(matrix[p][e])))
            })
        });

        let dense = random_matrix(size, 0.8, 42);
        group.bench_with_input(BenchmarkId::new("dense", size), &dense, |b, matrix| {
            b.iter(|| {
                black_box(solve_by::<(), _>(size, size, |p, e| Ok(matrix[p][e])))
            })
        });

        let staircase = staircase_matrix(size);
        group.bench_with_input(
            BenchmarkId::new("staircase", size),
            &staircase,
            |b, matrix| {
                b.iter(|| {
                    black_box(solve_by::<(), _>(size, size, |p, e| Ok(matrix[p][e])))
                })
            },
        );
    }

    group.finish();
}

// ============================================================================
// BENCHMARK: Engine
// ============================================================================

fn bench_engine(c: &mut Criterion) {
    let mut group = c.benchmark_group("engine");
    group.measurement_time(Duration::from_secs(5));

    let engine = EquivalencyEngine::new(
        EquivalencyOptions::builder()
            .max_depth(64)
            .build()
            .unwrap(),
    );
    let subject = nested(50, 1);
    let expectation = nested(50, 1);
    group.bench_function("nested_50_levels", |b| {
        b.iter(|| black_box(engine.compare(&subject, &expectation)))
    });

    let engine = EquivalencyEngine::default();
    for count in [10, 50, 200] {
        let (subject, expectation) = records(count, 7);
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(
            BenchmarkId::new("unordered_records", count),
            &(subject, expectation),
            |b, (subject, expectation)| {
                b.iter(|| black_box(engine.compare(subject, expectation)))
            },
        );
    }

    let strict = EquivalencyEngine::new(
        EquivalencyOptions::builder()
            .with_strict_ordering()
            .build()
            .unwrap(),
    );
    let (_, subject) = records(200, 7);
    let (_, expectation) = records(200, 7);
    group.bench_function("ordered_records_200", |b| {
        b.iter(|| black_box(strict.compare(&subject, &expectation)))
    });

    group.finish();
}

criterion_group!(benches, bench_solver, bench_engine);
criterion_main!(benches);
