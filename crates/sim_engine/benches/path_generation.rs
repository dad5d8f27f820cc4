//! Criterion benchmarks for path generation.
//!
//! Benchmarks cover:
//! - GBM generation with varying simulation counts
//! - Jump diffusion against GBM at equal size
//! - Sequential against rayon execution
//! - Full against terminal-only storage

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use sim_core::math::CorrelationMatrix;
use sim_engine::generator::PathGenerator;
use sim_engine::mc::{ParallelConfig, PathStorage, SimulationConfig};
use sim_models::calibration::{CalibratedParams, JumpParams};
use sim_models::models::ModelEnum;

fn params() -> CalibratedParams {
    CalibratedParams::new(
        vec!["SPY".to_string(), "TLT".to_string(), "GLD".to_string()],
        vec![0.08, 0.04, 0.05],
        vec![0.2, 0.12, 0.15],
        CorrelationMatrix::new(&[1.0, -0.3, 0.1, -0.3, 1.0, 0.2, 0.1, 0.2, 1.0], 3).unwrap(),
    )
    .unwrap()
}

fn config(n_simulations: usize, storage: PathStorage) -> SimulationConfig {
    SimulationConfig::builder()
        .n_simulations(n_simulations)
        .n_steps(252)
        .storage(storage)
        .build()
        .unwrap()
}

/// Benchmark GBM generation by simulation count.
fn bench_gbm_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("gbm_scaling");
    group.sample_size(10);
    let params = params();
    let model = ModelEnum::gbm(&params).unwrap();
    let initial = [470.0, 95.0, 185.0];

    for n in [1_000, 10_000] {
        let generator = PathGenerator::new(config(n, PathStorage::Full));
        group.bench_with_input(BenchmarkId::new("full", n), &n, |b, _| {
            b.iter(|| generator.generate(black_box(&params), &model, &initial).unwrap());
        });
    }
    group.finish();
}

/// Benchmark model cost at fixed size.
fn bench_models(c: &mut Criterion) {
    let mut group = c.benchmark_group("models");
    group.sample_size(10);
    let params = params();
    let initial = [470.0, 95.0, 185.0];
    let generator = PathGenerator::new(config(5_000, PathStorage::TerminalOnly));

    let gbm = ModelEnum::gbm(&params).unwrap();
    let jump = ModelEnum::jump_diffusion(&params, JumpParams::default()).unwrap();

    group.bench_function("gbm", |b| {
        b.iter(|| generator.generate(&params, black_box(&gbm), &initial).unwrap());
    });
    group.bench_function("jump_diffusion", |b| {
        b.iter(|| generator.generate(&params, black_box(&jump), &initial).unwrap());
    });
    group.finish();
}

/// Benchmark sequential against parallel execution.
fn bench_parallel(c: &mut Criterion) {
    let mut group = c.benchmark_group("parallel");
    group.sample_size(10);
    let params = params();
    let model = ModelEnum::gbm(&params).unwrap();
    let initial = [470.0, 95.0, 185.0];

    let sequential = PathGenerator::new(config(10_000, PathStorage::TerminalOnly))
        .with_parallel_config(ParallelConfig::sequential());
    let parallel = PathGenerator::new(config(10_000, PathStorage::TerminalOnly));

    group.bench_function("sequential", |b| {
        b.iter(|| sequential.generate(&params, &model, black_box(&initial)).unwrap());
    });
    group.bench_function("rayon", |b| {
        b.iter(|| parallel.generate(&params, &model, black_box(&initial)).unwrap());
    });
    group.finish();
}

criterion_group!(benches, bench_gbm_scaling, bench_models, bench_parallel);
criterion_main!(benches);
