use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use gbmsim::core::{RetentionPolicy, SimulationParameters};
use gbmsim::math::{FastRng, RngKind};
use gbmsim::mc::{GbmPathGenerator, MonteCarloEngine, PathGenerator};
use std::hint::black_box;

// Path generation and batch throughput
// Goals:
// - Terminal-only retention should cost little more than the raw walk
// - Xoshiro256++ and PCG64 should be faster than StdRng

fn benchmark_params(days: usize) -> SimulationParameters {
    SimulationParameters::daily(100.0, 0.08, 0.25, days).expect("benchmark parameters should be valid")
}

fn bench_single_path(c: &mut Criterion) {
    let mut group = c.benchmark_group("single_path");

    for days in [21_usize, 252, 1_260].iter() {
        let generator =
            GbmPathGenerator::new(&benchmark_params(*days)).expect("generator should build");
        group.bench_with_input(BenchmarkId::new("full", days), days, |b, _| {
            let mut rng = FastRng::for_task(RngKind::Xoshiro256PlusPlus, 42, 0);
            let mut out = vec![0.0; generator.steps()];
            b.iter(|| {
                let terminal = generator
                    .generate_into(&mut rng, None, black_box(&mut out))
                    .expect("path should be finite");
                black_box(terminal)
            })
        });
        group.bench_with_input(BenchmarkId::new("terminal_only", days), days, |b, _| {
            let mut rng = FastRng::for_task(RngKind::Xoshiro256PlusPlus, 42, 0);
            b.iter(|| {
                let terminal = generator
                    .generate_terminal(&mut rng, None)
                    .expect("path should be finite");
                black_box(terminal)
            })
        });
    }

    group.finish();
}

fn bench_batch_trials(c: &mut Criterion) {
    let params = benchmark_params(252);
    let mut group = c.benchmark_group("batch_trials");
    group.sample_size(10);

    for trials in [10_000_usize, 50_000, 100_000].iter() {
        let engine = MonteCarloEngine::new(42);
        group.bench_with_input(BenchmarkId::from_parameter(trials), trials, |b, &trials| {
            b.iter(|| {
                let batch = engine
                    .run(black_box(&params), trials)
                    .expect("batch should succeed");
                black_box(batch.summary().expect("non-empty batch").mean)
            })
        });
    }

    group.finish();
}

fn bench_retention(c: &mut Criterion) {
    let params = benchmark_params(252);
    let trials = 20_000;
    let mut group = c.benchmark_group("batch_retention_20k");
    group.sample_size(10);

    for (name, retention) in [
        ("full", RetentionPolicy::Full),
        ("terminal_only", RetentionPolicy::TerminalOnly { sample_paths: 10 }),
    ] {
        let engine = MonteCarloEngine::new(42).with_retention(retention);
        group.bench_function(name, |b| {
            b.iter(|| {
                let batch = engine
                    .run(black_box(&params), trials)
                    .expect("batch should succeed");
                black_box(batch.terminal_prices().len())
            })
        });
    }

    group.finish();
}

fn bench_rng_backends(c: &mut Criterion) {
    let params = benchmark_params(252);
    let trials = 50_000;
    let mut group = c.benchmark_group("batch_50k_rng_backend");
    group.sample_size(10);

    for (name, kind) in [
        ("xoshiro256plusplus", RngKind::Xoshiro256PlusPlus),
        ("pcg64", RngKind::Pcg64),
        ("std_rng", RngKind::StdRng),
    ] {
        let engine = MonteCarloEngine::new(42).with_rng_kind(kind);
        group.bench_function(name, |b| {
            b.iter(|| {
                let batch = engine
                    .run(black_box(&params), trials)
                    .expect("batch should succeed");
                black_box(batch.summary().expect("non-empty batch").mean)
            })
        });
    }

    group.finish();
}

criterion_group!(
    mc_benches,
    bench_single_path,
    bench_batch_trials,
    bench_retention,
    bench_rng_backends
);
criterion_main!(mc_benches);
