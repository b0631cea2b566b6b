use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use gbmsim::core::SimulationParameters;
use gbmsim::math::{FastRng, RngKind, inverse_normal_cdf};
use gbmsim::mc::MonteCarloEngine;
use gbmsim::stats::summarize;
use rand::rngs::StdRng;
use rand::{RngExt, SeedableRng};
use statrs::distribution::{ContinuousCDF, Normal};
use std::hint::black_box;

fn bench_worker_scaling(c: &mut Criterion) {
    let params = SimulationParameters::daily(100.0, 0.08, 0.25, 252)
        .expect("benchmark parameters should be valid");
    let mut group = c.benchmark_group("batch_100k_workers");
    group.sample_size(10);

    for workers in [1_usize, 2, 4, 8] {
        let engine = MonteCarloEngine::new(42).with_max_workers(workers);
        group.bench_with_input(
            BenchmarkId::new("max_workers", workers),
            &workers,
            |b, _| {
                b.iter(|| {
                    let batch = engine
                        .run(black_box(&params), 100_000)
                        .expect("batch should succeed");
                    black_box(batch.terminal_prices().len())
                })
            },
        );
    }

    group.finish();
}

fn bench_inverse_normal_cdf(c: &mut Criterion) {
    let ps = (1..=1_000_000)
        .map(|i| i as f64 / 1_000_001.0)
        .collect::<Vec<_>>();
    let normal = Normal::new(0.0, 1.0).expect("normal(0,1) should build");
    let mut group = c.benchmark_group("inverse_norm_cdf_1m");

    group.bench_function("acklam", |b| {
        b.iter(|| {
            let sum = ps.iter().map(|&p| inverse_normal_cdf(p)).sum::<f64>();
            black_box(sum)
        })
    });

    group.bench_function("statrs_inverse_cdf", |b| {
        b.iter(|| {
            let sum = ps.iter().map(|&p| normal.inverse_cdf(p)).sum::<f64>();
            black_box(sum)
        })
    });

    group.finish();
}

fn bench_normal_generation(c: &mut Criterion) {
    let mut group = c.benchmark_group("normals_1m");
    let n = 1_000_000;

    group.bench_function("std_rng_uniform", |b| {
        b.iter(|| {
            let mut rng = StdRng::seed_from_u64(42);
            let sum = (0..n).map(|_| rng.random::<f64>()).sum::<f64>();
            black_box(sum)
        })
    });

    for (name, kind) in [
        ("xoshiro256plusplus", RngKind::Xoshiro256PlusPlus),
        ("pcg64", RngKind::Pcg64),
        ("std_rng", RngKind::StdRng),
    ] {
        group.bench_function(name, |b| {
            b.iter(|| {
                let mut rng = FastRng::from_seed(kind, 42);
                let sum = (0..n).map(|_| rng.standard_normal()).sum::<f64>();
                black_box(sum)
            })
        });
    }

    group.finish();
}

fn bench_summarize(c: &mut Criterion) {
    let mut rng = FastRng::from_seed(RngKind::Pcg64, 7);
    let mut group = c.benchmark_group("summarize");

    for n in [10_000_usize, 250_000] {
        let terminals = (0..n)
            .map(|_| 100.0 * (0.25 * rng.standard_normal()).exp())
            .collect::<Vec<_>>();
        group.bench_with_input(BenchmarkId::from_parameter(n), &terminals, |b, terminals| {
            b.iter(|| {
                let s = summarize(black_box(terminals)).expect("non-empty sample");
                black_box((s.mean, s.p5, s.p95))
            })
        });
    }

    group.finish();
}

criterion_group!(
    parallel_benches,
    bench_worker_scaling,
    bench_inverse_normal_cdf,
    bench_normal_generation,
    bench_summarize
);
criterion_main!(parallel_benches);
