//! Criterion benchmarks for the reference and stress profiles.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use heatgrid_bench::{reference_profile, stress_profile};
use heatgrid_engine::run;

fn bench_reference_256(c: &mut Criterion) {
    let config = reference_profile();
    c.bench_function("reference_256x256_100", |b| {
        b.iter(|| black_box(run(&config).unwrap().gflops()));
    });
}

fn bench_stress_1024(c: &mut Criterion) {
    let config = stress_profile();
    let mut group = c.benchmark_group("stress");
    group.sample_size(10);
    group.bench_function("stress_1024x1024_100", |b| {
        b.iter(|| black_box(run(&config).unwrap().gflops()));
    });
    group.finish();
}

criterion_group!(benches, bench_reference_256, bench_stress_1024);
criterion_main!(benches);
