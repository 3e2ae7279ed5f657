//! Criterion micro-benchmarks for the stencil kernel and the halo exchange.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use heatgrid_arena::{BoundaryProfile, FieldPair, LocalShape};
use heatgrid_comm::local_world;
use heatgrid_core::{GlobalGrid, Rank};
use heatgrid_engine::{HaloExchange, StencilKernel};

/// Benchmark: one 256×256 kernel sweep at several thread counts.
fn bench_kernel_256(c: &mut Criterion) {
    let grid = GlobalGrid::new(256, 256).unwrap();
    let shape = LocalShape::new(256, 256);
    let mut group = c.benchmark_group("kernel_256");
    for threads in [1, 2, 4] {
        let kernel = StencilKernel::new(&grid, threads, Rank(0)).unwrap();
        let mut pair = FieldPair::new(shape, &grid, BoundaryProfile::Zero, true, true);
        group.bench_with_input(BenchmarkId::from_parameter(threads), &threads, |b, _| {
            b.iter(|| {
                let (cur, work) = pair.split();
                black_box(kernel.apply(cur, work));
                pair.swap();
            });
        });
    }
    group.finish();
}

/// Benchmark: exchange on a single endpoint with no neighbours.
///
/// Measures the fixed per-step cost of posting and waiting on an empty
/// request list.
fn bench_halo_single(c: &mut Criterion) {
    let grid = GlobalGrid::new(256, 256).unwrap();
    let shape = LocalShape::new(256, 256);
    let world = local_world(1);
    let halo = HaloExchange::new(Rank(0), 1, shape);
    let mut pair = FieldPair::new(shape, &grid, BoundaryProfile::Zero, true, true);
    c.bench_function("halo_single", |b| {
        b.iter(|| {
            halo.exchange(&world[0], &mut pair).unwrap();
            black_box(pair.generation());
        });
    });
}

criterion_group!(benches, bench_kernel_256, bench_halo_single);
criterion_main!(benches);
