// Copyright 2025 the Mosaic Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use kurbo::{Size, Vec2};
use mosaic_benches::{Lcg, scatter};
use mosaic_grid::SpatialGrid;

fn bench_grid(c: &mut Criterion) {
    let mut group = c.benchmark_group("mosaic_grid");
    for &n in &[1_000_usize, 10_000] {
        let points = scatter(n, 2_000.0, 7);

        group.bench_function(format!("build(n={n})"), |b| {
            b.iter(|| {
                let mut grid = SpatialGrid::new(Size::new(20.0, 20.0));
                grid.build(points.iter().copied());
                black_box(grid.cell_count())
            });
        });

        let mut base = SpatialGrid::new(Size::new(20.0, 20.0));
        base.build(points.iter().copied());

        group.bench_function(format!("jitter_sync(n={n})"), |b| {
            b.iter_batched(
                || base.clone(),
                |mut grid| {
                    let mut rng = Lcg::new(11);
                    for i in 0..n {
                        let d = Vec2::new(rng.next_f64() - 0.5, rng.next_f64() - 0.5) * 30.0;
                        grid.translate(i, d);
                    }
                    black_box(grid.sync())
                },
                BatchSize::LargeInput,
            );
        });

        group.bench_function(format!("candidates_all(n={n})"), |b| {
            let mut out = Vec::new();
            b.iter(|| {
                let mut total = 0;
                for i in 0..n {
                    base.candidates(i, &mut out);
                    total += out.len();
                }
                black_box(total)
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_grid);
criterion_main!(benches);
