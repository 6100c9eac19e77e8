// Copyright 2025 the Mosaic Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use kurbo::Size;
use mosaic_benches::scatter;
use mosaic_layout::{CardLayout, ResolverConfig};

fn bench_layout(c: &mut Criterion) {
    let mut group = c.benchmark_group("mosaic_layout");
    group.sample_size(20);
    for &n in &[200_usize, 2_000] {
        // Dense enough that most cards start out overlapping.
        let side = (n as f64).sqrt() * 8.0;
        let points = scatter(n, side, 3);

        group.bench_function(format!("resolve(n={n})"), |b| {
            b.iter_batched(
                || {
                    let mut layout = CardLayout::new(Size::new(10.0, 10.0), ResolverConfig::default());
                    layout.set_positions(points.iter().copied());
                    layout
                },
                |mut layout| black_box(layout.resolve(1.0, &mut (), &mut ())),
                BatchSize::LargeInput,
            );
        });

        let mut layout = CardLayout::new(Size::new(10.0, 10.0), ResolverConfig::default());
        layout.set_positions(points.iter().copied());
        let subset: Vec<usize> = (0..n).step_by(3).collect();
        group.bench_function(format!("tour(n={n},k={})", subset.len()), |b| {
            b.iter(|| black_box(layout.tour(&subset)));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_layout);
criterion_main!(benches);
