// Copyright 2025 the Mosaic Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use mosaic_atlas::{AtlasBuilder, AtlasSet, BuildOptions, CardItem, CardStyle, TierList};

fn bench_atlas(c: &mut Criterion) {
    let mut group = c.benchmark_group("mosaic_atlas");
    group.sample_size(10);
    let builder = AtlasBuilder::new(CardStyle::default(), BuildOptions::default());
    for &n in &[16_usize, 128] {
        let mut items: Vec<CardItem> = (0..n).map(|i| CardItem::new(None, format!("{i}"))).collect();
        group.bench_function(format!("build_chain(n={n})"), |b| {
            b.iter(|| {
                let set = AtlasSet::build_chain(&builder, &TierList::default(), &mut items)
                    .expect("placeholder cards always render");
                black_box(set.atlases().len())
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_atlas);
criterion_main!(benches);
