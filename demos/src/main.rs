// Copyright 2025 the Mosaic Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Headless Mosaic demo.
//!
//! Scatters synthetic cards in clusters, pushes them apart, orders every
//! seventh card into a search tour, then renders the tier atlases and writes
//! each layer to `<out>/<tier>-<layer>.png`.
//!
//! Set `RUST_LOG=debug` to see per-layer and per-tier build logs.

use std::error::Error;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use clap::Parser;
use kurbo::Size;
use mosaic_atlas::{
    Atlas, AtlasBuilder, AtlasSet, BuildOptions, CardItem, CardStyle, LabelFont, RasterLimits,
    TierList,
};
use mosaic_benches::clusters;
use mosaic_layout::{CardLayout, Notice, ResolverConfig, StepOutcome};
use peniko::{Blob, ImageAlphaType, ImageData, ImageFormat};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(about = "Lay out synthetic cards and write their atlases as PNG files")]
struct Args {
    /// Number of cards.
    #[arg(long, default_value_t = 400)]
    items: usize,
    /// Seed for the synthetic positions.
    #[arg(long, default_value_t = 1)]
    seed: u64,
    /// Minimum gap between cards, in item units.
    #[arg(long, default_value_t = 2.0)]
    gap: f64,
    /// Host spacing value the layout run is tied to.
    #[arg(long, default_value_t = 1.0)]
    spacing: f64,
    /// Output directory.
    #[arg(long, default_value = "mosaic-out")]
    out: PathBuf,
    /// Font file for labels. Labels are skipped without one.
    #[arg(long)]
    font: Option<PathBuf>,
    /// Largest layer width and height in pixels.
    #[arg(long, default_value_t = 4096)]
    max_size: u32,
    /// Keep finished layers as PNG bytes in memory.
    #[arg(long)]
    compress: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    let args = Args::parse();

    let style = CardStyle::default();
    let footprint = Size::new(style.card_size.width, style.card_size.height);
    let config = ResolverConfig {
        gap: args.gap,
        ..ResolverConfig::default()
    };
    let mut layout = CardLayout::new(footprint, config);
    layout.set_positions(clusters(args.items, footprint.width * 3.0, args.seed));

    let mut positions = layout.to_positions();
    let outcome = layout.resolve(
        args.spacing,
        &mut |notice: Notice| tracing::info!(success = notice.is_success(), "{notice}"),
        &mut positions,
    );
    if let StepOutcome::Converged(stats) | StepOutcome::Exhausted(stats) = outcome {
        tracing::info!(
            iteration = stats.iteration,
            pairs_pushed = stats.pairs_pushed,
            max_overlap = stats.max_overlap,
            "layout finished"
        );
    }
    if let Some(bounds) = layout.bounds() {
        tracing::info!(width = bounds.width(), height = bounds.height(), "layout bounds");
    }

    let matches: Vec<usize> = (0..args.items).step_by(7).collect();
    let tour = layout.tour(&matches);
    tracing::info!(matches = tour.len(), first = ?tour.iter().take(8).collect::<Vec<_>>(), "search tour");

    let mut items: Vec<CardItem> = (0..args.items)
        .map(|i| CardItem::new(Some(swatch(i)), format!("Card {i} of {}", args.items)))
        .collect();
    let options = BuildOptions {
        limits: RasterLimits {
            max_width: args.max_size,
            max_height: args.max_size,
        },
        compress: args.compress,
    };
    let mut builder = AtlasBuilder::new(style, options);
    if let Some(path) = &args.font {
        builder = builder.with_font(LabelFont::new(std::fs::read(path)?, 0)?);
    }
    let set = AtlasSet::build_chain(&builder, &TierList::default(), &mut items)?;

    std::fs::create_dir_all(&args.out)?;
    for atlas in set.atlases() {
        let info = atlas.debug_info();
        tracing::info!(
            tier = atlas.tier_id(),
            layers = info.layers,
            card_width = info.card_width,
            card_height = info.card_height,
            stored_bytes = info.stored_bytes,
            "atlas"
        );
        write_layers(atlas, &args.out)?;
    }
    Ok(())
}

/// A 16x16 two-tone thumbnail whose color depends on `i`.
fn swatch(i: usize) -> ImageData {
    const SIDE: u32 = 16;
    let hue = u8::try_from(i * 37 % 256).unwrap_or(0);
    let mut pixels = Vec::with_capacity((SIDE * SIDE * 4) as usize);
    for y in 0..SIDE {
        for x in 0..SIDE {
            let shade = if (x / 4 + y / 4) % 2 == 0 { 255 } else { 180 };
            pixels.extend_from_slice(&[hue, 255 - hue, shade, 255]);
        }
    }
    ImageData {
        data: Blob::from(pixels),
        format: ImageFormat::Rgba8,
        alpha_type: ImageAlphaType::Alpha,
        width: SIDE,
        height: SIDE,
    }
}

fn write_layers(atlas: &Atlas, dir: &Path) -> Result<(), Box<dyn Error>> {
    for (index, layer) in atlas.layers().iter().enumerate() {
        let pixmap = layer.pixmap()?;
        let mut rgba = pixmap.data_as_u8_slice().to_vec();
        unpremultiply(&mut rgba);

        let path = dir.join(format!("{}-{index}.png", atlas.tier_id()));
        let mut encoder = png::Encoder::new(
            BufWriter::new(File::create(&path)?),
            u32::from(layer.width()),
            u32::from(layer.height()),
        );
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder.write_header()?;
        writer.write_image_data(&rgba)?;
        writer.finish()?;
        tracing::debug!(path = %path.display(), "wrote layer");
    }
    Ok(())
}

fn unpremultiply(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = u16::from(px[3]);
        if a == 0 {
            px.fill(0);
            continue;
        }
        for c in &mut px[..3] {
            *c = u8::try_from((u16::from(*c) * 255 + a / 2) / a).unwrap_or(u8::MAX);
        }
    }
}
