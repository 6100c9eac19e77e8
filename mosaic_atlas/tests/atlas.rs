// Copyright 2025 the Mosaic Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Builds small atlases and inspects the rendered pixels.

use std::collections::HashSet;

use mosaic_atlas::{
    Atlas, AtlasBuilder, AtlasSet, BuildOptions, CardItem, CardStyle, LabelFont, RasterLimits,
    ScaleTier, Slot, TierList,
};
use peniko::{Blob, ImageAlphaType, ImageData, ImageFormat};
use vello_cpu::kurbo::Size;

const FONT: &[u8] = include_bytes!("../../assets/fonts/dejavu/DejaVuSans-Ascii.ttf");

fn items(n: usize) -> Vec<CardItem> {
    (0..n).map(|i| CardItem::new(None, format!("item {i}"))).collect()
}

fn solid_thumbnail(rgba: [u8; 4], width: u32, height: u32) -> ImageData {
    let pixels: Vec<u8> = (0..width * height).flat_map(|_| rgba).collect();
    ImageData {
        data: Blob::from(pixels),
        format: ImageFormat::Rgba8,
        alpha_type: ImageAlphaType::Alpha,
        width,
        height,
    }
}

fn pixel(atlas: &Atlas, layer: usize, x: u32, y: u32) -> [u8; 4] {
    let pixmap = atlas.layer(layer).unwrap().pixmap().unwrap();
    let i = (y as usize * usize::from(pixmap.width()) + x as usize) * 4;
    let px = &pixmap.data_as_u8_slice()[i..i + 4];
    [px[0], px[1], px[2], px[3]]
}

fn close(a: [u8; 4], b: [u8; 4], tolerance: u8) -> bool {
    a.iter().zip(b).all(|(x, y)| x.abs_diff(y) <= tolerance)
}

fn full() -> ScaleTier {
    ScaleTier::new("full", 0.75, 1.0)
}

/// Default style cards at scale 1 are 128x160; these limits fit 2x2 per layer.
fn small_layers() -> BuildOptions {
    BuildOptions {
        limits: RasterLimits {
            max_width: 300,
            max_height: 400,
        },
        compress: false,
    }
}

#[test]
fn every_item_gets_a_unique_slot() {
    let builder = AtlasBuilder::new(CardStyle::default(), small_layers());
    let mut cards = items(25);
    let atlas = builder.build(&full(), &mut cards, None).unwrap();

    assert_eq!(atlas.geometry().capacity(), 4);
    assert_eq!(atlas.layers().len(), 7, "ceil(25 / 4) layers");

    let mut seen = HashSet::new();
    for (i, card) in cards.iter().enumerate() {
        let slot = card.slot("full").expect("slot recorded");
        assert_eq!(Some(slot), atlas.slot(i), "recorded slot matches the atlas");
        assert!(seen.insert(slot), "slot {slot:?} assigned twice");
        let layer = atlas.layer(slot.layer as usize).unwrap();
        assert!(slot.x + 128 <= u32::from(layer.width()), "slot inside layer");
        assert!(slot.y + 160 <= u32::from(layer.height()), "slot inside layer");
    }

    let last = atlas.layer(6).unwrap();
    assert_eq!((last.width(), last.height()), (128, 160), "trimmed to one slot");
    assert_eq!((last.slots_x(), last.slots_y()), (1, 1));
    let first = atlas.layer(0).unwrap();
    assert_eq!((first.width(), first.height()), (256, 320));
}

#[test]
fn card_without_thumbnail_shows_placeholder() {
    let style = CardStyle::default();
    let builder = AtlasBuilder::new(style.clone(), BuildOptions::default());
    let mut cards = items(1);
    let atlas = builder.build(&full(), &mut cards, None).unwrap();

    assert_eq!(pixel(&atlas, 0, 0, 0)[3], 0, "rounded corner stays transparent");
    let center = style.image_box().center();
    let placeholder = style.placeholder.to_rgba8().to_u8_array();
    let got = pixel(&atlas, 0, center.x as u32, center.y as u32);
    assert!(close(got, placeholder, 2), "{got:?} vs {placeholder:?}");
}

#[test]
fn thumbnail_is_fitted_into_image_box() {
    let style = CardStyle::default();
    let builder = AtlasBuilder::new(style.clone(), BuildOptions::default());
    let mut cards = vec![CardItem::new(
        Some(solid_thumbnail([220, 20, 20, 255], 4, 4)),
        "red",
    )];
    let atlas = builder.build(&full(), &mut cards, None).unwrap();

    let center = style.image_box().center();
    let got = pixel(&atlas, 0, center.x as u32, center.y as u32);
    assert!(close(got, [220, 20, 20, 255], 3), "thumbnail drawn: {got:?}");
    // A square image in a wide box leaves the sides to the card background.
    let side = pixel(&atlas, 0, 7, center.y as u32);
    let background = style.background.to_rgba8().to_u8_array();
    assert!(close(side, background, 2), "letterbox shows background: {side:?}");
}

#[test]
fn resampled_tier_matches_direct_packing() {
    let builder = AtlasBuilder::new(CardStyle::default(), small_layers());
    let medium = ScaleTier::new("medium", 0.25, 0.5);
    let mut cards = items(9);

    let finest = builder.build(&full(), &mut cards, None).unwrap();
    let resampled = builder.build(&medium, &mut cards, Some(&finest)).unwrap();
    let direct = builder.build(&medium, &mut items(9), None).unwrap();

    assert_eq!(resampled.geometry(), direct.geometry(), "same packing");
    for (i, card) in cards.iter().enumerate() {
        assert_eq!(card.slot("medium"), direct.slot(i));
        assert!(card.slot("full").is_some(), "finer slot kept");
    }

    let placeholder = CardStyle::default().placeholder.to_rgba8().to_u8_array();
    let slot = resampled.slot(4).unwrap();
    let got = pixel(&resampled, slot.layer as usize, slot.x + 32, slot.y + 30);
    assert!(close(got, placeholder, 4), "resampled placeholder: {got:?}");
}

#[test]
fn compressed_layers_read_back() {
    let options = BuildOptions {
        compress: true,
        ..small_layers()
    };
    let builder = AtlasBuilder::new(CardStyle::default(), options);
    let mut cards = items(6);
    let mut atlas = builder.build(&full(), &mut cards, None).unwrap();

    let info = atlas.debug_info();
    assert_eq!(info.layers, 2);
    assert_eq!(info.compressed_layers, 2, "compressed as built");
    for layer in atlas.layers() {
        let pixmap = layer.pixmap().unwrap();
        assert_eq!((pixmap.width(), pixmap.height()), (layer.width(), layer.height()));
    }
    atlas.compress().unwrap();
    assert_eq!(atlas.debug_info(), info, "compressing again changes nothing");
}

#[test]
fn chain_builds_every_tier_and_selects_by_zoom() {
    let builder = AtlasBuilder::new(CardStyle::default(), BuildOptions::default());
    let mut cards = items(10);
    let set = AtlasSet::build_chain(&builder, &TierList::default(), &mut cards).unwrap();

    let ids: Vec<_> = set.atlases().iter().map(Atlas::tier_id).collect();
    assert_eq!(ids, ["overview", "medium", "full"], "coarsest first");
    assert_eq!(set.select(0.1).unwrap().tier_id(), "overview");
    assert_eq!(set.select(0.5).unwrap().tier_id(), "medium");
    assert_eq!(set.select(3.0).unwrap().tier_id(), "full");

    let overview = set.get("overview").unwrap();
    assert_eq!(
        (overview.geometry().card_width(), overview.geometry().card_height()),
        (16, 20)
    );
    for card in &cards {
        for id in ["overview", "medium", "full"] {
            assert!(card.slot(id).is_some(), "slot recorded for {id}");
        }
    }
}

#[test]
fn one_thousand_small_cards_fit_one_layer() {
    let style = CardStyle {
        card_size: Size::new(50.0, 50.0),
        ..CardStyle::default()
    };
    let builder = AtlasBuilder::new(style, BuildOptions::default());
    let geometry = builder.geometry(1000, 1.0);
    assert_eq!(geometry.layer_count(), 1);
    assert_eq!(geometry.capacity(), 81 * 81);
    assert_eq!(geometry.layer_size(0), Some((4050, 650)));
}

#[test]
fn empty_input_builds_no_layers() {
    let builder = AtlasBuilder::new(CardStyle::default(), BuildOptions::default());
    let mut cards: Vec<CardItem> = Vec::new();
    let atlas = builder.build(&full(), &mut cards, None).unwrap();
    assert!(atlas.layers().is_empty(), "nothing to pack");
    assert_eq!(atlas.slot(0), None);
}

#[test]
fn vanishing_scale_is_corrected_to_one_pixel() {
    let builder = AtlasBuilder::new(CardStyle::default(), BuildOptions::default());
    let mut cards = items(3);
    let atlas = builder
        .build(&ScaleTier::new("dust", 0.0, 0.0), &mut cards, None)
        .unwrap();
    let geometry = atlas.geometry();
    assert_eq!(geometry.corrected_scale(), Some(1.0 / 128.0));
    assert_eq!((geometry.card_width(), geometry.card_height()), (1, 1));
    assert_eq!(cards[2].slot("dust"), Some(Slot { x: 2, y: 0, layer: 0 }));
}

#[test]
fn label_is_drawn_and_clipped_to_its_box() {
    // One line per em, so the second line starts inside the box and runs
    // past its bottom edge.
    let style = CardStyle {
        label_size: 22.0,
        line_height: 1.0,
        label_lines: 2,
        ..CardStyle::default()
    };
    let font = LabelFont::new(FONT, 0).unwrap();
    let builder = AtlasBuilder::new(style.clone(), BuildOptions::default()).with_font(font);
    let mut cards = vec![CardItem::new(None, "Hello Mosaic")];
    let atlas = builder.build(&full(), &mut cards, None).unwrap();

    let frame = style.label_box();
    let (x0, x1) = (frame.x0.ceil() as u32 + 2, frame.x1.floor() as u32 - 2);
    let dark = |px: [u8; 4]| px[0].max(px[1]).max(px[2]) < 100;
    let mut inked = 0;
    for y in frame.y0.ceil() as u32..frame.y1.floor() as u32 {
        inked += (x0..x1).filter(|&x| dark(pixel(&atlas, 0, x, y))).count();
    }
    assert!(inked > 20, "label ink inside the box: {inked} dark pixels");

    let background = style.background.to_rgba8().to_u8_array();
    for y in frame.y1.ceil() as u32..frame.y1.ceil() as u32 + 3 {
        for x in x0..x1 {
            let got = pixel(&atlas, 0, x, y);
            assert!(close(got, background, 2), "ink below the label box at ({x}, {y}): {got:?}");
        }
    }
}
