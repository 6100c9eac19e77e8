// Copyright 2025 the Mosaic Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Slot packing: card pixel size, slots per layer and layer count.

use core::ops::Range;

use vello_cpu::kurbo::{Affine, Rect, Size};

use crate::style::RasterLimits;

/// Where one item lives in one tier's atlas.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Slot {
    /// Left edge in layer pixels.
    pub x: u32,
    /// Top edge in layer pixels.
    pub y: u32,
    /// Index of the layer.
    pub layer: u32,
}

/// Packing of `item_count` cards into layers no larger than the raster limits.
///
/// Slots are assigned in item order, row-major within a layer. Every layer
/// except the last is full; the last holds the remainder.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct AtlasGeometry {
    item_count: usize,
    requested_scale: f64,
    scale: f64,
    item_size: Size,
    card_width: u32,
    card_height: u32,
    columns: u32,
    rows_per_layer: u32,
}

impl AtlasGeometry {
    /// Computes the packing for cards of `item_size` units rendered at
    /// `scale` pixels per unit.
    ///
    /// If a card would be smaller than one pixel on either side, the scale
    /// is raised so the smaller side is exactly one pixel. If it would not
    /// fit in a single layer, the scale is lowered until it does.
    #[must_use]
    pub fn compute(item_count: usize, scale: f64, item_size: Size, limits: RasterLimits) -> Self {
        let limits = limits.clamped();
        let max_w = f64::from(limits.max_width);
        let max_h = f64::from(limits.max_height);
        let item_size = Size::new(positive_or_one(item_size.width), positive_or_one(item_size.height));

        let mut s = if scale.is_finite() { scale.max(0.0) } else { 1.0 };
        if item_size.width * s < 1.0 || item_size.height * s < 1.0 {
            s = 1.0 / item_size.width.min(item_size.height);
        }
        if item_size.width * s > max_w || item_size.height * s > max_h {
            s = (max_w / item_size.width).min(max_h / item_size.height);
        }

        let card_width = to_px(item_size.width * s).clamp(1, limits.max_width);
        let card_height = to_px(item_size.height * s).clamp(1, limits.max_height);
        Self {
            item_count,
            requested_scale: scale,
            scale: s,
            item_size,
            card_width,
            card_height,
            columns: (limits.max_width / card_width).max(1),
            rows_per_layer: (limits.max_height / card_height).max(1),
        }
    }

    /// Number of items packed.
    #[must_use]
    pub fn item_count(&self) -> usize {
        self.item_count
    }

    /// Scale the caller asked for.
    #[must_use]
    pub fn requested_scale(&self) -> f64 {
        self.requested_scale
    }

    /// Scale actually used.
    #[must_use]
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// The corrected scale, if the requested one had to be adjusted.
    #[must_use]
    pub fn corrected_scale(&self) -> Option<f64> {
        (self.scale != self.requested_scale).then_some(self.scale)
    }

    /// Card footprint in item units.
    #[must_use]
    pub fn item_size(&self) -> Size {
        self.item_size
    }

    /// Slot width in pixels.
    #[must_use]
    pub fn card_width(&self) -> u32 {
        self.card_width
    }

    /// Slot height in pixels.
    #[must_use]
    pub fn card_height(&self) -> u32 {
        self.card_height
    }

    /// Slots per row.
    #[must_use]
    pub fn columns(&self) -> u32 {
        self.columns
    }

    /// Rows in a full layer.
    #[must_use]
    pub fn rows_per_layer(&self) -> u32 {
        self.rows_per_layer
    }

    /// Slots in a full layer.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.columns as usize * self.rows_per_layer as usize
    }

    /// Number of layers: `ceil(item_count / capacity)`.
    #[must_use]
    pub fn layer_count(&self) -> usize {
        self.item_count.div_ceil(self.capacity())
    }

    /// Items stored in `layer`.
    #[must_use]
    pub fn layer_items(&self, layer: usize) -> Range<usize> {
        let cap = self.capacity();
        let start = layer.saturating_mul(cap).min(self.item_count);
        let end = start.saturating_add(cap).min(self.item_count);
        start..end
    }

    /// Pixel size of `layer`, trimmed to the slots it uses.
    #[must_use]
    pub fn layer_size(&self, layer: usize) -> Option<(u16, u16)> {
        let count = self.layer_items(layer).len();
        if count == 0 {
            return None;
        }
        let columns = self.columns as usize;
        let used_columns = count.min(columns);
        let used_rows = count.div_ceil(columns);
        Some((
            px_u16(used_columns * self.card_width as usize),
            px_u16(used_rows * self.card_height as usize),
        ))
    }

    /// Slot of item `index`.
    #[must_use]
    pub fn slot(&self, index: usize) -> Option<Slot> {
        if index >= self.item_count {
            return None;
        }
        let cap = self.capacity();
        let within = index % cap;
        let columns = self.columns as usize;
        Some(Slot {
            x: px_u32(within % columns) * self.card_width,
            y: px_u32(within / columns) * self.card_height,
            layer: px_u32(index / cap),
        })
    }

    /// Pixel rectangle of a slot within its layer.
    #[must_use]
    pub fn slot_rect(&self, slot: Slot) -> Rect {
        Rect::new(
            f64::from(slot.x),
            f64::from(slot.y),
            f64::from(slot.x + self.card_width),
            f64::from(slot.y + self.card_height),
        )
    }

    /// Transform from item units to layer pixels for a slot.
    #[must_use]
    pub fn slot_transform(&self, slot: Slot) -> Affine {
        Affine::translate((f64::from(slot.x), f64::from(slot.y)))
            * Affine::scale_non_uniform(
                f64::from(self.card_width) / self.item_size.width,
                f64::from(self.card_height) / self.item_size.height,
            )
    }
}

fn positive_or_one(v: f64) -> f64 {
    if v.is_finite() && v > 0.0 { v } else { 1.0 }
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "values are clamped to the raster limits right after"
)]
fn to_px(v: f64) -> u32 {
    v.round() as u32
}

fn px_u32(v: usize) -> u32 {
    u32::try_from(v).unwrap_or(u32::MAX)
}

fn px_u16(v: usize) -> u16 {
    u16::try_from(v).unwrap_or(u16::MAX)
}
