// Copyright 2025 the Mosaic Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use peniko::Color;
use vello_cpu::kurbo::{Rect, Size};

/// Largest raster surface a layer may use.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RasterLimits {
    /// Maximum layer width in pixels.
    pub max_width: u32,
    /// Maximum layer height in pixels.
    pub max_height: u32,
}

impl Default for RasterLimits {
    fn default() -> Self {
        Self {
            max_width: 4096,
            max_height: 4096,
        }
    }
}

impl RasterLimits {
    /// Limits clamped to what the rasterizer can allocate: at least one pixel
    /// and at most `u16::MAX` per side.
    #[must_use]
    pub fn clamped(self) -> Self {
        let bound = u32::from(u16::MAX);
        Self {
            max_width: self.max_width.clamp(1, bound),
            max_height: self.max_height.clamp(1, bound),
        }
    }
}

/// Appearance and metrics of one card, in item units.
///
/// An atlas at scale `s` renders each card at `s` raster pixels per unit.
#[derive(Clone, Debug, PartialEq)]
pub struct CardStyle {
    /// Card footprint.
    pub card_size: Size,
    /// Inset of the image box and the label from the card edge.
    pub padding: f64,
    /// Height of the image box at the top of the card.
    pub image_height: f64,
    /// Corner radius of the card and of the image mask.
    pub corner_radius: f64,
    /// Border stroke width. Zero disables the border.
    pub border_width: f64,
    /// Card fill.
    pub background: Color,
    /// Border color.
    pub border: Color,
    /// Fill behind a missing thumbnail.
    pub placeholder: Color,
    /// Label text color.
    pub label_color: Color,
    /// Label font size.
    pub label_size: f64,
    /// Line advance as a multiple of the label size.
    pub line_height: f64,
    /// Most label lines shown; the rest are dropped.
    pub label_lines: usize,
    /// Radius of the control dot in the top-right corner, if any.
    pub control_radius: Option<f64>,
    /// Control dot color.
    pub control_color: Color,
}

impl Default for CardStyle {
    fn default() -> Self {
        Self {
            card_size: Size::new(128.0, 160.0),
            padding: 6.0,
            image_height: 112.0,
            corner_radius: 8.0,
            border_width: 1.5,
            background: Color::from_rgba8(250, 250, 252, 255),
            border: Color::from_rgba8(180, 184, 194, 255),
            placeholder: Color::from_rgba8(224, 226, 232, 255),
            label_color: Color::from_rgba8(28, 30, 36, 255),
            label_size: 11.0,
            line_height: 1.25,
            label_lines: 2,
            control_radius: Some(5.0),
            control_color: Color::from_rgba8(70, 120, 220, 255),
        }
    }
}

impl CardStyle {
    /// Card rectangle at the origin.
    #[must_use]
    pub fn card_rect(&self) -> Rect {
        self.card_size.to_rect()
    }

    /// Box the thumbnail is fitted into.
    #[must_use]
    pub fn image_box(&self) -> Rect {
        let p = self.padding;
        let bottom = (p + self.image_height).min(self.card_size.height - p);
        Rect::new(p, p, (self.card_size.width - p).max(p), bottom.max(p))
    }

    /// Area the label is clipped to.
    #[must_use]
    pub fn label_box(&self) -> Rect {
        let image = self.image_box();
        let p = self.padding;
        let top = image.y1 + p;
        Rect::new(
            p,
            top,
            (self.card_size.width - p).max(p),
            (self.card_size.height - p).max(top),
        )
    }
}
