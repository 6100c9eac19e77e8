// Copyright 2025 the Mosaic Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Label font: glyph advances and outlines through `skrifa`.

use std::sync::Arc;

use skrifa::charmap::Charmap;
use skrifa::instance::{LocationRef, Size};
use skrifa::metrics::GlyphMetrics;
use skrifa::outline::{OutlineGlyphCollection, OutlinePen};
use skrifa::{FontRef, MetadataProvider};
use vello_cpu::kurbo::BezPath;

use crate::error::AtlasError;
use crate::text::TextMeasure;

/// Font used to measure and draw card labels.
///
/// Holds the raw font bytes; glyph tables are parsed on demand.
#[derive(Clone)]
pub struct LabelFont {
    data: Arc<[u8]>,
    index: u32,
}

impl core::fmt::Debug for LabelFont {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("LabelFont")
            .field("data", &format_args!("{} bytes", self.data.len()))
            .field("index", &self.index)
            .finish()
    }
}

impl LabelFont {
    /// Loads face `index` from font (or collection) bytes.
    pub fn new(data: impl Into<Arc<[u8]>>, index: u32) -> Result<Self, AtlasError> {
        let data = data.into();
        FontRef::from_index(&data, index)?;
        Ok(Self { data, index })
    }

    fn font_ref(&self) -> Option<FontRef<'_>> {
        FontRef::from_index(&self.data, self.index).ok()
    }

    /// Measurer for text at `size` pixels per em.
    #[must_use]
    pub fn measurer(&self, size: f64) -> Option<FontMeasure<'_>> {
        let font = self.font_ref()?;
        let px = to_f32(size);
        Some(FontMeasure {
            charmap: font.charmap(),
            metrics: GlyphMetrics::new(&font, Size::new(px), LocationRef::default()),
            fallback: size * 0.6,
        })
    }

    /// Outline of one line of text at `size`, with the pen starting at the
    /// origin on the baseline and y growing downwards.
    ///
    /// Characters missing from the font advance by the fallback width and
    /// draw nothing.
    #[must_use]
    pub fn line_path(&self, text: &str, size: f64) -> BezPath {
        let mut path = BezPath::new();
        let Some(font) = self.font_ref() else {
            return path;
        };
        let px = to_f32(size);
        let charmap = font.charmap();
        let metrics = GlyphMetrics::new(&font, Size::new(px), LocationRef::default());
        let outlines: OutlineGlyphCollection<'_> = font.outline_glyphs();
        let mut x = 0.0_f64;
        for ch in text.chars() {
            let Some(gid) = charmap.map(ch) else {
                x += size * 0.6;
                continue;
            };
            if let Some(glyph) = outlines.get(gid) {
                let mut pen = PathPen {
                    path: &mut path,
                    x,
                };
                if let Err(err) = glyph.draw(Size::new(px), &mut pen) {
                    tracing::trace!(%ch, %err, "label glyph skipped");
                }
            }
            x += metrics
                .advance_width(gid)
                .map_or(size * 0.6, f64::from);
        }
        path
    }
}

/// Advance widths from a [`LabelFont`] at one size.
pub struct FontMeasure<'a> {
    charmap: Charmap<'a>,
    metrics: GlyphMetrics<'a>,
    fallback: f64,
}

impl core::fmt::Debug for FontMeasure<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FontMeasure")
            .field("fallback", &self.fallback)
            .finish_non_exhaustive()
    }
}

impl TextMeasure for FontMeasure<'_> {
    fn advance(&mut self, ch: char) -> f64 {
        self.charmap
            .map(ch)
            .and_then(|gid| self.metrics.advance_width(gid))
            .map_or(self.fallback, f64::from)
    }
}

/// Appends glyph outlines to a path, offset by `x` and flipped to y-down.
struct PathPen<'a> {
    path: &'a mut BezPath,
    x: f64,
}

impl PathPen<'_> {
    fn pt(&self, x: f32, y: f32) -> (f64, f64) {
        (self.x + f64::from(x), -f64::from(y))
    }
}

impl OutlinePen for PathPen<'_> {
    fn move_to(&mut self, x: f32, y: f32) {
        let p = self.pt(x, y);
        self.path.move_to(p);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        let p = self.pt(x, y);
        self.path.line_to(p);
    }

    fn quad_to(&mut self, cx0: f32, cy0: f32, x: f32, y: f32) {
        let (c, p) = (self.pt(cx0, cy0), self.pt(x, y));
        self.path.quad_to(c, p);
    }

    fn curve_to(&mut self, cx0: f32, cy0: f32, cx1: f32, cy1: f32, x: f32, y: f32) {
        let (c0, c1, p) = (self.pt(cx0, cy0), self.pt(cx1, cy1), self.pt(x, y));
        self.path.curve_to(c0, c1, p);
    }

    fn close(&mut self) {
        self.path.close_path();
    }
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "font sizes are small positive values"
)]
fn to_f32(v: f64) -> f32 {
    v as f32
}
