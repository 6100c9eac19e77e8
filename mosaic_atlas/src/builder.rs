// Copyright 2025 the Mosaic Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Rendering cards into atlas layers.

use std::sync::Arc;

use peniko::{ImageData, ImageQuality, ImageSampler};
use vello_cpu::kurbo::{Affine, BezPath, Circle, Rect, RoundedRect, Shape, Stroke};
use vello_cpu::{Image, ImageSource, Pixmap, RenderContext, RenderMode, RenderSettings};

use crate::atlas::Atlas;
use crate::error::AtlasError;
use crate::font::{FontMeasure, LabelFont};
use crate::geometry::{AtlasGeometry, Slot};
use crate::item::AtlasItem;
use crate::layer::AtlasLayer;
use crate::style::{CardStyle, RasterLimits};
use crate::text::{CharWidthCache, wrap_label};
use crate::tier::ScaleTier;

const TOLERANCE: f64 = 0.1;

/// Build-wide settings.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct BuildOptions {
    /// Largest layer surface.
    pub limits: RasterLimits,
    /// Compress each layer as soon as it is rendered.
    pub compress: bool,
}

/// Renders items into tier atlases.
#[derive(Clone, Debug, Default)]
pub struct AtlasBuilder {
    style: CardStyle,
    options: BuildOptions,
    font: Option<LabelFont>,
}

impl AtlasBuilder {
    /// Creates a builder. Labels are skipped until a font is set.
    #[must_use]
    pub fn new(style: CardStyle, options: BuildOptions) -> Self {
        Self {
            style,
            options,
            font: None,
        }
    }

    /// Sets the label font.
    #[must_use]
    pub fn with_font(mut self, font: LabelFont) -> Self {
        self.font = Some(font);
        self
    }

    /// Card style.
    #[must_use]
    pub fn style(&self) -> &CardStyle {
        &self.style
    }

    /// Build settings.
    #[must_use]
    pub fn options(&self) -> &BuildOptions {
        &self.options
    }

    /// Packing `item_count` cards at `scale` would produce.
    #[must_use]
    pub fn geometry(&self, item_count: usize, scale: f64) -> AtlasGeometry {
        AtlasGeometry::compute(item_count, scale, self.style.card_size, self.options.limits)
    }

    /// Builds the atlas of `tier` and records every item's slot under the
    /// tier id.
    ///
    /// With a `reference` atlas, each card is resampled from its slot there
    /// instead of being drawn again; items the reference does not cover are
    /// drawn in full.
    pub fn build<T: AtlasItem>(
        &self,
        tier: &ScaleTier,
        items: &mut [T],
        reference: Option<&Atlas>,
    ) -> Result<Atlas, AtlasError> {
        let geometry = self.geometry(items.len(), tier.quality_factor);
        if let Some(scale) = geometry.corrected_scale() {
            tracing::debug!(
                tier = %tier.id,
                requested = tier.quality_factor,
                scale,
                "atlas scale corrected"
            );
        }

        let mut composer = Composer::new(&self.style, self.font.as_ref(), &geometry);
        let mut references = Vec::new();
        if let Some(r) = reference {
            references.resize(r.layers.len(), None);
        }

        let mut layers = Vec::with_capacity(geometry.layer_count());
        for index in 0..geometry.layer_count() {
            let Some((width, height)) = geometry.layer_size(index) else {
                continue;
            };
            let mut ctx = RenderContext::new_with(width, height, render_settings());
            let range = geometry.layer_items(index);
            let count = range.len();
            for i in range {
                let Some(slot) = geometry.slot(i) else {
                    continue;
                };
                items[i].record_slot(&tier.id, slot);
                let copied = match reference {
                    Some(r) => copy_from_reference(&mut ctx, &geometry, slot, r, i, &mut references)?,
                    None => false,
                };
                if !copied {
                    composer.draw(&mut ctx, slot, &items[i]);
                }
            }

            let mut pixmap = Pixmap::new(width, height);
            ctx.flush();
            ctx.render_to_pixmap(&mut pixmap);
            let columns = geometry.columns() as usize;
            let mut layer = AtlasLayer::from_pixmap(
                pixmap,
                u32::try_from(count.min(columns)).unwrap_or(u32::MAX),
                u32::try_from(count.div_ceil(columns)).unwrap_or(u32::MAX),
            );
            if self.options.compress {
                layer.compress()?;
            }
            tracing::debug!(
                tier = %tier.id,
                layer = index,
                width,
                height,
                items = count,
                resampled = reference.is_some(),
                "atlas layer rendered"
            );
            layers.push(layer);
        }

        Ok(Atlas {
            tier_id: tier.id.clone(),
            geometry,
            layers,
        })
    }
}

fn render_settings() -> RenderSettings {
    RenderSettings {
        render_mode: RenderMode::OptimizeSpeed,
        ..RenderSettings::default()
    }
}

fn image_paint(image: ImageSource) -> Image {
    Image {
        image,
        sampler: ImageSampler::default(),
    }
}

/// Nearest sampling, for pixel-aligned copies.
fn blit_paint(image: ImageSource) -> Image {
    Image {
        image,
        sampler: ImageSampler {
            quality: ImageQuality::Low,
            ..ImageSampler::default()
        },
    }
}

/// Resamples item `index` from `reference` into `slot`. Returns `false` if the
/// reference has no slot for the item.
fn copy_from_reference(
    ctx: &mut RenderContext,
    geometry: &AtlasGeometry,
    slot: Slot,
    reference: &Atlas,
    index: usize,
    cache: &mut [Option<Arc<Pixmap>>],
) -> Result<bool, AtlasError> {
    let Some(src_slot) = reference.slot(index) else {
        return Ok(false);
    };
    let layer_index = src_slot.layer as usize;
    let Some(entry) = cache.get_mut(layer_index) else {
        return Ok(false);
    };
    let source = match entry {
        Some(p) => Arc::clone(p),
        None => {
            let Some(layer) = reference.layer(layer_index) else {
                return Ok(false);
            };
            let p = layer.pixmap()?;
            *entry = Some(Arc::clone(&p));
            p
        }
    };

    let src = reference.geometry.slot_rect(src_slot);
    let dst = geometry.slot_rect(slot);
    let local = Affine::translate((dst.x0, dst.y0))
        * Affine::scale_non_uniform(dst.width() / src.width(), dst.height() / src.height())
        * Affine::translate((-src.x0, -src.y0));
    ctx.set_transform(local);
    ctx.set_paint(image_paint(ImageSource::Pixmap(source)));
    ctx.fill_rect(&src);
    Ok(true)
}

/// Draws full cards: shared template, masked thumbnail, wrapped label.
struct Composer<'a> {
    style: &'a CardStyle,
    font: Option<&'a LabelFont>,
    geometry: &'a AtlasGeometry,
    template: Option<Arc<Pixmap>>,
    widths: Option<CharWidthCache<FontMeasure<'a>>>,
}

impl<'a> Composer<'a> {
    fn new(style: &'a CardStyle, font: Option<&'a LabelFont>, geometry: &'a AtlasGeometry) -> Self {
        Self {
            style,
            font,
            geometry,
            template: None,
            widths: font
                .and_then(|f| f.measurer(style.label_size))
                .map(CharWidthCache::new),
        }
    }

    fn draw<T: AtlasItem>(&mut self, ctx: &mut RenderContext, slot: Slot, item: &T) {
        let template = self.template();
        ctx.set_transform(Affine::translate((f64::from(slot.x), f64::from(slot.y))));
        ctx.set_paint(blit_paint(ImageSource::Pixmap(template)));
        ctx.fill_rect(&Rect::new(
            0.0,
            0.0,
            f64::from(self.geometry.card_width()),
            f64::from(self.geometry.card_height()),
        ));

        let base = self.geometry.slot_transform(slot);
        self.draw_thumbnail(ctx, base, item.thumbnail());
        self.draw_label(ctx, base, item.label());
    }

    /// Background, border and control dot, rendered once per build at slot size.
    fn template(&mut self) -> Arc<Pixmap> {
        if let Some(t) = &self.template {
            return Arc::clone(t);
        }
        let style = self.style;
        let (w, h) = (self.geometry.card_width(), self.geometry.card_height());
        let (w, h) = (
            u16::try_from(w).unwrap_or(u16::MAX),
            u16::try_from(h).unwrap_or(u16::MAX),
        );
        let mut ctx = RenderContext::new_with(w, h, render_settings());
        let origin = self.geometry.slot_transform(Slot::default());
        ctx.set_transform(origin);

        let card = style.card_rect();
        let bw = style.border_width.max(0.0);
        let body = RoundedRect::from_rect(card.inset(-bw * 0.5), style.corner_radius).to_path(TOLERANCE);
        ctx.set_paint(style.background);
        ctx.fill_path(&body);
        if bw > 0.0 {
            ctx.set_stroke(Stroke::new(bw));
            ctx.set_paint(style.border);
            ctx.stroke_path(&body);
        }
        if let Some(r) = style.control_radius {
            let center = (card.x1 - style.padding - r, card.y0 + style.padding + r);
            ctx.set_paint(style.control_color);
            ctx.fill_path(&Circle::new(center, r).to_path(TOLERANCE));
        }

        let mut pixmap = Pixmap::new(w, h);
        ctx.flush();
        ctx.render_to_pixmap(&mut pixmap);
        let template = Arc::new(pixmap);
        self.template = Some(Arc::clone(&template));
        template
    }

    fn draw_thumbnail(&self, ctx: &mut RenderContext, base: Affine, thumbnail: Option<&ImageData>) {
        let frame = self.style.image_box();
        let mask = RoundedRect::from_rect(frame, self.style.corner_radius * 0.75).to_path(TOLERANCE);
        ctx.set_transform(base);
        ctx.push_clip_layer(&mask);
        match thumbnail.filter(|img| img.width > 0 && img.height > 0) {
            Some(img) => {
                let (iw, ih) = (f64::from(img.width), f64::from(img.height));
                let fit = (frame.width() / iw).min(frame.height() / ih);
                let offset = (
                    frame.center().x - iw * fit * 0.5,
                    frame.center().y - ih * fit * 0.5,
                );
                ctx.set_transform(base * Affine::translate(offset) * Affine::scale(fit));
                ctx.set_paint(image_paint(ImageSource::from_peniko_image_data(img)));
                ctx.fill_rect(&Rect::new(0.0, 0.0, iw, ih));
            }
            None => {
                ctx.set_paint(self.style.placeholder);
                ctx.fill_rect(&frame);
            }
        }
        ctx.pop_layer();
    }

    fn draw_label(&mut self, ctx: &mut RenderContext, base: Affine, label: &str) {
        let (Some(font), Some(widths)) = (self.font, self.widths.as_mut()) else {
            return;
        };
        let style = self.style;
        let frame = style.label_box();
        let wrapped = wrap_label(label, frame.width(), style.label_lines, widths);
        if wrapped.lines.is_empty() {
            return;
        }
        let clip: BezPath = frame.to_path(TOLERANCE);
        ctx.set_transform(base);
        ctx.push_clip_layer(&clip);
        ctx.set_paint(style.label_color);
        let advance = style.label_size * style.line_height;
        for (row, line) in wrapped.lines.iter().enumerate() {
            let baseline = frame.y0 + style.label_size + advance * row as f64;
            ctx.set_transform(base * Affine::translate((frame.x0, baseline)));
            ctx.fill_path(&font.line_path(line, style.label_size));
        }
        ctx.set_transform(base);
        ctx.pop_layer();
    }
}
