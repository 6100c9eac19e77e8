// Copyright 2025 the Mosaic Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Atlas layers and their two storage forms.

use std::sync::Arc;

use png::{BitDepth, ColorType};
use vello_cpu::Pixmap;

use crate::error::AtlasError;

/// Backing store of a finished layer.
#[derive(Clone)]
pub enum LayerSurface {
    /// Premultiplied RGBA8 pixels, ready to sample.
    Raster(Arc<Pixmap>),
    /// The same premultiplied pixels stored as PNG.
    Encoded(Arc<[u8]>),
}

impl core::fmt::Debug for LayerSurface {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Raster(p) => write!(f, "Raster({}x{})", p.width(), p.height()),
            Self::Encoded(bytes) => write!(f, "Encoded({} bytes)", bytes.len()),
        }
    }
}

/// One raster of card slots.
///
/// A layer is immutable once built. [`compress`](Self::compress) swaps the
/// pixel buffer for a PNG of the same bytes; [`pixmap`](Self::pixmap) reads
/// either form, so readers do not care which one is stored.
#[derive(Clone, Debug)]
pub struct AtlasLayer {
    surface: LayerSurface,
    width: u16,
    height: u16,
    slots_x: u32,
    slots_y: u32,
}

impl AtlasLayer {
    /// Wraps a rendered pixmap holding `slots_x` × `slots_y` card slots.
    #[must_use]
    pub fn from_pixmap(pixmap: Pixmap, slots_x: u32, slots_y: u32) -> Self {
        Self {
            width: pixmap.width(),
            height: pixmap.height(),
            surface: LayerSurface::Raster(Arc::new(pixmap)),
            slots_x,
            slots_y,
        }
    }

    /// Width in pixels.
    #[must_use]
    pub fn width(&self) -> u16 {
        self.width
    }

    /// Height in pixels.
    #[must_use]
    pub fn height(&self) -> u16 {
        self.height
    }

    /// Slot columns used by this layer.
    #[must_use]
    pub fn slots_x(&self) -> u32 {
        self.slots_x
    }

    /// Slot rows used by this layer.
    #[must_use]
    pub fn slots_y(&self) -> u32 {
        self.slots_y
    }

    /// Current backing store.
    #[must_use]
    pub fn surface(&self) -> &LayerSurface {
        &self.surface
    }

    /// Returns `true` once the layer holds its PNG form.
    #[must_use]
    pub fn is_compressed(&self) -> bool {
        matches!(self.surface, LayerSurface::Encoded(_))
    }

    /// Bytes held by the current backing store.
    #[must_use]
    pub fn stored_bytes(&self) -> usize {
        match &self.surface {
            LayerSurface::Raster(p) => p.data_as_u8_slice().len(),
            LayerSurface::Encoded(bytes) => bytes.len(),
        }
    }

    /// Replaces the pixel buffer with its PNG encoding. Does nothing if the
    /// layer is already compressed.
    pub fn compress(&mut self) -> Result<(), AtlasError> {
        let LayerSurface::Raster(pixmap) = &self.surface else {
            return Ok(());
        };
        let encoded = encode(pixmap)?;
        tracing::trace!(
            width = self.width,
            height = self.height,
            raw = pixmap.data_as_u8_slice().len(),
            encoded = encoded.len(),
            "compressed atlas layer"
        );
        self.surface = LayerSurface::Encoded(encoded.into());
        Ok(())
    }

    /// The layer's pixels, decoding the PNG form if needed.
    pub fn pixmap(&self) -> Result<Arc<Pixmap>, AtlasError> {
        match &self.surface {
            LayerSurface::Raster(p) => Ok(Arc::clone(p)),
            LayerSurface::Encoded(bytes) => decode(bytes, self.width, self.height).map(Arc::new),
        }
    }
}

/// Encodes the premultiplied bytes as-is, so decoding restores them exactly.
fn encode(pixmap: &Pixmap) -> Result<Vec<u8>, AtlasError> {
    let mut out = Vec::new();
    {
        let mut encoder = png::Encoder::new(
            &mut out,
            u32::from(pixmap.width()),
            u32::from(pixmap.height()),
        );
        encoder.set_color(ColorType::Rgba);
        encoder.set_depth(BitDepth::Eight);
        let mut writer = encoder.write_header()?;
        writer.write_image_data(pixmap.data_as_u8_slice())?;
        writer.finish()?;
    }
    Ok(out)
}

fn decode(bytes: &[u8], width: u16, height: u16) -> Result<Pixmap, AtlasError> {
    let decoder = png::Decoder::new(bytes);
    let mut reader = decoder.read_info()?;
    let mut buf = vec![0_u8; reader.output_buffer_size()];
    let info = reader.next_frame(&mut buf)?;
    let corrupt = AtlasError::Corrupt {
        expected: (width, height),
        found: (info.width, info.height),
    };
    if info.width != u32::from(width)
        || info.height != u32::from(height)
        || info.color_type != ColorType::Rgba
        || info.bit_depth != BitDepth::Eight
    {
        return Err(corrupt);
    }
    let mut pixmap = Pixmap::new(width, height);
    let dst = pixmap.data_as_u8_slice_mut();
    if dst.len() != info.buffer_size() || buf.len() < dst.len() {
        return Err(corrupt);
    }
    dst.copy_from_slice(&buf[..info.buffer_size()]);
    Ok(pixmap)
}
