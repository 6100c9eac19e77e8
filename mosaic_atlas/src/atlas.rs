// Copyright 2025 the Mosaic Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use vello_cpu::kurbo::Rect;

use crate::builder::AtlasBuilder;
use crate::error::AtlasError;
use crate::geometry::{AtlasGeometry, Slot};
use crate::item::AtlasItem;
use crate::layer::AtlasLayer;
use crate::tier::TierList;

/// Every card of a dataset rendered at one tier's scale.
#[derive(Clone, Debug)]
pub struct Atlas {
    pub(crate) tier_id: String,
    pub(crate) geometry: AtlasGeometry,
    pub(crate) layers: Vec<AtlasLayer>,
}

impl Atlas {
    /// Id of the tier this atlas was built for.
    #[must_use]
    pub fn tier_id(&self) -> &str {
        &self.tier_id
    }

    /// Slot packing of this atlas.
    #[must_use]
    pub fn geometry(&self) -> &AtlasGeometry {
        &self.geometry
    }

    /// Layers in slot order.
    #[must_use]
    pub fn layers(&self) -> &[AtlasLayer] {
        &self.layers
    }

    /// One layer.
    #[must_use]
    pub fn layer(&self, index: usize) -> Option<&AtlasLayer> {
        self.layers.get(index)
    }

    /// Slot of item `index`.
    #[must_use]
    pub fn slot(&self, index: usize) -> Option<Slot> {
        self.geometry.slot(index)
    }

    /// Pixel rectangle to sample for item `index`, within its slot's layer.
    #[must_use]
    pub fn source_rect(&self, index: usize) -> Option<Rect> {
        self.slot(index).map(|s| self.geometry.slot_rect(s))
    }

    /// Compresses every layer that is not compressed yet.
    pub fn compress(&mut self) -> Result<(), AtlasError> {
        for layer in &mut self.layers {
            layer.compress()?;
        }
        Ok(())
    }

    /// Snapshot of this atlas for debugging and inspection.
    #[must_use]
    pub fn debug_info(&self) -> AtlasDebugInfo {
        AtlasDebugInfo {
            items: self.geometry.item_count(),
            layers: self.layers.len(),
            compressed_layers: self.layers.iter().filter(|l| l.is_compressed()).count(),
            card_width: self.geometry.card_width(),
            card_height: self.geometry.card_height(),
            scale: self.geometry.scale(),
            stored_bytes: self.layers.iter().map(AtlasLayer::stored_bytes).sum(),
        }
    }
}

/// Debug snapshot of an [`Atlas`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct AtlasDebugInfo {
    /// Items packed.
    pub items: usize,
    /// Layer count.
    pub layers: usize,
    /// Layers held in PNG form.
    pub compressed_layers: usize,
    /// Slot width in pixels.
    pub card_width: u32,
    /// Slot height in pixels.
    pub card_height: u32,
    /// Scale used, after correction.
    pub scale: f64,
    /// Bytes held by all layers.
    pub stored_bytes: usize,
}

/// One atlas per tier of a [`TierList`].
#[derive(Clone, Debug)]
pub struct AtlasSet {
    tiers: TierList,
    /// Same order as `tiers`: coarsest first.
    atlases: Vec<Atlas>,
}

impl AtlasSet {
    /// Builds every tier: the finest one from the items themselves, each
    /// coarser one by resampling the next finer atlas.
    pub fn build_chain<T: AtlasItem>(
        builder: &AtlasBuilder,
        tiers: &TierList,
        items: &mut [T],
    ) -> Result<Self, AtlasError> {
        let mut built: Vec<Atlas> = Vec::with_capacity(tiers.len());
        for tier in tiers.finest_first() {
            let atlas = builder.build(tier, items, built.last())?;
            tracing::debug!(
                tier = %tier.id,
                from = built.last().map(Atlas::tier_id),
                layers = atlas.layers.len(),
                "atlas tier built"
            );
            built.push(atlas);
        }
        built.reverse();
        Ok(Self {
            tiers: tiers.clone(),
            atlases: built,
        })
    }

    /// The tiers, coarsest first.
    #[must_use]
    pub fn tiers(&self) -> &TierList {
        &self.tiers
    }

    /// Atlases, coarsest first.
    #[must_use]
    pub fn atlases(&self) -> &[Atlas] {
        &self.atlases
    }

    /// Atlas of the tier with id `tier`.
    #[must_use]
    pub fn get(&self, tier: &str) -> Option<&Atlas> {
        self.atlases.iter().find(|a| a.tier_id == tier)
    }

    /// Atlas the renderer should use at `zoom`.
    #[must_use]
    pub fn select(&self, zoom: f64) -> Option<&Atlas> {
        self.tiers.select(zoom).and_then(|t| self.get(&t.id))
    }
}
