// Copyright 2025 the Mosaic Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use hashbrown::HashMap;
use peniko::ImageData;

use crate::geometry::Slot;

/// What the atlas builder needs from an item, and where it reports back.
pub trait AtlasItem {
    /// Decoded thumbnail, if the item has one.
    fn thumbnail(&self) -> Option<&ImageData>;

    /// Label text drawn under the thumbnail.
    fn label(&self) -> &str;

    /// Records the item's slot in the atlas of tier `tier`.
    fn record_slot(&mut self, tier: &str, slot: Slot);
}

/// A plain item with an owned thumbnail, label and per-tier slots.
#[derive(Clone, Debug, Default)]
pub struct CardItem {
    /// Decoded thumbnail.
    pub thumbnail: Option<ImageData>,
    /// Label text.
    pub label: String,
    slots: HashMap<String, Slot>,
}

impl CardItem {
    /// Creates an item with no slots recorded yet.
    pub fn new(thumbnail: Option<ImageData>, label: impl Into<String>) -> Self {
        Self {
            thumbnail,
            label: label.into(),
            slots: HashMap::new(),
        }
    }

    /// Slot recorded for `tier`.
    #[must_use]
    pub fn slot(&self, tier: &str) -> Option<Slot> {
        self.slots.get(tier).copied()
    }
}

impl AtlasItem for CardItem {
    fn thumbnail(&self) -> Option<&ImageData> {
        self.thumbnail.as_ref()
    }

    fn label(&self) -> &str {
        &self.label
    }

    fn record_slot(&mut self, tier: &str, slot: Slot) {
        if let Some(existing) = self.slots.get_mut(tier) {
            *existing = slot;
        } else {
            self.slots.insert(tier.to_owned(), slot);
        }
    }
}
