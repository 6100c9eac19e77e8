// Copyright 2025 the Mosaic Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scale tiers: which atlas quality to show at which zoom.

/// One pre-rendered quality level.
#[derive(Clone, Debug, PartialEq)]
pub struct ScaleTier {
    /// Key under which items record their slot for this tier.
    pub id: String,
    /// Smallest zoom at which the renderer switches to this tier.
    pub scale_threshold: f64,
    /// Raster pixels per item unit in this tier's atlas.
    pub quality_factor: f64,
}

impl ScaleTier {
    /// Creates a tier.
    pub fn new(id: impl Into<String>, scale_threshold: f64, quality_factor: f64) -> Self {
        Self {
            id: id.into(),
            scale_threshold,
            quality_factor,
        }
    }
}

/// Scale tiers ordered from coarsest to finest.
///
/// Input order does not matter: tiers are sorted by quality factor, then by
/// threshold.
#[derive(Clone, Debug, PartialEq)]
pub struct TierList {
    tiers: Vec<ScaleTier>,
}

impl Default for TierList {
    /// Three tiers: an eighth-resolution overview, half resolution from zoom
    /// 0.25 and full resolution from zoom 0.75.
    fn default() -> Self {
        Self::new([
            ScaleTier::new("overview", 0.0, 0.125),
            ScaleTier::new("medium", 0.25, 0.5),
            ScaleTier::new("full", 0.75, 1.0),
        ])
    }
}

impl TierList {
    /// Builds a list from tiers in any order.
    pub fn new(tiers: impl IntoIterator<Item = ScaleTier>) -> Self {
        let mut tiers: Vec<_> = tiers.into_iter().collect();
        tiers.sort_by(|a, b| {
            a.quality_factor
                .total_cmp(&b.quality_factor)
                .then(a.scale_threshold.total_cmp(&b.scale_threshold))
        });
        Self { tiers }
    }

    /// Number of tiers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tiers.len()
    }

    /// Returns `true` if there are no tiers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tiers.is_empty()
    }

    /// Tiers from coarsest to finest.
    pub fn iter(&self) -> core::slice::Iter<'_, ScaleTier> {
        self.tiers.iter()
    }

    /// Tiers from finest to coarsest, the order of a chained build.
    pub fn finest_first(&self) -> core::iter::Rev<core::slice::Iter<'_, ScaleTier>> {
        self.tiers.iter().rev()
    }

    /// Lowest-quality tier.
    #[must_use]
    pub fn coarsest(&self) -> Option<&ScaleTier> {
        self.tiers.first()
    }

    /// Highest-quality tier.
    #[must_use]
    pub fn finest(&self) -> Option<&ScaleTier> {
        self.tiers.last()
    }

    /// Looks a tier up by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&ScaleTier> {
        self.tiers.iter().find(|t| t.id == id)
    }

    /// Tier to display at `zoom`: the one with the largest threshold not
    /// above `zoom`, or the coarsest tier when `zoom` is below every
    /// threshold.
    #[must_use]
    pub fn select(&self, zoom: f64) -> Option<&ScaleTier> {
        self.tiers
            .iter()
            .filter(|t| t.scale_threshold <= zoom)
            .max_by(|a, b| a.scale_threshold.total_cmp(&b.scale_threshold))
            .or_else(|| self.coarsest())
    }
}

impl<'a> IntoIterator for &'a TierList {
    type Item = &'a ScaleTier;
    type IntoIter = core::slice::Iter<'a, ScaleTier>;

    fn into_iter(self) -> Self::IntoIter {
        self.tiers.iter()
    }
}
