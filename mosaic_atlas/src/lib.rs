// Copyright 2025 the Mosaic Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=mosaic_atlas --heading-base-level=0

//! Mosaic Atlas: card thumbnails and labels packed into raster layers, one
//! atlas per zoom tier.
//!
//! A renderer that draws thousands of cards cannot afford one texture per
//! card. Instead every card is rendered once per [`ScaleTier`] into a grid of
//! equally sized slots, and slots are packed row-major into layers no larger
//! than the [`RasterLimits`]. Each item learns its [`Slot`] through
//! [`AtlasItem::record_slot`], keyed by tier id.
//!
//! - [`AtlasGeometry`] works out card pixel size, slots per layer and layer
//!   count, correcting scales that would make a card vanish or overflow.
//! - [`AtlasBuilder`] renders cards with `vello_cpu`: a shared card template,
//!   the thumbnail fitted under a rounded mask and a wrapped label.
//! - [`AtlasSet::build_chain`] renders the finest tier from scratch and each
//!   coarser tier by resampling the one above it.
//! - [`AtlasLayer::compress`] keeps a finished layer as lossless PNG bytes.
//!
//! ## Minimal example
//!
//! ```rust
//! use mosaic_atlas::{AtlasBuilder, AtlasSet, BuildOptions, CardItem, CardStyle, TierList};
//!
//! let mut items: Vec<CardItem> = (0..12).map(|i| CardItem::new(None, format!("card {i}"))).collect();
//! let builder = AtlasBuilder::new(CardStyle::default(), BuildOptions::default());
//! let set = AtlasSet::build_chain(&builder, &TierList::default(), &mut items).unwrap();
//!
//! let atlas = set.select(0.3).unwrap();
//! assert_eq!(atlas.tier_id(), "medium");
//! assert_eq!(items[5].slot("medium"), atlas.slot(5));
//! ```

mod atlas;
mod builder;
mod error;
mod font;
mod geometry;
mod item;
mod layer;
mod style;
mod text;
mod tier;

pub use atlas::{Atlas, AtlasDebugInfo, AtlasSet};
pub use builder::{AtlasBuilder, BuildOptions};
pub use error::AtlasError;
pub use font::{FontMeasure, LabelFont};
pub use geometry::{AtlasGeometry, Slot};
pub use item::{AtlasItem, CardItem};
pub use layer::{AtlasLayer, LayerSurface};
pub use style::{CardStyle, RasterLimits};
pub use text::{CharWidthCache, FixedAdvance, TextMeasure, WrappedLabel, wrap_label};
pub use tier::{ScaleTier, TierList};
