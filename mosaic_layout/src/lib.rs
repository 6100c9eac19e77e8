// Copyright 2025 the Mosaic Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=mosaic_layout --heading-base-level=0

//! Mosaic Layout: de-cluttering and visiting order for cards on a 2D map.
//!
//! Cards are equally sized rectangles centered on points of a
//! [`SpatialGrid`](mosaic_grid::SpatialGrid). This crate provides:
//!
//! - [`OverlapResolver`]: a stepped force simulation that pushes cards apart
//!   until no two centers are closer than `gap + diagonal`. Each
//!   [`step`](OverlapResolver::step) is one relaxation pass, so hosts can run
//!   one per frame and redraw in between. A run is dropped silently when the
//!   host's spacing value changes, and a second start while a run is active is
//!   ignored.
//! - [`proximity_tour`]: a greedy nearest-first ordering of a subset of
//!   points, for stepping through search matches.
//! - [`CardLayout`]: owns a grid sized for the resolver and ties the two
//!   together.
//!
//! Results reach the host through two small traits: a [`Notifier`] that gets
//! a [`Notice`] when a run ends and a [`PositionSink`] that receives moved
//! positions after every iteration. Both are implemented for closures.
//!
//! ## Minimal example
//!
//! ```rust
//! use kurbo::{Point, Size};
//! use mosaic_layout::{CardLayout, Notice, ResolverConfig, StepOutcome};
//!
//! let mut layout = CardLayout::new(Size::new(10.0, 10.0), ResolverConfig::default());
//! layout.set_positions([Point::new(0.0, 0.0), Point::new(1.0, 1.0), Point::new(2.0, 0.0)]);
//!
//! let mut items = layout.to_positions();
//! let mut notices = Vec::new();
//! let spacing = 1.0;
//! assert!(layout.begin(spacing));
//! loop {
//!     // A host would redraw `items` here before the next step.
//!     match layout.step(spacing, &mut |n: Notice| notices.push(n), &mut items) {
//!         StepOutcome::Continue(_) => continue,
//!         outcome => {
//!             assert!(matches!(outcome, StepOutcome::Converged(_)));
//!             break;
//!         }
//!     }
//! }
//! assert!(notices[0].is_success());
//!
//! let order = layout.tour(&[2, 0, 1]);
//! assert_eq!(order.len(), 3);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod config;
mod layout;
mod notice;
mod resolver;
mod tour;

pub use config::{ForceSchedule, ResolverConfig, TourConfig};
pub use layout::CardLayout;
pub use notice::{Notice, Notifier, PositionSink};
pub use resolver::{OverlapResolver, StepOutcome, StepStats};
pub use tour::proximity_tour;
