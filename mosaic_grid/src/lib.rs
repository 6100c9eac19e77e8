// Copyright 2025 the Mosaic Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=mosaic_grid --heading-base-level=0

//! Mosaic Grid: a uniform-cell spatial grid over a mutable point set.
//!
//! This crate provides the neighbor index shared by the Mosaic layout passes.
//! It is tuned for a workload where every point moves a little on every
//! frame and neighbor queries are always "everything within one cell":
//!
//! - Points are bucketed into cells of a fixed [`Size`](kurbo::Size), so a
//!   point's cell is always `floor(x / width), floor(y / height)`.
//! - Cells are created lazily on first occupancy and then live for the
//!   lifetime of the grid, even when emptied. Each cell caches its neighbor
//!   list (itself plus up to eight adjacent cells), wired in both directions
//!   when a cell is created.
//! - Position updates only mark a point dirty; [`SpatialGrid::sync`] moves
//!   dirty points between cells in one batch.
//!
//! It does **not** know what the points represent. Callers own the meaning
//! of point ids (typically an index into their own item array) and decide
//! when to call [`SpatialGrid::sync`].
//!
//! ## Minimal example
//!
//! ```rust
//! use kurbo::{Point, Size, Vec2};
//! use mosaic_grid::{CellCoord, SpatialGrid};
//!
//! let mut grid = SpatialGrid::new(Size::new(10.0, 10.0));
//! grid.build([Point::new(1.0, 1.0), Point::new(12.0, 3.0), Point::new(55.0, 55.0)]);
//!
//! // The first two points live in adjacent cells, so they see each other.
//! let mut scratch = Vec::new();
//! grid.candidates(0, &mut scratch);
//! assert!(scratch.contains(&1));
//! assert!(!scratch.contains(&2));
//!
//! // Moving a point only marks it dirty until the next sync.
//! grid.translate(2, Vec2::new(-50.0, -50.0));
//! assert_eq!(grid.sync(), 1);
//! assert_eq!(grid.point(2).unwrap().cell(), CellCoord::new(0, 0));
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod coord;
mod grid;

pub use coord::{CellCoord, Ring};
pub use grid::{Cell, CellId, GridDebugInfo, GridPoint, SpatialGrid};
