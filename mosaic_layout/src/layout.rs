// Copyright 2025 the Mosaic Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::vec::Vec;

use kurbo::{Point, Rect, Size};
use mosaic_grid::SpatialGrid;

use crate::config::{ResolverConfig, TourConfig};
use crate::notice::{Notifier, PositionSink};
use crate::resolver::{OverlapResolver, StepOutcome};
use crate::tour::proximity_tour;

/// A card layout: the point grid, the overlap resolver and the tour settings
/// for one dataset.
///
/// Grid cells are square with a side equal to the separation distance, so
/// every pair closer than the separation is found in adjacent cells.
#[derive(Clone, Debug)]
pub struct CardLayout {
    grid: SpatialGrid,
    resolver: OverlapResolver,
    tour: TourConfig,
}

impl CardLayout {
    /// Creates an empty layout for cards of the given footprint.
    #[must_use]
    pub fn new(footprint: Size, config: ResolverConfig) -> Self {
        let resolver = OverlapResolver::new(footprint, config);
        let side = resolver.separation();
        Self {
            grid: SpatialGrid::new(Size::new(side, side)),
            resolver,
            tour: TourConfig::default(),
        }
    }

    /// Replaces every point. Cancels an active run.
    pub fn set_positions<I>(&mut self, positions: I)
    where
        I: IntoIterator<Item = Point>,
    {
        self.resolver.cancel();
        self.grid.build(positions);
    }

    /// Current positions, in id order.
    pub fn positions(&self) -> impl ExactSizeIterator<Item = Point> + '_ {
        self.grid.positions()
    }

    /// Copies current positions into a new vector.
    #[must_use]
    pub fn to_positions(&self) -> Vec<Point> {
        self.positions().collect()
    }

    /// Bounding box of all card centers.
    #[must_use]
    pub fn bounds(&self) -> Option<Rect> {
        self.grid.bounds()
    }

    /// The point grid.
    #[must_use]
    pub fn grid(&self) -> &SpatialGrid {
        &self.grid
    }

    /// The overlap resolver.
    #[must_use]
    pub fn resolver(&self) -> &OverlapResolver {
        &self.resolver
    }

    /// Minimum center distance between cards.
    #[must_use]
    pub fn separation(&self) -> f64 {
        self.resolver.separation()
    }

    /// Sets the tour search bounds.
    pub fn set_tour_config(&mut self, tour: TourConfig) {
        self.tour = tour;
    }

    /// Starts an overlap run. See [`OverlapResolver::start`].
    pub fn begin(&mut self, spacing: f64) -> bool {
        self.resolver.start(spacing)
    }

    /// Returns `true` while an overlap run is active.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.resolver.is_running()
    }

    /// Drops the active run without notifying.
    pub fn cancel(&mut self) {
        self.resolver.cancel();
    }

    /// Performs one overlap iteration. See [`OverlapResolver::step`].
    pub fn step<N, S>(&mut self, spacing: f64, notifier: &mut N, sink: &mut S) -> StepOutcome
    where
        N: Notifier + ?Sized,
        S: PositionSink + ?Sized,
    {
        self.resolver.step(&mut self.grid, spacing, notifier, sink)
    }

    /// Runs the overlap resolver until it finishes.
    pub fn resolve<N, S>(&mut self, spacing: f64, notifier: &mut N, sink: &mut S) -> StepOutcome
    where
        N: Notifier + ?Sized,
        S: PositionSink + ?Sized,
    {
        self.resolver
            .run_to_completion(&mut self.grid, spacing, notifier, sink)
    }

    /// Orders `subset` for sequential visiting. See [`proximity_tour`].
    #[must_use]
    pub fn tour(&self, subset: &[usize]) -> Vec<usize> {
        proximity_tour(&self.grid, subset, &self.tour)
    }
}
