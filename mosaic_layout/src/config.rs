// Copyright 2025 the Mosaic Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::{Size, Vec2};

/// Decaying multiplier applied to every repulsion push.
///
/// The scale starts at `initial`, drops by `step` after every iteration down
/// to `floor`, and is set back to `reset_to` once, at iteration `reset_at`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ForceSchedule {
    /// Scale used by the first iteration.
    pub initial: f64,
    /// Amount subtracted after each iteration.
    pub step: f64,
    /// Lower bound of the scale.
    pub floor: f64,
    /// Zero-based iteration at which the scale is reset.
    pub reset_at: u32,
    /// Scale after the reset.
    pub reset_to: f64,
}

impl Default for ForceSchedule {
    fn default() -> Self {
        Self {
            initial: 0.99,
            step: 0.005,
            floor: 0.8,
            reset_at: 100,
            reset_to: 0.99,
        }
    }
}

impl ForceSchedule {
    /// Scale in effect for zero-based `iteration`, given the scale used by
    /// the previous one.
    #[must_use]
    pub fn next(&self, iteration: u32, previous: Option<f64>) -> f64 {
        if iteration == self.reset_at && iteration > 0 {
            return self.reset_to;
        }
        match previous {
            None => self.initial,
            Some(prev) => (prev - self.step).max(self.floor),
        }
    }
}

/// Tuning for [`OverlapResolver`](crate::OverlapResolver).
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ResolverConfig {
    /// Extra clearance kept between footprints, on top of their diagonal.
    pub gap: f64,
    /// Iteration budget for one run.
    pub max_iterations: u32,
    /// Overlaps at or below this value count as resolved.
    pub min_force: f64,
    /// Fraction of the separation added to every push, so a resolved pair
    /// ends slightly beyond the separation instead of approaching it from
    /// below.
    pub overshoot: f64,
    /// Force-scale schedule.
    pub schedule: ForceSchedule,
    /// Weight for a push that continues a point's previous displacement.
    pub agree_weight: f64,
    /// Weight for a push that reverses it.
    pub reverse_weight: f64,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            gap: 2.0,
            max_iterations: 500,
            min_force: 1e-3,
            overshoot: 0.02,
            schedule: ForceSchedule::default(),
            agree_weight: 1.2,
            reverse_weight: 0.5,
        }
    }
}

impl ResolverConfig {
    /// Minimum center distance between two footprints: the gap plus the
    /// footprint diagonal.
    #[must_use]
    pub fn separation(&self, footprint: Size) -> f64 {
        self.gap + Vec2::new(footprint.width, footprint.height).hypot()
    }

    /// Distance added to every push for footprints `separation` apart.
    #[must_use]
    pub fn margin(&self, separation: f64) -> f64 {
        (self.overshoot * separation).max(0.0)
    }

    /// Momentum weight for `push` given the point's net displacement over
    /// the previous iteration.
    #[must_use]
    pub fn momentum_weight(&self, last: Vec2, push: Vec2) -> f64 {
        let agreement = last.dot(push);
        if agreement > 0.0 {
            self.agree_weight
        } else if agreement < 0.0 {
            self.reverse_weight
        } else {
            1.0
        }
    }
}

/// Tuning for [`proximity_tour`](crate::proximity_tour).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TourConfig {
    /// Largest ring radius searched before falling back to a linear scan.
    pub max_ring_radius: u32,
}

impl Default for TourConfig {
    fn default() -> Self {
        Self { max_ring_radius: 32 }
    }
}
