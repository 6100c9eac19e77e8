// Copyright 2025 the Mosaic Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Stepped overlap resolution over a [`SpatialGrid`].

use alloc::vec::Vec;

use kurbo::{Size, Vec2};
use mosaic_grid::SpatialGrid;

use crate::config::ResolverConfig;
use crate::notice::{Notice, Notifier, PositionSink};

/// Angle increment used to spread coincident points apart.
const GOLDEN_ANGLE: f64 = 2.399_963_229_728_653;

/// Per-iteration statistics.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct StepStats {
    /// One-based number of the iteration just performed.
    pub iteration: u32,
    /// Points moved to a different cell by the sync at the start of the iteration.
    pub rebucketed: usize,
    /// Candidate pairs whose distance was measured.
    pub pairs_checked: usize,
    /// Pairs that were pushed apart.
    pub pairs_pushed: usize,
    /// Largest unscaled overlap seen.
    pub max_overlap: f64,
    /// Force scale used by the iteration.
    pub force_scale: f64,
}

/// Result of one [`OverlapResolver::step`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum StepOutcome {
    /// No run is active.
    Idle,
    /// The iteration moved points; call `step` again on the next frame.
    Continue(StepStats),
    /// No pair needed separation. The run is over.
    Converged(StepStats),
    /// The iteration budget ran out. The run is over and the layout stays as is.
    Exhausted(StepStats),
    /// The spacing changed since the run started. The run was dropped silently.
    Superseded,
}

impl StepOutcome {
    /// Returns `true` if the run is over after this step.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        !matches!(self, Self::Continue(_))
    }

    /// Statistics of the iteration, if one was performed.
    #[must_use]
    pub fn stats(&self) -> Option<&StepStats> {
        match self {
            Self::Continue(s) | Self::Converged(s) | Self::Exhausted(s) => Some(s),
            Self::Idle | Self::Superseded => None,
        }
    }
}

#[derive(Clone, Debug)]
struct Run {
    spacing: f64,
    iteration: u32,
    force_scale: Option<f64>,
    /// Net displacement of each point over the previous iteration.
    momentum: Vec<Vec2>,
    /// Net displacement accumulated by the current iteration.
    displacement: Vec<Vec2>,
}

/// Pushes equally sized rectangular footprints apart until no two centers
/// are closer than the configured separation.
///
/// The resolver is a stepped task: [`start`](Self::start) begins a run and
/// every [`step`](Self::step) performs one relaxation pass, so a host can
/// drive it from its redraw loop. Pairs are relaxed in index order and each
/// push is applied immediately, so later pairs in a pass see the updated
/// positions.
#[derive(Clone, Debug)]
pub struct OverlapResolver {
    footprint: Size,
    config: ResolverConfig,
    run: Option<Run>,
    scratch: Vec<usize>,
}

impl OverlapResolver {
    /// Creates an idle resolver for footprints of the given size.
    #[must_use]
    pub fn new(footprint: Size, config: ResolverConfig) -> Self {
        Self {
            footprint,
            config,
            run: None,
            scratch: Vec::new(),
        }
    }

    /// Footprint shared by every point.
    #[must_use]
    pub fn footprint(&self) -> Size {
        self.footprint
    }

    /// Current tuning.
    #[must_use]
    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Replaces the tuning. Takes effect on the next step.
    pub fn set_config(&mut self, config: ResolverConfig) {
        self.config = config;
    }

    /// Minimum center distance enforced between points.
    #[must_use]
    pub fn separation(&self) -> f64 {
        self.config.separation(self.footprint)
    }

    /// Returns `true` while a run is active.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.run.is_some()
    }

    /// Iterations performed by the active run.
    #[must_use]
    pub fn iteration(&self) -> Option<u32> {
        self.run.as_ref().map(|r| r.iteration)
    }

    /// Begins a run for the given spacing value.
    ///
    /// Returns `false` and changes nothing if a run is already active.
    pub fn start(&mut self, spacing: f64) -> bool {
        if self.run.is_some() {
            tracing::trace!("overlap run already active, ignoring start");
            return false;
        }
        tracing::debug!(spacing, "starting overlap run");
        self.run = Some(Run {
            spacing,
            iteration: 0,
            force_scale: None,
            momentum: Vec::new(),
            displacement: Vec::new(),
        });
        true
    }

    /// Drops the active run without notifying.
    pub fn cancel(&mut self) {
        if self.run.take().is_some() {
            tracing::debug!("overlap run cancelled");
        }
    }

    /// Performs one iteration of the active run.
    ///
    /// `spacing` is the host's current spacing value; if it differs from the
    /// value the run started with, the run is dropped and
    /// [`StepOutcome::Superseded`] is returned without a notice. Points moved
    /// by the iteration are written to `sink`. When the run ends, `notifier`
    /// receives a [`Notice`].
    pub fn step<N, S>(
        &mut self,
        grid: &mut SpatialGrid,
        spacing: f64,
        notifier: &mut N,
        sink: &mut S,
    ) -> StepOutcome
    where
        N: Notifier + ?Sized,
        S: PositionSink + ?Sized,
    {
        let Some(run) = self.run.as_mut() else {
            return StepOutcome::Idle;
        };
        // Bitwise, so a NaN spacing still matches itself.
        if run.spacing.to_bits() != spacing.to_bits() {
            tracing::debug!(
                started = run.spacing,
                current = spacing,
                iterations = run.iteration,
                "overlap run superseded"
            );
            self.run = None;
            return StepOutcome::Superseded;
        }

        let force_scale = self.config.schedule.next(run.iteration, run.force_scale);
        run.force_scale = Some(force_scale);
        core::mem::swap(&mut run.momentum, &mut run.displacement);
        run.momentum.resize(grid.len(), Vec2::ZERO);
        run.displacement.clear();
        run.displacement.resize(grid.len(), Vec2::ZERO);

        let mut stats = StepStats {
            iteration: run.iteration + 1,
            rebucketed: grid.sync(),
            force_scale,
            ..StepStats::default()
        };
        relax(
            grid,
            &self.config,
            self.config.separation(self.footprint),
            force_scale,
            &run.momentum,
            &mut run.displacement,
            &mut self.scratch,
            &mut stats,
        );
        run.iteration += 1;

        for p in grid.points().iter().filter(|p| p.is_dirty()) {
            sink.set_position(p.index(), p.position());
        }
        tracing::trace!(
            iteration = stats.iteration,
            pushed = stats.pairs_pushed,
            max_overlap = stats.max_overlap,
            force_scale,
            "overlap iteration"
        );

        let iterations = run.iteration;
        if stats.pairs_pushed == 0 {
            self.run = None;
            tracing::debug!(iterations, "overlap run converged");
            notifier.notify(Notice::Converged { iterations });
            StepOutcome::Converged(stats)
        } else if iterations >= self.config.max_iterations {
            self.run = None;
            tracing::debug!(
                iterations,
                max_overlap = stats.max_overlap,
                "overlap run exhausted its budget"
            );
            notifier.notify(Notice::NotConverged { iterations });
            StepOutcome::Exhausted(stats)
        } else {
            StepOutcome::Continue(stats)
        }
    }

    /// Starts a run if none is active, then steps it until it finishes.
    ///
    /// For batch and headless hosts; interactive hosts call
    /// [`step`](Self::step) once per frame instead.
    pub fn run_to_completion<N, S>(
        &mut self,
        grid: &mut SpatialGrid,
        spacing: f64,
        notifier: &mut N,
        sink: &mut S,
    ) -> StepOutcome
    where
        N: Notifier + ?Sized,
        S: PositionSink + ?Sized,
    {
        if !self.is_running() {
            self.start(spacing);
        }
        loop {
            let outcome = self.step(grid, spacing, notifier, sink);
            if outcome.is_finished() {
                return outcome;
            }
        }
    }
}

/// One Gauss–Seidel pass over every candidate pair `(i, j)` with `j > i`.
///
/// Each push is weighted against the point's net displacement over the
/// previous iteration (`momentum`); this iteration's moves accumulate in
/// `displacement`.
fn relax(
    grid: &mut SpatialGrid,
    config: &ResolverConfig,
    separation: f64,
    force_scale: f64,
    momentum: &[Vec2],
    displacement: &mut [Vec2],
    scratch: &mut Vec<usize>,
    stats: &mut StepStats,
) {
    let separation_sq = separation * separation;
    let margin = config.margin(separation);
    for i in 0..grid.len() {
        grid.candidates(i, scratch);
        scratch.retain(|&j| j > i);
        scratch.sort_unstable();
        for &j in scratch.iter() {
            let (Some(pi), Some(pj)) = (grid.point(i), grid.point(j)) else {
                continue;
            };
            let delta = pj.position() - pi.position();
            stats.pairs_checked += 1;
            let dist_sq = delta.hypot2();
            if dist_sq >= separation_sq {
                continue;
            }
            let dist = delta.hypot();
            let overlap = separation - dist;
            if overlap <= config.min_force {
                continue;
            }
            stats.pairs_pushed += 1;
            stats.max_overlap = stats.max_overlap.max(overlap);

            let dir = if dist > f64::EPSILON {
                delta / dist
            } else {
                Vec2::from_angle(j as f64 * GOLDEN_ANGLE)
            };
            let push = dir * ((overlap * force_scale + margin) * 0.5);

            let moved_j = push * config.momentum_weight(momentum[j], push);
            let moved_i = -push * config.momentum_weight(momentum[i], -push);
            grid.translate(j, moved_j);
            grid.translate(i, moved_i);
            displacement[j] += moved_j;
            displacement[i] += moved_i;
        }
    }
}
