// Copyright 2025 the Mosaic Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tests for the `mosaic_layout` crate.
//!
//! These drive whole resolver runs and tours through [`CardLayout`] and check
//! the layout-level guarantees: separation after convergence, quiet reruns,
//! silent supersession and tour permutations.

use kurbo::{Point, Size};
use mosaic_layout::{CardLayout, Notice, ResolverConfig, StepOutcome, TourConfig};

const TOLERANCE: f64 = 0.01;

fn footprint() -> Size {
    Size::new(10.0, 10.0)
}

fn min_pair_distance(points: &[Point]) -> f64 {
    let mut min = f64::INFINITY;
    for (i, a) in points.iter().enumerate() {
        for b in &points[i + 1..] {
            min = min.min(a.distance(*b));
        }
    }
    min
}

/// Xorshift generator, so scattered inputs are the same on every run.
struct Rng(u64);

impl Rng {
    fn next_u64(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }

    fn range(&mut self, lo: f64, hi: f64) -> f64 {
        let unit = (self.next_u64() >> 11) as f64 / (1_u64 << 53) as f64;
        lo + (hi - lo) * unit
    }
}

fn resolve(layout: &mut CardLayout) -> (StepOutcome, Vec<Notice>) {
    let mut notices = Vec::new();
    let outcome = layout.resolve(1.0, &mut |n: Notice| notices.push(n), &mut ());
    (outcome, notices)
}

#[test]
fn five_clustered_points_converge_apart() {
    let mut layout = CardLayout::new(footprint(), ResolverConfig::default());
    layout.set_positions([
        Point::new(0.0, 0.0),
        Point::new(1.0, 1.0),
        Point::new(2.0, 2.0),
        Point::new(0.0, 2.0),
        Point::new(2.0, 0.0),
    ]);
    let separation = layout.separation();
    assert!((separation - (2.0 + 200.0_f64.sqrt())).abs() < 1e-12, "gap + diagonal");

    let (outcome, notices) = resolve(&mut layout);
    let StepOutcome::Converged(stats) = outcome else {
        panic!("expected convergence, got {outcome:?}");
    };
    assert!(stats.iteration <= 500, "within budget");
    assert_eq!(notices, vec![Notice::Converged { iterations: stats.iteration }]);

    let min = min_pair_distance(&layout.to_positions());
    assert!(min >= separation - TOLERANCE, "closest pair {min} < {separation}");
}

#[test]
fn rerun_after_convergence_takes_one_iteration() {
    let mut layout = CardLayout::new(footprint(), ResolverConfig::default());
    layout.set_positions((0..12).map(|i| Point::new(f64::from(i % 4), f64::from(i / 4))));
    let (first, _) = resolve(&mut layout);
    assert!(matches!(first, StepOutcome::Converged(_)), "{first:?}");
    let before = layout.to_positions();

    let (second, notices) = resolve(&mut layout);
    assert!(
        matches!(second, StepOutcome::Converged(s) if s.iteration == 1),
        "{second:?}"
    );
    assert_eq!(notices, vec![Notice::Converged { iterations: 1 }]);
    assert_eq!(layout.to_positions(), before, "nothing moved");
}

#[test]
fn dense_random_scatter_converges() {
    let mut rng = Rng(0x9E37_79B9_7F4A_7C15);
    let start: Vec<Point> = (0..300)
        .map(|_| Point::new(rng.range(0.0, 150.0), rng.range(0.0, 150.0)))
        .collect();
    let mut layout = CardLayout::new(footprint(), ResolverConfig::default());
    layout.set_positions(start);

    let (outcome, notices) = resolve(&mut layout);
    let StepOutcome::Converged(stats) = outcome else {
        panic!("expected convergence, got {outcome:?}");
    };
    assert_eq!(notices, vec![Notice::Converged { iterations: stats.iteration }]);
    let separation = layout.separation();
    let min = min_pair_distance(&layout.to_positions());
    assert!(min >= separation - TOLERANCE, "closest pair {min} < {separation}");

    let before = layout.to_positions();
    let (again, _) = resolve(&mut layout);
    assert!(
        matches!(again, StepOutcome::Converged(s) if s.iteration == 1),
        "{again:?}"
    );
    assert_eq!(layout.to_positions(), before, "nothing moved");
}

#[test]
fn positions_are_written_back_every_iteration() {
    let mut layout = CardLayout::new(footprint(), ResolverConfig::default());
    let start = [Point::new(0.0, 0.0), Point::new(3.0, 0.0), Point::new(50.0, 50.0)];
    layout.set_positions(start);
    let mut items = start.to_vec();
    layout.begin(0.5);
    let outcome = layout.step(0.5, &mut (), &mut items);
    assert!(matches!(outcome, StepOutcome::Continue(_)), "{outcome:?}");
    assert_eq!(items, layout.to_positions(), "sink mirrors the grid");
    assert_eq!(items[2], start[2], "isolated card stays put");

    layout.resolve(0.5, &mut (), &mut items);
    assert_eq!(items, layout.to_positions(), "sink mirrors the grid");
}

#[test]
fn spacing_change_supersedes_without_notice() {
    let mut layout = CardLayout::new(footprint(), ResolverConfig::default());
    layout.set_positions([Point::new(0.0, 0.0), Point::new(1.0, 0.0)]);
    let mut notices = Vec::new();
    assert!(layout.begin(1.0), "idle layout starts");
    let first = layout.step(1.0, &mut |n: Notice| notices.push(n), &mut ());
    assert!(matches!(first, StepOutcome::Continue(_)), "{first:?}");

    let second = layout.step(2.0, &mut |n: Notice| notices.push(n), &mut ());
    assert_eq!(second, StepOutcome::Superseded);
    assert!(notices.is_empty(), "superseded runs are silent");
    assert!(!layout.is_running(), "superseded run is dropped");
    assert!(layout.begin(2.0), "a new run can start");
}

#[test]
fn second_start_while_running_is_ignored() {
    let mut layout = CardLayout::new(footprint(), ResolverConfig::default());
    layout.set_positions([Point::new(0.0, 0.0), Point::new(1.0, 0.0)]);
    assert!(layout.begin(1.0), "first start");
    layout.step(1.0, &mut (), &mut ());
    assert!(!layout.begin(3.0), "second start is a no-op");
    assert_eq!(layout.resolver().iteration(), Some(1), "run state kept");
    // The original run is still keyed to its own spacing.
    let outcome = layout.step(1.0, &mut (), &mut ());
    assert_ne!(outcome, StepOutcome::Superseded);
}

#[test]
fn coincident_points_spread_out() {
    let mut layout = CardLayout::new(footprint(), ResolverConfig::default());
    layout.set_positions(std::iter::repeat_n(Point::new(5.0, 5.0), 4));
    let (outcome, _) = resolve(&mut layout);
    assert!(matches!(outcome, StepOutcome::Converged(_)), "{outcome:?}");
    let min = min_pair_distance(&layout.to_positions());
    assert!(min >= layout.separation() - TOLERANCE, "closest pair {min}");
}

#[test]
fn exhausted_run_leaves_layout_as_is() {
    let config = ResolverConfig {
        max_iterations: 3,
        ..ResolverConfig::default()
    };
    let mut layout = CardLayout::new(footprint(), config);
    layout.set_positions((0..9).map(|i| Point::new(f64::from(i), 0.0)));
    let (outcome, notices) = resolve(&mut layout);
    assert!(matches!(outcome, StepOutcome::Exhausted(_)), "{outcome:?}");
    assert_eq!(
        notices.iter().map(ToString::to_string).collect::<Vec<_>>(),
        vec!["Layout did not converge within 3 iterations".to_string()]
    );
    assert!(!layout.is_running(), "run ended");
}

#[test]
fn set_positions_cancels_active_run() {
    let mut layout = CardLayout::new(footprint(), ResolverConfig::default());
    layout.set_positions([Point::ORIGIN, Point::ORIGIN]);
    layout.begin(1.0);
    layout.set_positions([Point::ORIGIN]);
    assert!(!layout.is_running(), "rebuild drops the run");
    assert_eq!(layout.step(1.0, &mut (), &mut ()), StepOutcome::Idle);
}

#[test]
fn tour_is_a_permutation_of_its_subset() {
    let mut layout = CardLayout::new(footprint(), ResolverConfig::default());
    let pts: Vec<Point> = (0..60)
        .map(|i| {
            let t = f64::from(i);
            Point::new((t * 37.0) % 211.0, (t * 53.0) % 197.0)
        })
        .collect();
    layout.set_positions(pts);
    let subset: Vec<usize> = (0..60).filter(|i| i % 3 != 1).collect();
    let mut order = layout.tour(&subset);
    assert_eq!(order.len(), subset.len(), "length preserved");
    assert_eq!(order[0], subset[0], "starts at the first match");
    order.sort_unstable();
    assert_eq!(order, subset, "same ids");
}

#[test]
fn tour_groups_near_pairs() {
    let mut layout = CardLayout::new(footprint(), ResolverConfig::default());
    layout.set_positions([
        Point::new(0.0, 0.0),
        Point::new(100.0, 0.0),
        Point::new(1.0, 1.0),
        Point::new(101.0, 1.0),
    ]);
    assert_eq!(layout.tour(&[0, 1, 2, 3]), vec![0, 2, 1, 3]);

    layout.set_tour_config(TourConfig { max_ring_radius: 0 });
    assert_eq!(
        layout.tour(&[0, 1, 2, 3]),
        vec![0, 2, 1, 3],
        "linear fallback agrees"
    );
}
