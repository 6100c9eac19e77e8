// Copyright 2025 the Mosaic Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Synthetic inputs shared by the Mosaic benchmarks and the demo.

use kurbo::{Point, Vec2};

/// 64-bit linear congruential generator with Knuth's MMIX constants.
///
/// Deterministic, so a seed always gives the same scene and benchmark runs
/// are comparable.
#[derive(Clone, Debug)]
pub struct Lcg(u64);

impl Lcg {
    const MULTIPLIER: u64 = 6_364_136_223_846_793_005;
    const INCREMENT: u64 = 1_442_695_040_888_963_407;

    /// Creates a generator.
    pub fn new(seed: u64) -> Self {
        Self(seed)
    }

    /// Next value in `[0, 1)`, from the top 53 bits of the state.
    pub fn next_f64(&mut self) -> f64 {
        self.0 = self.0.wrapping_mul(Self::MULTIPLIER).wrapping_add(Self::INCREMENT);
        (self.0 >> 11) as f64 / (1_u64 << 53) as f64
    }
}

/// `n` points scattered uniformly over a `side` x `side` square.
pub fn scatter(n: usize, side: f64, seed: u64) -> Vec<Point> {
    let mut rng = Lcg::new(seed);
    (0..n)
        .map(|_| Point::new(rng.next_f64() * side, rng.next_f64() * side))
        .collect()
}

/// `n` points in tight clusters of about 50, each within `radius` of its
/// center, so most cards start overlapping.
pub fn clusters(n: usize, radius: f64, seed: u64) -> Vec<Point> {
    let mut rng = Lcg::new(seed);
    let centers: Vec<Point> = (0..n.div_ceil(50).max(1))
        .map(|_| Point::new(rng.next_f64() * radius * 20.0, rng.next_f64() * radius * 20.0))
        .collect();
    (0..n)
        .map(|i| {
            let c = centers[i % centers.len()];
            let angle = rng.next_f64() * core::f64::consts::TAU;
            let r = rng.next_f64() * radius;
            c + Vec2::from_angle(angle) * r
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generator_uses_mmix_step() {
        let mut rng = Lcg::new(0);
        let state = 1_442_695_040_888_963_407_u64;
        assert_eq!(rng.next_f64(), (state >> 11) as f64 / (1_u64 << 53) as f64);
        let state = state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);
        assert_eq!(rng.next_f64(), (state >> 11) as f64 / (1_u64 << 53) as f64);
    }

    #[test]
    fn same_seed_same_scene() {
        assert_eq!(scatter(64, 100.0, 5), scatter(64, 100.0, 5));
        assert_ne!(scatter(64, 100.0, 5), scatter(64, 100.0, 6));
        let points = clusters(120, 30.0, 9);
        assert_eq!(points, clusters(120, 30.0, 9));
        // Centers lie in [0, 20r]; members are within r of theirs.
        let bounds = -30.0..=630.0;
        assert!(
            points.iter().all(|p| bounds.contains(&p.x) && bounds.contains(&p.y)),
            "clusters stay near their centers"
        );
    }

    #[test]
    fn values_stay_in_unit_interval() {
        let mut rng = Lcg::new(u64::MAX);
        for _ in 0..10_000 {
            let v = rng.next_f64();
            assert!((0.0..1.0).contains(&v), "{v}");
        }
    }
}
