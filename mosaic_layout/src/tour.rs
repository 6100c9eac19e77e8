// Copyright 2025 the Mosaic Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Greedy nearest-neighbor ordering of a point subset.

use alloc::vec::Vec;

use hashbrown::HashMap;
use kurbo::Point;
use mosaic_grid::{CellCoord, SpatialGrid};
use smallvec::SmallVec;

use crate::config::TourConfig;

/// Orders `subset` (point ids of `grid`) into a greedy nearest-first path.
///
/// The tour starts at `subset[0]` and repeatedly moves to the closest point
/// not yet visited, searching the grid's cells in growing square rings around
/// the current point. When the ring search reaches
/// [`TourConfig::max_ring_radius`] without a confirmed nearest point, the
/// remaining points are scanned linearly instead.
///
/// The grid itself is only read: the search runs over a private bucket map
/// restricted to the subset. The result is always a permutation of `subset`,
/// duplicates included. Ids with no point in the grid cannot be placed and
/// are appended at the end in input order.
#[must_use]
pub fn proximity_tour(grid: &SpatialGrid, subset: &[usize], config: &TourConfig) -> Vec<usize> {
    let cell_size = grid.cell_size();
    let reach = cell_size.width.min(cell_size.height);

    // Work over positions in `subset` so duplicate ids stay distinct.
    let mut positions: Vec<Option<Point>> = Vec::with_capacity(subset.len());
    let mut buckets: HashMap<u64, SmallVec<[usize; 4]>> = HashMap::new();
    let mut unplaced = Vec::new();
    for (slot, &id) in subset.iter().enumerate() {
        match grid.point(id) {
            Some(p) => {
                let pos = p.position();
                positions.push(Some(pos));
                buckets
                    .entry(CellCoord::containing(pos, cell_size).key())
                    .or_default()
                    .push(slot);
            }
            None => {
                positions.push(None);
                unplaced.push(id);
            }
        }
    }

    let mut order = Vec::with_capacity(subset.len());
    let mut remaining = subset.len() - unplaced.len();
    let mut current = positions.iter().position(Option::is_some);
    let mut fallbacks = 0_usize;
    while let Some(slot) = current {
        let Some(here) = positions[slot] else {
            break;
        };
        take(&mut buckets, CellCoord::containing(here, cell_size), slot);
        order.push(subset[slot]);
        remaining -= 1;
        if remaining == 0 {
            break;
        }

        let center = CellCoord::containing(here, cell_size);
        let mut best: Option<(usize, f64)> = None;
        let mut confirmed = false;
        for radius in 0..=config.max_ring_radius {
            for cell in center.ring(radius) {
                let Some(members) = buckets.get(&cell.key()) else {
                    continue;
                };
                for &other in members {
                    if let Some(p) = positions[other] {
                        consider(&mut best, other, here.distance_squared(p));
                    }
                }
            }
            if let Some((_, d2)) = best {
                // Anything outside this ring is at least `radius` whole cells away.
                let bound = f64::from(radius) * reach;
                if d2 <= bound * bound {
                    confirmed = true;
                    break;
                }
            }
        }
        if !confirmed {
            fallbacks += 1;
            best = None;
            for members in buckets.values() {
                for &other in members {
                    if let Some(p) = positions[other] {
                        consider(&mut best, other, here.distance_squared(p));
                    }
                }
            }
        }
        current = best.map(|(slot, _)| slot);
    }

    if fallbacks > 0 {
        tracing::trace!(fallbacks, "proximity tour used linear scans");
    }
    order.extend(unplaced);
    order
}

/// Keeps the closer of `best` and `(slot, d2)`, preferring the lower slot on ties.
fn consider(best: &mut Option<(usize, f64)>, slot: usize, d2: f64) {
    let better = match *best {
        None => true,
        Some((b, bd2)) => d2 < bd2 || (d2 == bd2 && slot < b),
    };
    if better {
        *best = Some((slot, d2));
    }
}

fn take(buckets: &mut HashMap<u64, SmallVec<[usize; 4]>>, cell: CellCoord, slot: usize) {
    let key = cell.key();
    if let Some(members) = buckets.get_mut(&key) {
        if let Some(pos) = members.iter().position(|&m| m == slot) {
            members.swap_remove(pos);
        }
        if members.is_empty() {
            buckets.remove(&key);
        }
    }
}
