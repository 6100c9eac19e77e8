// Copyright 2025 the Mosaic Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _; // for `floor`
use kurbo::{Point, Size};

/// Integer coordinates of a grid cell.
///
/// Cell `(x, y)` covers the half-open world rectangle
/// `[x * width, (x + 1) * width) × [y * height, (y + 1) * height)`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellCoord {
    /// Column index.
    pub x: i32,
    /// Row index.
    pub y: i32,
}

impl CellCoord {
    /// Creates a cell coordinate.
    #[inline]
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Returns the cell containing `point` for cells of size `cell_size`.
    #[must_use]
    pub fn containing(point: Point, cell_size: Size) -> Self {
        Self {
            x: axis_index(point.x, cell_size.width),
            y: axis_index(point.y, cell_size.height),
        }
    }

    /// Returns the coordinate offset by `(dx, dy)` cells.
    #[inline]
    #[must_use]
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x.wrapping_add(dx),
            y: self.y.wrapping_add(dy),
        }
    }

    /// Chebyshev (chessboard) distance between two cells.
    #[inline]
    #[must_use]
    pub const fn chebyshev(self, other: Self) -> u32 {
        let dx = self.x.abs_diff(other.x);
        let dy = self.y.abs_diff(other.y);
        if dx > dy { dx } else { dy }
    }

    /// Iterates the cells at exactly Chebyshev distance `radius` from `self`.
    ///
    /// Radius `0` yields only `self`; radius `r > 0` yields the `8 * r` cells
    /// on the perimeter of the `(2r + 1)²` square, clockwise from the top-left
    /// corner.
    #[must_use]
    pub fn ring(self, radius: u32) -> Ring {
        let radius = i32::try_from(radius).unwrap_or(i32::MAX / 8).min(i32::MAX / 8);
        Ring {
            center: self,
            radius,
            step: 0,
            len: if radius == 0 { 1 } else { 8 * radius },
        }
    }

    /// Packs the coordinate into a single hash key.
    #[inline]
    #[must_use]
    pub const fn key(self) -> u64 {
        ((self.x as u32 as u64) << 32) | (self.y as u32 as u64)
    }
}

/// Iterator over the perimeter of a square ring of cells.
///
/// Created by [`CellCoord::ring`].
#[derive(Clone, Debug)]
pub struct Ring {
    center: CellCoord,
    radius: i32,
    step: i32,
    len: i32,
}

impl Iterator for Ring {
    type Item = CellCoord;

    fn next(&mut self) -> Option<CellCoord> {
        if self.step >= self.len {
            return None;
        }
        let r = self.radius;
        let k = self.step;
        self.step += 1;
        if r == 0 {
            return Some(self.center);
        }
        let side = 2 * r;
        let (dx, dy) = match k / side {
            0 => (-r + k, -r),
            1 => (r, -r + (k - side)),
            2 => (r - (k - 2 * side), r),
            _ => (-r, r - (k - 3 * side)),
        };
        Some(self.center.offset(dx, dy))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = usize::try_from(self.len - self.step).unwrap_or(0);
        (left, Some(left))
    }
}

impl ExactSizeIterator for Ring {}

#[expect(
    clippy::cast_possible_truncation,
    reason = "saturating float-to-int cast; world extents stay far inside i32 cell indices"
)]
fn axis_index(v: f64, extent: f64) -> i32 {
    (v / extent).floor() as i32
}
