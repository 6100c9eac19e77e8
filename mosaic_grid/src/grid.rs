// Copyright 2025 the Mosaic Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The spatial grid: points, lazily created cells, and dirty-point sync.

use alloc::vec::Vec;
use core::fmt;

use hashbrown::HashMap;
use kurbo::{Point, Rect, Size, Vec2};
use smallvec::SmallVec;

use crate::coord::CellCoord;

/// Handle to a cell in a [`SpatialGrid`].
///
/// Handles are stable for the lifetime of the grid: cells are never destroyed
/// until the next [`SpatialGrid::build`] or [`SpatialGrid::clear`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellId(u32);

impl CellId {
    /// Returns the arena index of this cell.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// One occupied (or previously occupied) cell.
#[derive(Clone)]
pub struct Cell {
    coord: CellCoord,
    members: SmallVec<[usize; 4]>,
    /// Self first, then every adjacent cell that existed when either side was created.
    neighbors: SmallVec<[CellId; 9]>,
}

impl Cell {
    /// Integer coordinates of the cell.
    #[must_use]
    pub fn coord(&self) -> CellCoord {
        self.coord
    }

    /// Point ids currently bucketed in this cell, in no particular order.
    #[must_use]
    pub fn members(&self) -> &[usize] {
        &self.members
    }

    /// The cell itself followed by its live adjacent cells.
    #[must_use]
    pub fn neighbors(&self) -> &[CellId] {
        &self.neighbors
    }

    /// Returns `true` if no point is bucketed here right now.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

impl fmt::Debug for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cell")
            .field("coord", &self.coord)
            .field("members", &self.members.len())
            .field("neighbors", &self.neighbors.len())
            .finish()
    }
}

/// A point tracked by the grid.
#[derive(Clone, Debug, PartialEq)]
pub struct GridPoint {
    position: Point,
    index: usize,
    cell: CellCoord,
    dirty: bool,
}

impl GridPoint {
    /// Current position.
    #[must_use]
    pub fn position(&self) -> Point {
        self.position
    }

    /// Index of the external item this point stands for.
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Cell the point is currently bucketed under.
    ///
    /// This can lag behind [`GridPoint::position`] while the point is dirty.
    #[must_use]
    pub fn cell(&self) -> CellCoord {
        self.cell
    }

    /// Returns `true` if the point moved since the last [`SpatialGrid::sync`].
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }
}

/// Uniform-cell spatial grid over a mutable point set.
///
/// See the [crate documentation](crate) for an overview.
#[derive(Clone)]
pub struct SpatialGrid {
    cell_size: Size,
    points: Vec<GridPoint>,
    cells: Vec<Cell>,
    lookup: HashMap<u64, CellId>,
    /// Ids of dirty points, each listed once.
    dirty: Vec<usize>,
}

impl fmt::Debug for SpatialGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpatialGrid")
            .field("cell_size", &self.cell_size)
            .field("points", &self.points.len())
            .field("cells", &self.cells.len())
            .field("dirty", &self.dirty.len())
            .finish_non_exhaustive()
    }
}

impl SpatialGrid {
    /// Creates an empty grid whose cells have the given size.
    ///
    /// Non-positive extents are raised to the smallest positive `f64`.
    #[must_use]
    pub fn new(cell_size: Size) -> Self {
        Self {
            cell_size: Size::new(
                cell_size.width.max(f64::MIN_POSITIVE),
                cell_size.height.max(f64::MIN_POSITIVE),
            ),
            points: Vec::new(),
            cells: Vec::new(),
            lookup: HashMap::new(),
            dirty: Vec::new(),
        }
    }

    /// Size of one cell in world units.
    #[must_use]
    pub fn cell_size(&self) -> Size {
        self.cell_size
    }

    /// Discards all points and cells, then buckets `points`.
    ///
    /// Point ids are positions in the input sequence.
    pub fn build<I>(&mut self, points: I)
    where
        I: IntoIterator<Item = Point>,
    {
        self.clear();
        let points = points.into_iter();
        self.points.reserve(points.size_hint().0);
        for p in points {
            self.insert(p);
        }
    }

    /// Removes every point and cell.
    pub fn clear(&mut self) {
        self.points.clear();
        self.cells.clear();
        self.lookup.clear();
        self.dirty.clear();
    }

    /// Adds a point and buckets it immediately. Returns its id.
    pub fn insert(&mut self, position: Point) -> usize {
        let id = self.points.len();
        let cell = CellCoord::containing(position, self.cell_size);
        let cell_id = self.ensure_cell(cell);
        self.cells[cell_id.index()].members.push(id);
        self.points.push(GridPoint {
            position,
            index: id,
            cell,
            dirty: false,
        });
        id
    }

    /// Number of points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Returns `true` if the grid holds no points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Returns the point with the given id.
    #[must_use]
    pub fn point(&self, id: usize) -> Option<&GridPoint> {
        self.points.get(id)
    }

    /// All points, indexed by id.
    #[must_use]
    pub fn points(&self) -> &[GridPoint] {
        &self.points
    }

    /// Current position of every point, in id order.
    pub fn positions(&self) -> impl ExactSizeIterator<Item = Point> + '_ {
        self.points.iter().map(|p| p.position)
    }

    /// Moves a point to `position` and marks it dirty.
    ///
    /// Returns `false` if `id` is out of range.
    pub fn move_to(&mut self, id: usize, position: Point) -> bool {
        let Some(p) = self.points.get_mut(id) else {
            return false;
        };
        p.position = position;
        if !p.dirty {
            p.dirty = true;
            self.dirty.push(id);
        }
        true
    }

    /// Moves a point by `delta` and marks it dirty.
    ///
    /// Returns `false` if `id` is out of range.
    pub fn translate(&mut self, id: usize, delta: Vec2) -> bool {
        match self.points.get(id) {
            Some(p) => {
                let target = p.position + delta;
                self.move_to(id, target)
            }
            None => false,
        }
    }

    /// Number of points moved since the last [`SpatialGrid::sync`].
    #[must_use]
    pub fn dirty_count(&self) -> usize {
        self.dirty.len()
    }

    /// Re-buckets every dirty point and clears the dirty flags.
    ///
    /// Returns how many points changed cell.
    pub fn sync(&mut self) -> usize {
        let mut dirty = core::mem::take(&mut self.dirty);
        let mut moved = 0;
        for &id in &dirty {
            let point = &mut self.points[id];
            point.dirty = false;
            let old = point.cell;
            let new = CellCoord::containing(point.position, self.cell_size);
            if old == new {
                continue;
            }
            point.cell = new;
            if let Some(&old_id) = self.lookup.get(&old.key()) {
                let members = &mut self.cells[old_id.index()].members;
                if let Some(pos) = members.iter().position(|&m| m == id) {
                    members.swap_remove(pos);
                }
            }
            let new_id = self.ensure_cell(new);
            self.cells[new_id.index()].members.push(id);
            moved += 1;
        }
        dirty.clear();
        // Keep the allocation for the next round of updates.
        self.dirty = dirty;
        moved
    }

    /// Returns the cell at `coord`, if it was ever occupied.
    #[must_use]
    pub fn cell_at(&self, coord: CellCoord) -> Option<CellId> {
        self.lookup.get(&coord.key()).copied()
    }

    /// Returns the cell behind a handle.
    #[must_use]
    pub fn cell(&self, id: CellId) -> Option<&Cell> {
        self.cells.get(id.index())
    }

    /// Integer coordinates of a cell.
    #[must_use]
    pub fn cell_coord(&self, id: CellId) -> Option<CellCoord> {
        self.cells.get(id.index()).map(Cell::coord)
    }

    /// Point ids bucketed in a cell. Empty for unknown handles.
    #[must_use]
    pub fn members(&self, id: CellId) -> &[usize] {
        self.cells.get(id.index()).map_or(&[], |c| c.members())
    }

    /// The cell at `coord` followed by its adjacent live cells.
    ///
    /// Returns an empty slice for coordinates that were never occupied.
    #[must_use]
    pub fn neighbors(&self, coord: CellCoord) -> &[CellId] {
        self.cell_at(coord)
            .and_then(|id| self.cells.get(id.index()))
            .map_or(&[], |c| c.neighbors())
    }

    /// Number of cells created so far.
    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Iterates every cell with its handle.
    pub fn cells(&self) -> impl ExactSizeIterator<Item = (CellId, &Cell)> + '_ {
        self.cells.iter().enumerate().map(|(i, c)| (cell_id(i), c))
    }

    /// Collects into `out` every point id bucketed in the neighborhood of
    /// point `id` (its own cell and the adjacent cells), including `id`.
    ///
    /// `out` is cleared first so it can be reused as scratch across calls.
    pub fn candidates(&self, id: usize, out: &mut Vec<usize>) {
        out.clear();
        let Some(point) = self.points.get(id) else {
            return;
        };
        for &n in self.neighbors(point.cell) {
            out.extend_from_slice(&self.cells[n.index()].members);
        }
    }

    /// Bounding rectangle of every point position, or `None` when empty.
    #[must_use]
    pub fn bounds(&self) -> Option<Rect> {
        let mut iter = self.points.iter().map(|p| p.position);
        let first = iter.next()?;
        Some(iter.fold(Rect::from_points(first, first), |r, p| {
            r.union_pt(p)
        }))
    }

    /// Snapshot of the current grid state for debugging and inspection.
    #[must_use]
    pub fn debug_info(&self) -> GridDebugInfo {
        GridDebugInfo {
            cell_size: self.cell_size,
            points: self.points.len(),
            cells: self.cells.len(),
            empty_cells: self.cells.iter().filter(|c| c.is_empty()).count(),
            max_occupancy: self
                .cells
                .iter()
                .map(|c| c.members.len())
                .max()
                .unwrap_or(0),
            dirty: self.dirty.len(),
        }
    }

    fn ensure_cell(&mut self, coord: CellCoord) -> CellId {
        if let Some(&id) = self.lookup.get(&coord.key()) {
            return id;
        }
        let id = cell_id(self.cells.len());
        let mut neighbors = SmallVec::new();
        neighbors.push(id);
        for dy in -1..=1 {
            for dx in -1..=1 {
                if dx == 0 && dy == 0 {
                    continue;
                }
                if let Some(&n) = self.lookup.get(&coord.offset(dx, dy).key()) {
                    neighbors.push(n);
                    self.cells[n.index()].neighbors.push(id);
                }
            }
        }
        self.cells.push(Cell {
            coord,
            members: SmallVec::new(),
            neighbors,
        });
        self.lookup.insert(coord.key(), id);
        id
    }
}

fn cell_id(index: usize) -> CellId {
    CellId(u32::try_from(index).expect("too many grid cells for CellId (u32)"))
}

/// Debug snapshot of a [`SpatialGrid`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridDebugInfo {
    /// Size of one cell.
    pub cell_size: Size,
    /// Number of points.
    pub points: usize,
    /// Number of cells ever created.
    pub cells: usize,
    /// Cells that currently hold no point.
    pub empty_cells: usize,
    /// Largest number of points in a single cell.
    pub max_occupancy: usize,
    /// Points waiting for the next sync.
    pub dirty: usize,
}
