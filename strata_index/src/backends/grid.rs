// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Uniform grid backend for 2D boxes.
//!
//! Boxes are bucketed into fixed-size cells and queries only touch the cells
//! overlapping the query rectangle. Boxes covering more than
//! [`Grid::MAX_CELLS_PER_BOX`] cells (a full-scene background, say) are kept
//! in a separate list that every query scans, so one huge box does not fan out
//! into thousands of cells.

use hashbrown::{HashMap, HashSet};
use smallvec::SmallVec;

use crate::backend::Backend;
use crate::types::Aabb2D;

/// Map a coordinate to a grid coordinate along one axis, rounding toward -∞.
#[allow(
    clippy::cast_possible_truncation,
    reason = "Grid cell indices are intentionally i32; out-of-range values are saturated."
)]
#[inline]
fn cell_coord(value: f64, cell_size: f64) -> i32 {
    debug_assert!(cell_size > 0.0, "grid cell_size must be strictly positive");
    (value / cell_size).floor() as i32
}

/// Uniform grid backend with fixed cell size, anchored at the scene origin.
pub struct Grid {
    cell_size: f64,
    cells: HashMap<(i32, i32), SmallVec<[usize; 8]>>,
    oversized: Vec<usize>,
    slots: Vec<Option<Aabb2D>>,
}

impl core::fmt::Debug for Grid {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let live_slots = self.slots.iter().filter(|s| s.is_some()).count();
        f.debug_struct("Grid")
            .field("cell_size", &self.cell_size)
            .field("live_slots", &live_slots)
            .field("cells", &self.cells.len())
            .field("oversized", &self.oversized.len())
            .finish_non_exhaustive()
    }
}

impl Grid {
    /// Boxes spanning more cells than this go to the oversized list.
    pub const MAX_CELLS_PER_BOX: i64 = 64;

    /// Create a grid backend with the given cell size.
    pub fn new(cell_size: f64) -> Self {
        debug_assert!(cell_size > 0.0, "cell_size must be strictly positive");
        Self {
            cell_size,
            cells: HashMap::new(),
            oversized: Vec::new(),
            slots: Vec::new(),
        }
    }

    fn cell_range(&self, rect: &Aabb2D) -> ((i32, i32), (i32, i32)) {
        let x0 = cell_coord(rect.min_x, self.cell_size);
        let x1 = cell_coord(rect.max_x, self.cell_size);
        let y0 = cell_coord(rect.min_y, self.cell_size);
        let y1 = cell_coord(rect.max_y, self.cell_size);
        ((x0.min(x1), x0.max(x1)), (y0.min(y1), y0.max(y1)))
    }

    fn cell_count(range: ((i32, i32), (i32, i32))) -> i64 {
        let ((x0, x1), (y0, y1)) = range;
        (i64::from(x1) - i64::from(x0) + 1) * (i64::from(y1) - i64::from(y0) + 1)
    }
}

impl Backend for Grid {
    fn insert(&mut self, slot: usize, aabb: Aabb2D) {
        if self.slots.len() <= slot {
            self.slots.resize(slot + 1, None);
        }
        self.slots[slot] = Some(aabb);

        let range = self.cell_range(&aabb);
        if Self::cell_count(range) > Self::MAX_CELLS_PER_BOX {
            self.oversized.push(slot);
            return;
        }
        let ((x0, x1), (y0, y1)) = range;
        for ix in x0..=x1 {
            for iy in y0..=y1 {
                self.cells.entry((ix, iy)).or_default().push(slot);
            }
        }
    }

    fn visit_rect<F: FnMut(usize)>(&self, rect: Aabb2D, mut f: F) {
        let mut seen: HashSet<usize> = HashSet::new();
        let mut report = |slot: usize, f: &mut F| {
            if !seen.insert(slot) {
                return;
            }
            if let Some(Some(aabb)) = self.slots.get(slot)
                && aabb.overlaps(&rect)
            {
                f(slot);
            }
        };

        for &slot in &self.oversized {
            report(slot, &mut f);
        }

        let range = self.cell_range(&rect);
        if Self::cell_count(range) > Self::MAX_CELLS_PER_BOX * 16 {
            // Query larger than most of the grid: walking the cells costs more
            // than checking every slot.
            for (slot, aabb) in self.slots.iter().enumerate() {
                if aabb.is_some() {
                    report(slot, &mut f);
                }
            }
            return;
        }
        let ((x0, x1), (y0, y1)) = range;
        for ix in x0..=x1 {
            for iy in y0..=y1 {
                if let Some(cell) = self.cells.get(&(ix, iy)) {
                    for &slot in cell {
                        report(slot, &mut f);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rect_query_deduplicates_slots() {
        let mut grid = Grid::new(5.0);

        // This box spans multiple cells.
        grid.insert(1, Aabb2D::new(0.0, 0.0, 20.0, 20.0));

        let mut hits = Vec::new();
        grid.visit_rect(Aabb2D::new(2.0, 2.0, 18.0, 18.0), |s| hits.push(s));
        assert_eq!(hits, vec![1], "slot 1 should be reported exactly once");
    }

    #[test]
    fn negative_coordinates_round_down() {
        let mut grid = Grid::new(10.0);
        grid.insert(0, Aabb2D::new(-25.0, -25.0, -5.0, -5.0));
        let mut hits = Vec::new();
        grid.visit_rect(Aabb2D::new(-10.0, -10.0, -9.0, -9.0), |s| hits.push(s));
        assert_eq!(hits, vec![0]);
        assert_eq!(cell_coord(-0.5, 1.0), -1);
    }

    #[test]
    fn oversized_boxes_are_always_checked() {
        let mut grid = Grid::new(1.0);
        grid.insert(0, Aabb2D::new(0.0, 0.0, 1000.0, 1000.0));
        grid.insert(1, Aabb2D::new(500.0, 500.0, 500.5, 500.5));

        let mut hits = Vec::new();
        grid.visit_rect(Aabb2D::new(500.2, 500.2, 500.3, 500.3), |s| hits.push(s));
        hits.sort_unstable();
        assert_eq!(hits, vec![0, 1]);

        hits.clear();
        grid.visit_rect(Aabb2D::new(2000.0, 0.0, 2001.0, 1.0), |s| hits.push(s));
        assert!(hits.is_empty(), "oversized boxes still need to overlap");
    }
}
