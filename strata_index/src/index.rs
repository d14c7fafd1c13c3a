// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public `Index` API over a pluggable backend.

use core::fmt::Debug;

use crate::backend::Backend;
use crate::backends::FlatVec;
use crate::types::Aabb2D;

/// Handle for an inserted entry. Keys are dense and follow insertion order.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Key(u32);

impl Key {
    #[allow(
        clippy::cast_possible_truncation,
        reason = "Index keys are intentionally 32-bit; scenes never approach that many regions."
    )]
    const fn new(idx: usize) -> Self {
        Self(idx as u32)
    }

    /// Position of the entry in insertion order.
    pub const fn idx(self) -> usize {
        self.0 as usize
    }
}

#[derive(Clone, Debug)]
struct Entry<P> {
    aabb: Aabb2D,
    payload: P,
}

/// An append-only box index parameterized by a spatial backend.
///
/// Scenes are indexed once and then queried many times, so there is no
/// update or removal path.
#[derive(Debug)]
pub struct Index<P: Copy + Debug, B: Backend = FlatVec> {
    entries: Vec<Entry<P>>,
    backend: B,
}

impl<P: Copy + Debug> Index<P, FlatVec> {
    /// Create an empty index using the flat vector backend.
    pub fn new() -> Self {
        Self::with_backend(FlatVec::default())
    }
}

impl<P: Copy + Debug> Default for Index<P, FlatVec> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "backend_grid")]
impl<P: Copy + Debug> Index<P, crate::backends::Grid> {
    /// Create an empty index using a uniform grid with the given cell size.
    pub fn with_grid(cell_size: f64) -> Self {
        Self::with_backend(crate::backends::Grid::new(cell_size))
    }
}

impl<P: Copy + Debug, B: Backend> Index<P, B> {
    /// Create an empty index using an explicit backend instance.
    pub fn with_backend(backend: B) -> Self {
        Self {
            entries: Vec::new(),
            backend,
        }
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the index holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Reserve space for at least `n` more entries.
    pub fn reserve(&mut self, n: usize) {
        self.entries.reserve(n);
    }

    /// Insert a box with payload. Returns its `Key`.
    pub fn insert(&mut self, aabb: Aabb2D, payload: P) -> Key {
        let key = Key::new(self.entries.len());
        self.backend.insert(key.idx(), aabb);
        self.entries.push(Entry { aabb, payload });
        key
    }

    /// Visit entries whose box intersects the rectangle.
    ///
    /// Calls `f(key, aabb, payload)` for each match. The order is backend-dependent.
    pub fn visit_rect<F: FnMut(Key, Aabb2D, P)>(&self, rect: Aabb2D, mut f: F) {
        self.backend.visit_rect(rect, |i| {
            if let Some(e) = self.entries.get(i) {
                f(Key::new(i), e.aabb, e.payload);
            }
        });
    }

    /// Entries whose box intersects the rectangle, sorted by key.
    pub fn query_rect(&self, rect: Aabb2D) -> Vec<(Key, P)> {
        let mut out = Vec::new();
        self.visit_rect(rect, |k, _, p| out.push((k, p)));
        out.sort_unstable_by_key(|(k, _)| *k);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_and_query() {
        let mut idx: Index<u32> = Index::new();
        let k1 = idx.insert(Aabb2D::new(0.0, 0.0, 10.0, 10.0), 1);
        let k2 = idx.insert(Aabb2D::new(5.0, 5.0, 15.0, 15.0), 2);
        assert_eq!(idx.len(), 2);

        let hits = idx.query_rect(Aabb2D::new(6.0, 6.0, 7.0, 7.0));
        assert_eq!(hits, vec![(k1, 1), (k2, 2)]);

        let hits = idx.query_rect(Aabb2D::new(12.0, 12.0, 13.0, 13.0));
        assert_eq!(hits, vec![(k2, 2)]);
    }

    #[cfg(feature = "backend_grid")]
    #[test]
    fn grid_and_flat_agree() {
        let boxes = [
            Aabb2D::new(0.0, 0.0, 10.0, 10.0),
            Aabb2D::new(5.0, 5.0, 50.0, 8.0),
            Aabb2D::new(-30.0, 2.0, -1.0, 4.0),
            Aabb2D::new(0.0, 0.0, 500.0, 500.0),
        ];
        let mut flat: Index<usize> = Index::new();
        let mut grid: Index<usize, crate::backends::Grid> = Index::with_grid(8.0);
        for (i, b) in boxes.iter().enumerate() {
            flat.insert(*b, i);
            grid.insert(*b, i);
        }
        for q in [
            Aabb2D::new(6.0, 6.0, 7.0, 7.0),
            Aabb2D::new(-40.0, 0.0, 0.0, 3.0),
            Aabb2D::new(400.0, 400.0, 401.0, 401.0),
        ] {
            assert_eq!(flat.query_rect(q), grid.query_rect(q), "query {q:?}");
        }
    }
}
