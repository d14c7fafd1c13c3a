// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Backend trait for spatial indexing implementations.

use crate::types::Aabb2D;

/// Spatial backend abstraction used by [`Index`][crate::Index].
///
/// Backends only track slots and their boxes; payloads live in the index.
pub trait Backend {
    /// Insert a new slot into the spatial structure.
    fn insert(&mut self, slot: usize, aabb: Aabb2D);

    /// Visit slots whose box intersects the rectangle.
    ///
    /// Each slot is reported at most once; order is backend-dependent.
    fn visit_rect<F: FnMut(usize)>(&self, rect: Aabb2D, f: F);
}
