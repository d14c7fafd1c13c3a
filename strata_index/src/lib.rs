// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Strata Index: a small 2D box index for broad-phase culling.
//!
//! The containment hierarchy compares every region against every other
//! region. Most of those pairs are nowhere near each other, so the hierarchy
//! builder first indexes each region's bounding box here and only runs exact
//! polygon tests on candidates whose boxes overlap.
//!
//! - Insert axis-aligned boxes with a `Copy` payload.
//! - Query by intersecting rectangle; results come back in insertion order.
//!
//! Backends are pluggable via the [`Backend`] trait. The default backend is a
//! flat vector (linear scan). The uniform grid (feature `backend_grid`) suits
//! larger scenes where regions are spread over the canvas.
//!
//! ## Features
//!
//! - `backend_grid` *(default)*: enables the grid backend backed by
//!   `hashbrown` and `smallvec`.
//!
//! # Example
//!
//! ```rust
//! use strata_index::{Aabb2D, Index};
//!
//! let mut idx: Index<u32> = Index::new();
//! idx.insert(Aabb2D::new(0.0, 0.0, 100.0, 100.0), 1);
//! idx.insert(Aabb2D::new(40.0, 40.0, 60.0, 60.0), 2);
//!
//! let near = idx.query_rect(Aabb2D::new(45.0, 45.0, 55.0, 55.0));
//! assert_eq!(near.iter().map(|&(_, p)| p).collect::<Vec<_>>(), vec![1, 2]);
//!
//! let corner = idx.query_rect(Aabb2D::new(0.0, 0.0, 5.0, 5.0));
//! assert_eq!(corner.len(), 1);
//! ```
//!
//! Coordinates are assumed finite; callers filter NaN geometry upstream.

mod backend;
pub mod backends;
mod index;
mod types;

pub use backend::Backend;
pub use index::{Index, Key};
pub use types::Aabb2D;
