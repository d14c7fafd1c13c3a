// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Strata Scene: what is visible in a layered vector scene, and what sits
//! inside what.
//!
//! Two passes over the [`Region`](strata_region::Region)s of one scene:
//!
//! - [`resolve_paint_order`] takes regions back to front and subtracts from
//!   each everything painted above it. Fully hidden and sliver residuals are
//!   dropped; [`resolve_with_report`] says which and why.
//! - [`build_hierarchy`] hangs every surviving region off the smallest other
//!   region that encloses it, under a [`ContainmentPolicy`], and returns a
//!   [`Forest`] rooted at a synthetic whole-scene node with id `0`.
//!
//! Both passes are pure: they take their input by reference or by value and
//! return fresh collections.
//!
//! # Example
//!
//! ```rust
//! use strata_region::{Geometry, Region};
//! use strata_scene::{ContainmentPolicy, ResolveParams, build_hierarchy, resolve_paint_order};
//!
//! let regions = [
//!     Region::new(0, Geometry::rect(0.0, 0.0, 100.0, 100.0), None),
//!     Region::new(1, Geometry::rect(40.0, 40.0, 60.0, 60.0), None),
//! ];
//! let visible = resolve_paint_order(&regions, &ResolveParams::default());
//! let forest = build_hierarchy(visible, ContainmentPolicy::StrictPolygon);
//!
//! let parents: Vec<i64> = forest.nodes().iter().map(|n| n.parent_id()).collect();
//! assert_eq!(parents, vec![-1, 0, 1]);
//! ```

mod forest;
mod hierarchy;
mod visibility;

pub use forest::{Forest, HierarchyNode, NodeId};
pub use hierarchy::{ContainmentPolicy, build_hierarchy};
pub use visibility::{
    DropReason, Dropped, ResolveParams, ResolveReport, VisibleRegion, resolve_paint_order,
    resolve_with_report,
};
