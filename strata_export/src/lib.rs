// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Strata Export: naming, captioning and serializing containment forests.
//!
//! The export boundary is where file names carry meaning:
//!
//! - [`SegmentNames`] gives every visible region a `<scene>_element_<n>.svg`
//!   name, numbering through an explicit [`NameCounter`].
//! - [`SegmentName`] classifies names (`Layer N` before `element_N`, unknown
//!   last) and is the sort key [`order_by_name`] renumbers a forest by.
//! - [`CaptionTable`] and [`SceneMetadata`] read the optional side files.
//! - [`build_document`] assembles the [`HierarchyDocument`] and
//!   [`write_document`] stores it as JSON.
//! - [`segment_svg`] renders a visible region as a standalone SVG.
//!
//! # Example
//!
//! ```rust
//! use strata_export::{
//!     CaptionTable, NameCounter, SceneMetadata, SegmentNames, build_document, order_by_name,
//! };
//! use strata_region::{Geometry, Region};
//! use strata_scene::{ContainmentPolicy, ResolveParams, build_hierarchy, resolve_paint_order};
//!
//! let regions = vec![
//!     Region::new(0, Geometry::rect(0.0, 0.0, 10.0, 10.0), None),
//!     Region::new(1, Geometry::rect(2.0, 2.0, 4.0, 4.0), None),
//! ];
//! let visible = resolve_paint_order(&regions, &ResolveParams::default());
//! let names = SegmentNames::assign("demo", &visible, &mut NameCounter::new());
//! let forest = order_by_name(build_hierarchy(visible, ContainmentPolicy::default()), &names);
//! let doc = build_document(&forest, "demo", &names, &CaptionTable::new(), &SceneMetadata::default());
//!
//! assert_eq!(doc.scene[0].filename, "Full demo");
//! assert_eq!(doc.scene[2].filename, "demo_element_2.svg");
//! assert_eq!(doc.scene[2].parent, 1);
//! ```

mod document;
mod error;
mod names;
mod segment;

pub use document::{
    Caption, CaptionEntry, CaptionTable, HierarchyDocument, SceneMetadata, SceneRecord,
    build_document, order_by_name, side_file, write_document,
};
pub use error::{ExportError, Result};
pub use names::{NameCounter, SegmentName, SegmentNames, sanitize_file_name};
pub use segment::{SegmentContext, segment_svg, write_segments};
