// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Strata Region: authored vector primitives to polygonal regions.
//!
//! Each [`Primitive`] (path, rect, circle, ellipse, line, polyline, polygon,
//! text or `use` anchor) is turned into a [`Region`]: a valid, possibly
//! multi-part [`Geometry`] plus the fill color resolved through a
//! [`StyleContext`]. Primitives that would not be seen (no fill, low opacity,
//! decorative classes, `display:none`) or whose geometry is broken are
//! reported as a typed [`Skip`] instead.
//!
//! Curves come from `kurbo` path parsing and are flattened by sampling;
//! boolean operations on the flattened polygons use `geo`.
//!
//! # Example
//!
//! ```rust
//! use strata_region::{ExtractParams, Primitive, StyleContext, extract_scene};
//!
//! let prims = [
//!     Primitive::rect(0.0, 0.0, 100.0, 100.0).with_attr("fill", "navy"),
//!     Primitive::circle(50.0, 50.0, 10.0).with_attr("style", "fill:none"),
//! ];
//! let scene = extract_scene(&prims, &StyleContext::new(), &ExtractParams::default());
//! assert_eq!(scene.regions.len(), 1);
//! assert_eq!(scene.skipped.len(), 1);
//! ```

mod color;
mod extract;
mod geometry;
mod primitive;
mod sample;
mod style;

pub use color::{NAMED_COLORS, Rgba};
pub use extract::{ExtractParams, ExtractedScene, Region, Skip, Skipped, extract, extract_scene};
pub use geometry::Geometry;
pub use primitive::{Primitive, PrimitiveKind};
pub use style::{Fill, StyleContext, declaration, gradient_ref, resolve_fill};

pub use kurbo::Point;
