// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Standalone SVG files for visible segments.

use core::fmt::Write as _;
use std::path::{Path, PathBuf};

use strata_region::Primitive;
use strata_scene::VisibleRegion;

use crate::error::{ExportError, Result};
use crate::names::SegmentNames;

/// Shape attributes that the visible outline replaces.
const GEOMETRY_ATTRIBUTES: &[&str] = &[
    "x", "y", "width", "height", "cx", "cy", "r", "rx", "ry", "x1", "y1", "x2", "y2", "points",
    "d", "id", "fill-rule", "transform",
];

/// What every segment file of one document shares.
#[derive(Clone, Copy, Debug)]
pub struct SegmentContext<'a> {
    /// Attributes of the source `<svg>` root.
    pub root_attributes: &'a [(String, String)],
    /// Source stylesheet, copied into every segment.
    pub stylesheet: &'a str,
}

/// Render one visible region as a standalone SVG document.
///
/// The region's primitive keeps its presentation attributes and becomes a
/// `<path>` tracing the visible area, with `id` set to `element_id`.
pub fn segment_svg(
    ctx: SegmentContext<'_>,
    primitive: &Primitive,
    region: &VisibleRegion,
    element_id: &str,
) -> String {
    let mut out = String::from("<svg");
    let mut has_xmlns = false;
    for (name, value) in ctx.root_attributes {
        has_xmlns |= name == "xmlns";
        push_attr(&mut out, name, value);
    }
    if !has_xmlns {
        push_attr(&mut out, "xmlns", "http://www.w3.org/2000/svg");
    }
    out.push_str(">\n");

    if !ctx.stylesheet.trim().is_empty() {
        out.push_str("  <style>");
        escape_into(&mut out, ctx.stylesheet.trim(), false);
        out.push_str("</style>\n");
    }

    out.push_str("  <path");
    push_attr(&mut out, "id", element_id);
    for (name, value) in primitive.attributes() {
        if !GEOMETRY_ATTRIBUTES.contains(&name) {
            push_attr(&mut out, name, value);
        }
    }
    push_attr(&mut out, "fill-rule", "evenodd");
    push_attr(&mut out, "d", &region.geometry.to_path_data());
    out.push_str("/>\n</svg>\n");
    out
}

/// Write one file per region into `dir`, named by `names`.
///
/// `primitives` is indexed by each region's source index. Returns the paths
/// written.
pub fn write_segments(
    dir: &Path,
    ctx: SegmentContext<'_>,
    primitives: &[Primitive],
    regions: &[VisibleRegion],
    names: &SegmentNames,
) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir).map_err(|e| ExportError::io(dir, e))?;
    let mut written = Vec::with_capacity(regions.len());
    for region in regions {
        let (Some(primitive), Some(name)) = (
            primitives.get(region.source_index),
            names.get(region.source_index),
        ) else {
            tracing::warn!(source_index = region.source_index, "segment has no primitive or name");
            continue;
        };
        let element_id = name.strip_suffix(".svg").unwrap_or(name);
        let element_id = element_id
            .rfind("element_")
            .map_or(element_id, |at| &element_id[at..]);
        let path = dir.join(name);
        std::fs::write(&path, segment_svg(ctx, primitive, region, element_id))
            .map_err(|e| ExportError::io(&path, e))?;
        written.push(path);
    }
    tracing::debug!(dir = %dir.display(), count = written.len(), "wrote segments");
    Ok(written)
}

fn push_attr(out: &mut String, name: &str, value: &str) {
    let _ = write!(out, " {name}=\"");
    escape_into(out, value, true);
    out.push('"');
}

fn escape_into(out: &mut String, text: &str, in_attribute: bool) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if in_attribute => out.push_str("&quot;"),
            c => out.push(c),
        }
    }
}
