// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Primitive → region extraction.

use kurbo::{BezPath, Point, Rect};
use thiserror::Error;

use crate::color::Rgba;
use crate::geometry::Geometry;
use crate::primitive::{Primitive, PrimitiveKind};
use crate::sample::{ellipse_ring, path_rings, stroke_footprint};
use crate::style::{Fill, StyleContext, declaration, resolve_fill};

/// Tunables for [`extract`].
#[derive(Clone, Debug, PartialEq)]
pub struct ExtractParams {
    /// Parameter samples per curve segment of a path.
    pub samples_per_segment: usize,
    /// Vertex count of disk approximations.
    pub disk_segments: usize,
    /// Half width of the footprint of lines and polylines.
    pub stroke_half_width: f64,
    /// Radius of the disk standing in for text and `use` anchors.
    pub anchor_radius: f64,
    /// Primitives with a declared opacity below this are skipped.
    pub min_opacity: f64,
    /// Case-insensitive substrings of `class` that mark decorative layers.
    pub decorative_classes: Vec<String>,
}

impl Default for ExtractParams {
    fn default() -> Self {
        Self {
            samples_per_segment: 100,
            disk_segments: 64,
            stroke_half_width: 1.0,
            anchor_radius: 3.0,
            min_opacity: 0.5,
            decorative_classes: vec!["background".into(), "shadow".into()],
        }
    }
}

/// Why a primitive produced no region.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum Skip {
    /// Fill is `none` or fully transparent.
    #[error("fill is none or transparent")]
    NoFill,
    /// Fill references a paint server with no resolvable stop.
    #[error("fill references unresolved gradient `{0}`")]
    UnresolvedGradient(String),
    /// Declared opacity below the threshold.
    #[error("opacity {0} is below the visibility threshold")]
    Translucent(f64),
    /// A class marks the primitive as background or shadow.
    #[error("class `{0}` marks a decorative layer")]
    Decorative(String),
    /// `display:none` or `visibility:hidden`.
    #[error("element is not displayed")]
    Hidden,
    /// A numeric attribute failed to parse.
    #[error("attribute `{name}` is not a number: `{value}`")]
    Malformed {
        /// Attribute name.
        name: String,
        /// Raw attribute value.
        value: String,
    },
    /// Path data failed to parse.
    #[error("bad path data: {0}")]
    BadPath(String),
    /// The shape encloses no area.
    #[error("geometry is empty or degenerate")]
    Empty,
}

/// A primitive's footprint together with its resolved fill.
#[derive(Clone, Debug, PartialEq)]
pub struct Region {
    /// Position of the primitive in paint order.
    pub source_index: usize,
    /// Covered area.
    pub geometry: Geometry,
    /// Resolved fill, `None` when no known color applies.
    pub fill: Option<Rgba>,
}

impl Region {
    /// A region from parts, mostly useful for tests and synthetic scenes.
    pub fn new(source_index: usize, geometry: Geometry, fill: Option<Rgba>) -> Self {
        Self {
            source_index,
            geometry,
            fill,
        }
    }

    /// Finite coordinates and positive area.
    pub fn is_valid(&self) -> bool {
        self.geometry.is_valid()
    }
}

/// Extract the region of one primitive.
///
/// Visibility filters run first, so a hidden primitive with broken geometry
/// reports why it is hidden.
pub fn extract(
    primitive: &Primitive,
    source_index: usize,
    ctx: &StyleContext,
    params: &ExtractParams,
) -> Result<Region, Skip> {
    check_displayed(primitive)?;
    check_decorative(primitive, params)?;
    check_opacity(primitive, params)?;
    let fill = match resolve_fill(primitive, ctx) {
        Fill::None => return Err(Skip::NoFill),
        Fill::MissingGradient(id) => return Err(Skip::UnresolvedGradient(id)),
        f => f.color(),
    };
    let geometry = build_geometry(primitive, params)?;
    if !geometry.is_valid() {
        return Err(Skip::Empty);
    }
    Ok(Region {
        source_index,
        geometry,
        fill,
    })
}

/// A primitive that produced no region.
#[derive(Clone, Debug, PartialEq)]
pub struct Skipped {
    /// Position of the primitive in paint order.
    pub source_index: usize,
    /// The reason.
    pub reason: Skip,
}

/// Output of [`extract_scene`].
#[derive(Clone, Debug, Default)]
pub struct ExtractedScene {
    /// Surviving regions in paint order.
    pub regions: Vec<Region>,
    /// Primitives that were dropped, in paint order.
    pub skipped: Vec<Skipped>,
}

/// Extract every primitive of a scene, preserving paint order.
pub fn extract_scene(
    primitives: &[Primitive],
    ctx: &StyleContext,
    params: &ExtractParams,
) -> ExtractedScene {
    let mut scene = ExtractedScene::default();
    for (source_index, primitive) in primitives.iter().enumerate() {
        match extract(primitive, source_index, ctx, params) {
            Ok(region) => scene.regions.push(region),
            Err(reason) => {
                tracing::debug!(
                    source_index,
                    kind = primitive.kind().tag(),
                    id = primitive.id(),
                    %reason,
                    "skipping primitive"
                );
                scene.skipped.push(Skipped {
                    source_index,
                    reason,
                });
            }
        }
    }
    tracing::debug!(
        regions = scene.regions.len(),
        skipped = scene.skipped.len(),
        "extracted scene"
    );
    scene
}

fn style_or_attr<'a>(
    primitive: &'a Primitive,
    name: &str,
) -> impl Iterator<Item = &'a str> + use<'a> {
    let style = primitive.attr("style").and_then(|s| declaration(s, name));
    primitive.attr(name).into_iter().chain(style)
}

fn check_displayed(primitive: &Primitive) -> Result<(), Skip> {
    let hidden = style_or_attr(primitive, "display").any(|v| v.eq_ignore_ascii_case("none"))
        || style_or_attr(primitive, "visibility")
            .any(|v| v.eq_ignore_ascii_case("hidden") || v.eq_ignore_ascii_case("collapse"));
    if hidden { Err(Skip::Hidden) } else { Ok(()) }
}

fn check_decorative(primitive: &Primitive, params: &ExtractParams) -> Result<(), Skip> {
    let Some(class) = primitive.attr("class") else {
        return Ok(());
    };
    let lower = class.to_ascii_lowercase();
    if params
        .decorative_classes
        .iter()
        .any(|pat| lower.contains(&pat.to_ascii_lowercase()))
    {
        return Err(Skip::Decorative(class.to_owned()));
    }
    Ok(())
}

fn check_opacity(primitive: &Primitive, params: &ExtractParams) -> Result<(), Skip> {
    let lowest = ["opacity", "fill-opacity"]
        .into_iter()
        .flat_map(|name| style_or_attr(primitive, name))
        .filter_map(parse_opacity)
        .reduce(f64::min);
    match lowest {
        Some(o) if o < params.min_opacity => Err(Skip::Translucent(o)),
        _ => Ok(()),
    }
}

fn parse_opacity(value: &str) -> Option<f64> {
    let value = value.trim();
    match value.strip_suffix('%') {
        Some(pct) => pct.trim().parse::<f64>().ok().map(|v| v / 100.0),
        None => value.parse().ok(),
    }
}

/// Numeric attribute; missing means `0`, an optional `px` suffix is allowed.
fn number(primitive: &Primitive, name: &str) -> Result<f64, Skip> {
    let Some(raw) = primitive.attr(name) else {
        return Ok(0.0);
    };
    let trimmed = raw.trim();
    let trimmed = trimmed.strip_suffix("px").unwrap_or(trimmed);
    match trimmed.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(Skip::Malformed {
            name: name.to_owned(),
            value: raw.to_owned(),
        }),
    }
}

fn points(primitive: &Primitive) -> Result<Vec<Point>, Skip> {
    let raw = primitive.attr("points").unwrap_or_default();
    let malformed = || Skip::Malformed {
        name: "points".into(),
        value: raw.to_owned(),
    };
    let values = raw
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|t| !t.is_empty())
        .map(|t| t.parse::<f64>().map_err(|_| malformed()))
        .collect::<Result<Vec<_>, _>>()?;
    if values.len() % 2 != 0 {
        return Err(malformed());
    }
    Ok(values.chunks_exact(2).map(|c| Point::new(c[0], c[1])).collect())
}

fn build_geometry(primitive: &Primitive, params: &ExtractParams) -> Result<Geometry, Skip> {
    let num = |name| number(primitive, name);
    let geometry = match primitive.kind() {
        PrimitiveKind::Path => {
            let d = primitive.attr("d").unwrap_or_default();
            let path = BezPath::from_svg(d).map_err(|e| Skip::BadPath(e.to_string()))?;
            Geometry::from_rings_even_odd(&path_rings(&path, params.samples_per_segment))
        }
        PrimitiveKind::Rect => {
            let (x, y) = (num("x")?, num("y")?);
            let (w, h) = (num("width")?, num("height")?);
            if w <= 0.0 || h <= 0.0 {
                return Err(Skip::Empty);
            }
            let r = Rect::new(x, y, x + w, y + h);
            Geometry::rect(r.x0, r.y0, r.x1, r.y1)
        }
        PrimitiveKind::Circle => {
            let r = num("r")?;
            disk(Point::new(num("cx")?, num("cy")?), r, r, params)?
        }
        PrimitiveKind::Ellipse => {
            let center = Point::new(num("cx")?, num("cy")?);
            disk(center, num("rx")?, num("ry")?, params)?
        }
        PrimitiveKind::Line => {
            let a = Point::new(num("x1")?, num("y1")?);
            let b = Point::new(num("x2")?, num("y2")?);
            stroke_footprint(&[a, b], params.stroke_half_width, params.disk_segments)
        }
        PrimitiveKind::Polyline => {
            stroke_footprint(&points(primitive)?, params.stroke_half_width, params.disk_segments)
        }
        PrimitiveKind::Polygon => Geometry::from_ring(&points(primitive)?),
        PrimitiveKind::Text | PrimitiveKind::Use => {
            let anchor = Point::new(num("x")?, num("y")?);
            disk(anchor, params.anchor_radius, params.anchor_radius, params)?
        }
    };
    Ok(geometry)
}

fn disk(center: Point, rx: f64, ry: f64, params: &ExtractParams) -> Result<Geometry, Skip> {
    if rx <= 0.0 || ry <= 0.0 {
        return Err(Skip::Empty);
    }
    Ok(Geometry::from_ring(&ellipse_ring(center, rx, ry, params.disk_segments)))
}
