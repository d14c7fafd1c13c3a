// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Strata SVG: the markup adapter in front of `strata_region`.
//!
//! [`parse_svg`] walks an SVG document in paint order and returns an
//! [`SvgDocument`]: one [`Primitive`] per shape element, plus a
//! [`StyleContext`] holding the `fill` rules of every `<style>` block and the
//! last stop color of every gradient.
//!
//! Content of `<defs>`, `<clipPath>`, `<mask>`, `<symbol>`, `<pattern>` and
//! `<marker>` is not painted directly and is skipped. Transforms are not
//! applied; coordinates are taken as written.
//!
//! Group presentation is folded into each shape: an ancestor `fill` applies
//! only when the shape declares no fill of its own (attribute, inline style or
//! class rule), and ancestor `opacity` values multiply into the shape's.
//!
//! # Example
//!
//! ```rust
//! let doc = strata_svg::parse_svg(
//!     r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 10 10">
//!           <style>.a { fill: #123456 }</style>
//!           <rect class="a" width="10" height="10"/>
//!           <circle cx="5" cy="5" r="2" fill="url(#g)"/>
//!           <defs><linearGradient id="g"><stop offset="1" stop-color="red"/></linearGradient></defs>
//!         </svg>"##,
//! )
//! .unwrap();
//! assert_eq!(doc.primitives.len(), 2);
//! assert_eq!(doc.style.class_fill("a"), Some("#123456"));
//! assert!(doc.style.gradient("g").is_some());
//! ```

use std::path::{Path, PathBuf};

use roxmltree::{Document, Node, ParsingOptions};
use strata_region::{Fill, Primitive, PrimitiveKind, Rgba, StyleContext, declaration, resolve_fill};
use thiserror::Error;

/// Errors raised while reading a document.
#[derive(Debug, Error)]
pub enum SvgError {
    /// The file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// File that failed.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
    /// The text is not well-formed XML.
    #[error("malformed XML: {0}")]
    Xml(#[from] roxmltree::Error),
    /// The root element is not `<svg>`.
    #[error("root element is <{0}>, expected <svg>")]
    NotSvg(String),
}

/// Result alias for this crate.
pub type Result<T> = core::result::Result<T, SvgError>;

/// Everything the pipeline needs from one SVG document.
#[derive(Clone, Debug, Default)]
pub struct SvgDocument {
    /// Attributes of the root `<svg>` element, namespace declarations excluded.
    pub root_attributes: Vec<(String, String)>,
    /// Concatenated text of every `<style>` element.
    pub stylesheet: String,
    /// Shape elements in paint order.
    pub primitives: Vec<Primitive>,
    /// Class fills and gradient colors.
    pub style: StyleContext,
}

/// Elements whose subtree is never painted in place.
const NON_RENDERED: &[&str] = &["defs", "clipPath", "mask", "symbol", "pattern", "marker"];

/// Presentation attributes a shape picks up from its nearest ancestor.
const INHERITED: &[&str] = &["fill", "fill-opacity", "visibility"];

/// Read and parse an SVG file.
pub fn read_svg(path: &Path) -> Result<SvgDocument> {
    let text = std::fs::read_to_string(path).map_err(|source| SvgError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_svg(&text)
}

/// Parse SVG text.
pub fn parse_svg(text: &str) -> Result<SvgDocument> {
    let options = ParsingOptions {
        allow_dtd: true,
        ..ParsingOptions::default()
    };
    let doc = Document::parse_with_options(text, options)?;
    let root = doc.root_element();
    if root.tag_name().name() != "svg" {
        return Err(SvgError::NotSvg(root.tag_name().name().to_owned()));
    }

    let root_attributes = root
        .attributes()
        .map(|a| (a.name().to_owned(), a.value().to_owned()))
        .collect();

    let mut stylesheet = String::new();
    for node in root.descendants().filter(|n| n.has_tag_name("style")) {
        for text in node.children().filter_map(|c| c.text()) {
            stylesheet.push_str(text);
            stylesheet.push('\n');
        }
    }
    let mut style = StyleContext::from_stylesheet(&stylesheet);
    for (id, color) in gradient_colors(root) {
        style.insert_gradient(id, color);
    }

    let primitives: Vec<Primitive> = root
        .descendants()
        .filter(|n| n.is_element() && !inside_non_rendered(*n))
        .filter_map(|n| primitive_of(n, &style))
        .collect();

    tracing::debug!(
        primitives = primitives.len(),
        classes = style.class_count(),
        gradients = style.gradient_count(),
        "parsed svg"
    );
    Ok(SvgDocument {
        root_attributes,
        stylesheet,
        primitives,
        style,
    })
}

fn inside_non_rendered(node: Node<'_, '_>) -> bool {
    node.ancestors()
        .skip(1)
        .any(|a| NON_RENDERED.contains(&a.tag_name().name()))
}

fn primitive_of(node: Node<'_, '_>, style: &StyleContext) -> Option<Primitive> {
    let kind = PrimitiveKind::from_tag(node.tag_name().name())?;
    let mut primitive = Primitive::new(kind);
    for attr in node.attributes() {
        primitive.set_attr(attr.name(), attr.value());
    }
    for name in INHERITED {
        if own_property(&primitive, name).is_some() {
            continue;
        }
        // Class rules count as the shape's own fill.
        if *name == "fill" && resolve_fill(&primitive, style) != Fill::Unspecified {
            continue;
        }
        if let Some(value) = inherited(node, name) {
            primitive.set_attr(*name, value);
        }
    }
    let group_opacity: f64 = node
        .ancestors()
        .skip(1)
        .filter_map(|a| own_opacity(a.attribute("opacity"), a.attribute("style")))
        .product();
    if group_opacity < 1.0 {
        let own = own_opacity(primitive.attr("opacity"), primitive.attr("style")).unwrap_or(1.0);
        primitive.set_attr("opacity", (own * group_opacity).to_string());
    }
    if node.ancestors().skip(1).any(is_hidden) {
        primitive.set_attr("display", "none");
    }
    Some(primitive)
}

fn own_property<'a>(primitive: &'a Primitive, name: &str) -> Option<&'a str> {
    primitive
        .attr(name)
        .or_else(|| primitive.attr("style").and_then(|s| declaration(s, name)))
}

/// Opacity from an attribute or inline style, as a fraction; the style wins.
fn own_opacity(attr: Option<&str>, style: Option<&str>) -> Option<f64> {
    let raw = style.and_then(|s| declaration(s, "opacity")).or(attr)?.trim();
    let value = match raw.strip_suffix('%') {
        Some(pct) => pct.trim().parse::<f64>().ok()? / 100.0,
        None => raw.parse::<f64>().ok()?,
    };
    value.is_finite().then_some(value.clamp(0.0, 1.0))
}

fn inherited<'a>(node: Node<'a, '_>, name: &str) -> Option<&'a str> {
    node.ancestors().skip(1).find_map(|a| {
        a.attribute(name)
            .or_else(|| a.attribute("style").and_then(|s| declaration(s, name)))
    })
}

fn is_hidden(node: Node<'_, '_>) -> bool {
    let display = node
        .attribute("display")
        .or_else(|| node.attribute("style").and_then(|s| declaration(s, "display")));
    display.is_some_and(|d| d.eq_ignore_ascii_case("none"))
}

/// Last stop color of every gradient, following `href` for stop-less ones.
fn gradient_colors(root: Node<'_, '_>) -> Vec<(String, Rgba)> {
    let gradients: Vec<Node<'_, '_>> = root
        .descendants()
        .filter(|n| n.has_tag_name("linearGradient") || n.has_tag_name("radialGradient"))
        .collect();
    let by_id = |id: &str| gradients.iter().find(|g| g.attribute("id") == Some(id));

    let mut out = Vec::new();
    for g in &gradients {
        let Some(id) = g.attribute("id") else {
            continue;
        };
        // Bounded walk so `href` cycles terminate.
        let mut current = Some(*g);
        let mut color = None;
        for _ in 0..8 {
            let Some(node) = current else { break };
            if let Some(stop) = node.children().rev().find(|c| c.has_tag_name("stop")) {
                color = stop_color(stop);
                break;
            }
            current = href(node).and_then(|target| by_id(target).copied());
        }
        match color {
            Some(c) => out.push((id.to_owned(), c)),
            None => tracing::debug!(id, "gradient has no usable stop color"),
        }
    }
    out
}

fn href<'a>(node: Node<'a, '_>) -> Option<&'a str> {
    node.attributes()
        .find(|a| a.name() == "href")
        .and_then(|a| a.value().strip_prefix('#'))
}

#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "Opacity is clamped to 0..=1 before scaling to a byte."
)]
fn stop_color(stop: Node<'_, '_>) -> Option<Rgba> {
    let style = stop.attribute("style");
    let prop = |name: &str| stop.attribute(name).or_else(|| style.and_then(|s| declaration(s, name)));
    let mut color = match prop("stop-color") {
        Some(c) => Rgba::parse(c)?,
        None => Rgba::BLACK,
    };
    if let Some(opacity) = prop("stop-opacity").and_then(|o| o.trim().parse::<f64>().ok()) {
        color.a = (f64::from(color.a) * opacity.clamp(0.0, 1.0)).round() as u8;
    }
    Some(color)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shapes_in_document_order() {
        let doc = parse_svg(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="100" height="50">
                 <g><rect id="a" width="1" height="1"/><text x="3" y="4">hi</text></g>
                 <path id="b" d="M0 0 L1 0 L1 1 Z"/>
                 <image href="x.png"/>
               </svg>"#,
        )
        .expect("valid svg");
        let tags: Vec<_> = doc.primitives.iter().map(|p| p.kind().tag()).collect();
        assert_eq!(tags, vec!["rect", "text", "path"]);
        assert_eq!(doc.primitives[0].id(), Some("a"));
        assert!(doc.root_attributes.iter().any(|(n, v)| n == "width" && v == "100"));
    }

    #[test]
    fn defs_are_not_painted() {
        let doc = parse_svg(
            r#"<svg xmlns="http://www.w3.org/2000/svg">
                 <defs><rect width="5" height="5"/></defs>
                 <clipPath id="c"><circle r="3"/></clipPath>
                 <circle r="1"/>
               </svg>"#,
        )
        .expect("valid svg");
        assert_eq!(doc.primitives.len(), 1);
    }

    #[test]
    fn group_fill_and_display_are_inherited() {
        let doc = parse_svg(
            r#"<svg xmlns="http://www.w3.org/2000/svg">
                 <g fill="navy"><rect width="1" height="1"/><rect fill="red" width="1" height="1"/></g>
                 <g style="display:none"><rect width="1" height="1"/></g>
               </svg>"#,
        )
        .expect("valid svg");
        assert_eq!(doc.primitives[0].attr("fill"), Some("navy"));
        assert_eq!(doc.primitives[1].attr("fill"), Some("red"));
        assert_eq!(doc.primitives[2].attr("display"), Some("none"));
    }

    #[test]
    fn own_fill_beats_group_fill() {
        use strata_region::{ExtractParams, Skip, extract};

        let doc = parse_svg(
            r#"<svg xmlns="http://www.w3.org/2000/svg">
                 <style>.k { fill: lime }</style>
                 <g fill="navy">
                   <rect style="fill:red" width="2" height="2"/>
                   <rect class="k" width="2" height="2"/>
                   <rect class="unstyled" width="2" height="2"/>
                 </g>
                 <g fill="none"><rect style="fill:red" width="2" height="2"/></g>
                 <g fill="none"><rect width="2" height="2"/></g>
               </svg>"#,
        )
        .expect("valid svg");
        let fills: Vec<_> = doc
            .primitives
            .iter()
            .map(|p| resolve_fill(p, &doc.style).color())
            .collect();
        assert_eq!(fills[0], Some(Rgba::opaque(255, 0, 0)), "inline style");
        assert_eq!(fills[1], Some(Rgba::opaque(0, 255, 0)), "class rule");
        assert_eq!(fills[2], Some(Rgba::opaque(0, 0, 128)), "group fill");

        let params = ExtractParams::default();
        let red = extract(&doc.primitives[3], 3, &doc.style, &params).expect("own fill is painted");
        assert_eq!(red.fill, Some(Rgba::opaque(255, 0, 0)));
        assert_eq!(
            extract(&doc.primitives[4], 4, &doc.style, &params),
            Err(Skip::NoFill)
        );
    }

    #[test]
    fn group_opacity_multiplies() {
        let doc = parse_svg(
            r#"<svg xmlns="http://www.w3.org/2000/svg">
                 <g opacity="0.5"><g style="opacity:50%">
                   <rect width="1" height="1"/>
                   <rect opacity="0.5" width="1" height="1"/>
                 </g></g>
                 <g opacity="1"><rect width="1" height="1"/></g>
               </svg>"#,
        )
        .expect("valid svg");
        assert_eq!(doc.primitives[0].attr("opacity"), Some("0.25"));
        assert_eq!(doc.primitives[1].attr("opacity"), Some("0.125"));
        assert_eq!(doc.primitives[2].attr("opacity"), None);
    }

    #[test]
    fn gradient_stops_and_links() {
        let doc = parse_svg(
            r##"<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink">
                 <linearGradient id="base">
                   <stop offset="0" stop-color="#000"/>
                   <stop offset="1" style="stop-color:#00ff00;stop-opacity:0.5"/>
                 </linearGradient>
                 <radialGradient id="alias" xlink:href="#base"/>
                 <linearGradient id="loop" href="#loop"/>
                 <linearGradient id="plain"><stop offset="0"/></linearGradient>
               </svg>"##,
        )
        .expect("valid svg");
        assert_eq!(doc.style.gradient("base"), Some(Rgba::new(0, 255, 0, 128)));
        assert_eq!(doc.style.gradient("alias"), Some(Rgba::new(0, 255, 0, 128)));
        assert_eq!(doc.style.gradient("loop"), None);
        assert_eq!(doc.style.gradient("plain"), Some(Rgba::BLACK), "stop color defaults to black");
    }

    #[test]
    fn doctype_is_accepted_and_root_checked() {
        let ok = parse_svg(
            r#"<?xml version="1.0"?><!DOCTYPE svg PUBLIC "-//W3C//DTD SVG 1.1//EN" "http://www.w3.org/Graphics/SVG/1.1/DTD/svg11.dtd"><svg/>"#,
        );
        assert!(ok.is_ok());
        assert!(matches!(parse_svg("<html/>"), Err(SvgError::NotSvg(tag)) if tag == "html"));
        assert!(matches!(parse_svg("<svg>"), Err(SvgError::Xml(_))));
    }

    #[test]
    fn missing_file() {
        let err = read_svg(Path::new("/definitely/not/here.svg")).expect_err("no such file");
        assert!(matches!(err, SvgError::Io { .. }));
    }
}
