// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Authored primitives: a shape kind plus its raw attributes.

/// The shape kinds the extractor understands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    /// `<path d=…>`.
    Path,
    /// `<rect x y width height>`.
    Rect,
    /// `<circle cx cy r>`.
    Circle,
    /// `<ellipse cx cy rx ry>`.
    Ellipse,
    /// `<line x1 y1 x2 y2>`.
    Line,
    /// `<polyline points>`.
    Polyline,
    /// `<polygon points>`.
    Polygon,
    /// `<text x y>`; only its anchor is used.
    Text,
    /// `<use x y>`; only its anchor is used.
    Use,
}

impl PrimitiveKind {
    /// Every supported kind, in no particular order.
    pub const ALL: [Self; 9] = [
        Self::Path,
        Self::Rect,
        Self::Circle,
        Self::Ellipse,
        Self::Line,
        Self::Polyline,
        Self::Polygon,
        Self::Text,
        Self::Use,
    ];

    /// Map an element tag name to a kind.
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.tag() == tag)
    }

    /// The element tag name for this kind.
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Path => "path",
            Self::Rect => "rect",
            Self::Circle => "circle",
            Self::Ellipse => "ellipse",
            Self::Line => "line",
            Self::Polyline => "polyline",
            Self::Polygon => "polygon",
            Self::Text => "text",
            Self::Use => "use",
        }
    }
}

/// One drawable element as authored.
///
/// Attributes are kept as raw strings; interpretation happens in
/// [`extract`](crate::extract) so that malformed values surface as a
/// [`Skip`](crate::Skip) for that primitive only.
#[derive(Clone, Debug, PartialEq)]
pub struct Primitive {
    kind: PrimitiveKind,
    attributes: Vec<(String, String)>,
}

impl Primitive {
    /// A primitive of `kind` with no attributes.
    pub fn new(kind: PrimitiveKind) -> Self {
        Self {
            kind,
            attributes: Vec::new(),
        }
    }

    /// Builder-style attribute setter. Later values replace earlier ones.
    #[must_use]
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attr(name, value);
        self
    }

    /// Set an attribute, replacing any previous value.
    pub fn set_attr(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        if let Some(slot) = self.attributes.iter_mut().find(|(n, _)| *n == name) {
            slot.1 = value;
        } else {
            self.attributes.push((name, value));
        }
    }

    /// The shape kind.
    pub fn kind(&self) -> PrimitiveKind {
        self.kind
    }

    /// Raw value of attribute `name`.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// All attributes in insertion order.
    pub fn attributes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    /// The element `id`, if any.
    pub fn id(&self) -> Option<&str> {
        self.attr("id")
    }

    /// `<rect>` shorthand.
    pub fn rect(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::new(PrimitiveKind::Rect)
            .with_attr("x", x.to_string())
            .with_attr("y", y.to_string())
            .with_attr("width", width.to_string())
            .with_attr("height", height.to_string())
    }

    /// `<circle>` shorthand.
    pub fn circle(cx: f64, cy: f64, r: f64) -> Self {
        Self::new(PrimitiveKind::Circle)
            .with_attr("cx", cx.to_string())
            .with_attr("cy", cy.to_string())
            .with_attr("r", r.to_string())
    }

    /// `<ellipse>` shorthand.
    pub fn ellipse(cx: f64, cy: f64, rx: f64, ry: f64) -> Self {
        Self::new(PrimitiveKind::Ellipse)
            .with_attr("cx", cx.to_string())
            .with_attr("cy", cy.to_string())
            .with_attr("rx", rx.to_string())
            .with_attr("ry", ry.to_string())
    }

    /// `<path>` shorthand.
    pub fn path(d: impl Into<String>) -> Self {
        Self::new(PrimitiveKind::Path).with_attr("d", d)
    }

    /// `<line>` shorthand.
    pub fn line(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self::new(PrimitiveKind::Line)
            .with_attr("x1", x1.to_string())
            .with_attr("y1", y1.to_string())
            .with_attr("x2", x2.to_string())
            .with_attr("y2", y2.to_string())
    }

    /// `<polygon>` shorthand from a point list.
    pub fn polygon(points: &[(f64, f64)]) -> Self {
        Self::new(PrimitiveKind::Polygon).with_attr("points", format_points(points))
    }

    /// `<polyline>` shorthand from a point list.
    pub fn polyline(points: &[(f64, f64)]) -> Self {
        Self::new(PrimitiveKind::Polyline).with_attr("points", format_points(points))
    }

    /// `<text>` shorthand; only the anchor matters.
    pub fn text(x: f64, y: f64) -> Self {
        Self::new(PrimitiveKind::Text)
            .with_attr("x", x.to_string())
            .with_attr("y", y.to_string())
    }
}

fn format_points(points: &[(f64, f64)]) -> String {
    points
        .iter()
        .map(|(x, y)| format!("{x},{y}"))
        .collect::<Vec<_>>()
        .join(" ")
}
