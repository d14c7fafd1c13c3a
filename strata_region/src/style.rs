// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Document-level style tables and fill resolution.

use hashbrown::HashMap;

use crate::color::Rgba;
use crate::primitive::Primitive;

/// Style information shared by every primitive of one document.
///
/// `classes` maps a class selector (without the leading `.`) to the raw
/// `fill` value declared for it. `gradients` maps a paint server id to the
/// color of its last stop.
#[derive(Clone, Debug, Default)]
pub struct StyleContext {
    classes: HashMap<String, String>,
    gradients: HashMap<String, Rgba>,
}

impl StyleContext {
    /// An empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Read `fill` declarations out of a stylesheet.
    ///
    /// Only simple selectors are understood: `.a, .b:hover { fill: red }`
    /// registers `a` and `b`. Later rules win.
    ///
    /// ```
    /// use strata_region::StyleContext;
    ///
    /// let ctx = StyleContext::from_stylesheet(".st0{fill:#fff;} .st1, .st2:hover { fill: red }");
    /// assert_eq!(ctx.class_fill("st0"), Some("#fff"));
    /// assert_eq!(ctx.class_fill("st2"), Some("red"));
    /// ```
    pub fn from_stylesheet(css: &str) -> Self {
        let mut ctx = Self::new();
        ctx.add_stylesheet(css);
        ctx
    }

    /// Merge `fill` declarations from another stylesheet.
    pub fn add_stylesheet(&mut self, css: &str) {
        let css = strip_comments(css);
        for block in css.split('}') {
            let Some((selectors, body)) = block.split_once('{') else {
                continue;
            };
            let Some(fill) = declaration(body, "fill") else {
                continue;
            };
            for selector in selectors.split(',') {
                let selector = selector.trim().trim_start_matches('.');
                let selector = selector.split(':').next().unwrap_or_default().trim();
                if !selector.is_empty() {
                    self.classes.insert(selector.to_owned(), fill.to_owned());
                }
            }
        }
    }

    /// Register the last stop color of a gradient.
    pub fn insert_gradient(&mut self, id: impl Into<String>, color: Rgba) {
        self.gradients.insert(id.into(), color);
    }

    /// Raw fill declared for `class`.
    pub fn class_fill(&self, class: &str) -> Option<&str> {
        self.classes.get(class).map(String::as_str)
    }

    /// Last stop color of gradient `id`.
    pub fn gradient(&self, id: &str) -> Option<Rgba> {
        self.gradients.get(id).copied()
    }

    /// Number of class rules.
    pub fn class_count(&self) -> usize {
        self.classes.len()
    }

    /// Number of resolvable gradients.
    pub fn gradient_count(&self) -> usize {
        self.gradients.len()
    }
}

fn strip_comments(css: &str) -> String {
    let mut out = String::with_capacity(css.len());
    let mut rest = css;
    while let Some(start) = rest.find("/*") {
        out.push_str(&rest[..start]);
        match rest[start + 2..].find("*/") {
            Some(end) => rest = &rest[start + 2 + end + 2..],
            None => return out,
        }
    }
    out.push_str(rest);
    out
}

/// Value of property `name` in a `;`-separated declaration list.
///
/// Names compare case-insensitively and `!important` is dropped. The last
/// declaration wins.
pub fn declaration<'a>(list: &'a str, name: &str) -> Option<&'a str> {
    list.split(';')
        .filter_map(|decl| decl.split_once(':'))
        .filter(|(n, _)| n.trim().eq_ignore_ascii_case(name))
        .map(|(_, v)| {
            let v = v.trim();
            v.strip_suffix("!important").map_or(v, str::trim_end)
        })
        .next_back()
}

/// Outcome of fill resolution for one primitive.
#[derive(Clone, Debug, PartialEq)]
pub enum Fill {
    /// Nothing declared anywhere; painted with the default fill.
    Unspecified,
    /// A color was resolved.
    Color(Rgba),
    /// Declared but not a color this crate knows (`currentColor`, say).
    Opaque(String),
    /// `none`, or a color with zero alpha.
    None,
    /// A `url(#id)` reference with no resolvable stop.
    MissingGradient(String),
}

impl Fill {
    /// Whether the primitive paints anything.
    pub fn is_painted(&self) -> bool {
        matches!(self, Self::Unspecified | Self::Color(_) | Self::Opaque(_))
    }

    /// The resolved color, if any.
    pub fn color(&self) -> Option<Rgba> {
        match self {
            Self::Color(c) => Some(*c),
            _ => None,
        }
    }
}

/// Resolve the fill of `primitive`.
///
/// Looks at the `fill` attribute, then the `fill` property of the inline
/// `style`, then the first class that has a rule in `ctx`. A `url(#id)` value
/// found by any of those is resolved through the gradient table.
pub fn resolve_fill(primitive: &Primitive, ctx: &StyleContext) -> Fill {
    let raw = primitive
        .attr("fill")
        .map(str::trim)
        .or_else(|| primitive.attr("style").and_then(|s| declaration(s, "fill")))
        .or_else(|| {
            primitive
                .attr("class")?
                .split_whitespace()
                .find_map(|class| ctx.class_fill(class))
        });
    let Some(raw) = raw else {
        return Fill::Unspecified;
    };
    if raw.eq_ignore_ascii_case("none") {
        return Fill::None;
    }
    if let Some(id) = gradient_ref(raw) {
        return match ctx.gradient(id) {
            Some(c) if c.is_transparent() => Fill::None,
            Some(c) => Fill::Color(c),
            None => Fill::MissingGradient(id.to_owned()),
        };
    }
    match Rgba::parse(raw) {
        Some(c) if c.is_transparent() => Fill::None,
        Some(c) => Fill::Color(c),
        None => Fill::Opaque(raw.to_owned()),
    }
}

/// The id inside `url(#id)`, tolerating quotes and whitespace.
pub fn gradient_ref(value: &str) -> Option<&str> {
    let inner = value.trim().strip_prefix("url(")?.strip_suffix(')')?;
    let inner = inner.trim().trim_matches(|c| c == '\'' || c == '"');
    inner.strip_prefix('#')
}
