// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! RGBA colors and CSS color string parsing.

use core::fmt;

/// An 8-bit-per-channel color with straight alpha.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rgba {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel, 255 is opaque.
    pub a: u8,
}

impl Rgba {
    /// Opaque black.
    pub const BLACK: Self = Self::opaque(0, 0, 0);

    /// Create a color from all four channels.
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Create an opaque color.
    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Alpha as a fraction in `0.0..=1.0`.
    pub fn alpha(&self) -> f64 {
        f64::from(self.a) / 255.0
    }

    /// Whether the color paints nothing.
    pub fn is_transparent(&self) -> bool {
        self.a == 0
    }

    /// Parse a CSS color string.
    ///
    /// Accepts `#rgb`, `#rgba`, `#rrggbb`, `#rrggbbaa`, `rgb()`/`rgba()` in
    /// comma or space syntax with number or percentage channels, the named
    /// colors in [`NAMED_COLORS`], and `transparent`. Returns `None` for
    /// anything else, including `none` and paint-server references.
    ///
    /// ```
    /// use strata_region::Rgba;
    ///
    /// assert_eq!(Rgba::parse("#f80"), Some(Rgba::opaque(255, 136, 0)));
    /// assert_eq!(Rgba::parse("rgba(0, 0, 255, 0.5)"), Some(Rgba::new(0, 0, 255, 128)));
    /// assert_eq!(Rgba::parse("Teal"), Some(Rgba::opaque(0, 128, 128)));
    /// assert_eq!(Rgba::parse("url(#g)"), None);
    /// ```
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if let Some(hex) = s.strip_prefix('#') {
            return parse_hex(hex);
        }
        let lower = s.to_ascii_lowercase();
        if let Some(args) = function_args(&lower, "rgba").or_else(|| function_args(&lower, "rgb"))
        {
            return parse_rgb_args(args);
        }
        if lower == "transparent" {
            return Some(Self::new(0, 0, 0, 0));
        }
        NAMED_COLORS
            .iter()
            .find(|(name, _)| *name == lower)
            .map(|(_, c)| *c)
    }
}

/// Formats as `rgba(r, g, b, a)` with alpha rounded to two decimals.
impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let alpha = (self.alpha() * 100.0).round() / 100.0;
        if alpha.fract() == 0.0 {
            write!(f, "rgba({}, {}, {}, {alpha:.1})", self.r, self.g, self.b)
        } else {
            write!(f, "rgba({}, {}, {}, {alpha})", self.r, self.g, self.b)
        }
    }
}

fn function_args<'a>(s: &'a str, name: &str) -> Option<&'a str> {
    s.strip_prefix(name)?
        .trim_start()
        .strip_prefix('(')?
        .strip_suffix(')')
}

fn parse_hex(hex: &str) -> Option<Rgba> {
    if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let nibble = |i: usize| u8::from_str_radix(&hex[i..=i], 16).ok().map(|v| v * 17);
    let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    match hex.len() {
        3 => Some(Rgba::opaque(nibble(0)?, nibble(1)?, nibble(2)?)),
        4 => Some(Rgba::new(nibble(0)?, nibble(1)?, nibble(2)?, nibble(3)?)),
        6 => Some(Rgba::opaque(byte(0)?, byte(2)?, byte(4)?)),
        8 => Some(Rgba::new(byte(0)?, byte(2)?, byte(4)?, byte(6)?)),
        _ => None,
    }
}

#[allow(
    clippy::cast_possible_truncation,
    reason = "Values are clamped to 0..=255 before the cast."
)]
fn unit_to_byte(v: f64) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

fn parse_channel(token: &str) -> Option<u8> {
    if let Some(pct) = token.strip_suffix('%') {
        let v: f64 = pct.trim().parse().ok()?;
        return Some(unit_to_byte(v / 100.0));
    }
    let v: f64 = token.parse().ok()?;
    Some(unit_to_byte(v / 255.0))
}

fn parse_alpha(token: &str) -> Option<u8> {
    if let Some(pct) = token.strip_suffix('%') {
        let v: f64 = pct.trim().parse().ok()?;
        return Some(unit_to_byte(v / 100.0));
    }
    let v: f64 = token.parse().ok()?;
    Some(unit_to_byte(v))
}

fn parse_rgb_args(args: &str) -> Option<Rgba> {
    let tokens: Vec<&str> = args
        .split(|c: char| c == ',' || c == '/' || c.is_whitespace())
        .filter(|t| !t.is_empty())
        .collect();
    match tokens.as_slice() {
        [r, g, b] => Some(Rgba::opaque(
            parse_channel(r)?,
            parse_channel(g)?,
            parse_channel(b)?,
        )),
        [r, g, b, a] => Some(Rgba::new(
            parse_channel(r)?,
            parse_channel(g)?,
            parse_channel(b)?,
            parse_alpha(a)?,
        )),
        _ => None,
    }
}

/// CSS named colors recognized by [`Rgba::parse`] (lowercase).
pub const NAMED_COLORS: &[(&str, Rgba)] = &[
    ("black", Rgba::opaque(0, 0, 0)),
    ("white", Rgba::opaque(255, 255, 255)),
    ("red", Rgba::opaque(255, 0, 0)),
    ("green", Rgba::opaque(0, 128, 0)),
    ("lime", Rgba::opaque(0, 255, 0)),
    ("blue", Rgba::opaque(0, 0, 255)),
    ("yellow", Rgba::opaque(255, 255, 0)),
    ("cyan", Rgba::opaque(0, 255, 255)),
    ("aqua", Rgba::opaque(0, 255, 255)),
    ("magenta", Rgba::opaque(255, 0, 255)),
    ("fuchsia", Rgba::opaque(255, 0, 255)),
    ("gray", Rgba::opaque(128, 128, 128)),
    ("grey", Rgba::opaque(128, 128, 128)),
    ("silver", Rgba::opaque(192, 192, 192)),
    ("maroon", Rgba::opaque(128, 0, 0)),
    ("olive", Rgba::opaque(128, 128, 0)),
    ("teal", Rgba::opaque(0, 128, 128)),
    ("navy", Rgba::opaque(0, 0, 128)),
    ("purple", Rgba::opaque(128, 0, 128)),
    ("orange", Rgba::opaque(255, 165, 0)),
    ("pink", Rgba::opaque(255, 192, 203)),
    ("brown", Rgba::opaque(165, 42, 42)),
    ("gold", Rgba::opaque(255, 215, 0)),
    ("beige", Rgba::opaque(245, 245, 220)),
    ("ivory", Rgba::opaque(255, 255, 240)),
    ("khaki", Rgba::opaque(240, 230, 140)),
    ("lavender", Rgba::opaque(230, 230, 250)),
    ("coral", Rgba::opaque(255, 127, 80)),
    ("crimson", Rgba::opaque(220, 20, 60)),
    ("salmon", Rgba::opaque(250, 128, 114)),
    ("tomato", Rgba::opaque(255, 99, 71)),
    ("turquoise", Rgba::opaque(64, 224, 208)),
    ("violet", Rgba::opaque(238, 130, 238)),
    ("indigo", Rgba::opaque(75, 0, 130)),
    ("orchid", Rgba::opaque(218, 112, 214)),
    ("plum", Rgba::opaque(221, 160, 221)),
    ("sienna", Rgba::opaque(160, 82, 45)),
    ("chocolate", Rgba::opaque(210, 105, 30)),
    ("tan", Rgba::opaque(210, 180, 140)),
    ("wheat", Rgba::opaque(245, 222, 179)),
    ("skyblue", Rgba::opaque(135, 206, 235)),
    ("steelblue", Rgba::opaque(70, 130, 180)),
    ("lightblue", Rgba::opaque(173, 216, 230)),
    ("darkblue", Rgba::opaque(0, 0, 139)),
    ("darkred", Rgba::opaque(139, 0, 0)),
    ("darkgreen", Rgba::opaque(0, 100, 0)),
    ("darkgray", Rgba::opaque(169, 169, 169)),
    ("darkgrey", Rgba::opaque(169, 169, 169)),
    ("lightgray", Rgba::opaque(211, 211, 211)),
    ("lightgrey", Rgba::opaque(211, 211, 211)),
    ("whitesmoke", Rgba::opaque(245, 245, 245)),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_forms() {
        assert_eq!(Rgba::parse("#000"), Some(Rgba::BLACK));
        assert_eq!(Rgba::parse("#12345678"), Some(Rgba::new(0x12, 0x34, 0x56, 0x78)));
        assert_eq!(Rgba::parse("#ABCDEF"), Some(Rgba::opaque(0xab, 0xcd, 0xef)));
        assert_eq!(Rgba::parse("#abcd"), Some(Rgba::new(0xaa, 0xbb, 0xcc, 0xdd)));
        assert_eq!(Rgba::parse("#12"), None);
        assert_eq!(Rgba::parse("#zzzzzz"), None);
    }

    #[test]
    fn functional_forms() {
        assert_eq!(Rgba::parse("rgb(255, 0, 10)"), Some(Rgba::opaque(255, 0, 10)));
        assert_eq!(Rgba::parse("RGB(100%,0%,0%)"), Some(Rgba::opaque(255, 0, 0)));
        assert_eq!(
            Rgba::parse("rgb(10 20 30 / 50%)"),
            Some(Rgba::new(10, 20, 30, 128))
        );
        assert_eq!(Rgba::parse("rgb(1, 2)"), None);
    }

    #[test]
    fn keywords() {
        assert!(Rgba::parse("transparent").is_some_and(|c| c.is_transparent()));
        assert_eq!(Rgba::parse("none"), None);
        assert_eq!(Rgba::parse("currentColor"), None);
    }

    #[test]
    fn display_rounds_alpha() {
        assert_eq!(Rgba::opaque(1, 2, 3).to_string(), "rgba(1, 2, 3, 1.0)");
        assert_eq!(Rgba::new(1, 2, 3, 128).to_string(), "rgba(1, 2, 3, 0.5)");
        assert_eq!(Rgba::new(1, 2, 3, 64).to_string(), "rgba(1, 2, 3, 0.25)");
    }
}
