// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Multi-part polygon geometry with boolean operations.

use core::fmt::Write as _;

use geo::{Area, BooleanOps, BoundingRect, Coord, Intersects, LineString, MultiPolygon, Polygon};
use kurbo::Point;
use strata_index::Aabb2D;

/// A set of polygons, each with an exterior ring and optional holes.
///
/// Values built through this type are kept valid: rings are closed, parts do
/// not overlap and self-intersections are resolved. Boolean operations never
/// fail; degenerate operands behave as the empty set.
#[derive(Clone, Debug, PartialEq)]
pub struct Geometry(MultiPolygon<f64>);

impl Default for Geometry {
    fn default() -> Self {
        Self::empty()
    }
}

impl Geometry {
    /// The empty set.
    pub fn empty() -> Self {
        Self(MultiPolygon::new(Vec::new()))
    }

    /// Wrap an existing multi-polygon, repairing overlaps and self-intersections.
    pub fn from_multi_polygon(mp: MultiPolygon<f64>) -> Self {
        Self(mp).repaired()
    }

    /// An axis-aligned rectangle.
    pub fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self::from_ring(&[
            Point::new(x0, y0),
            Point::new(x1, y0),
            Point::new(x1, y1),
            Point::new(x0, y1),
        ])
    }

    /// A single ring. The ring is closed implicitly and repaired if it crosses itself.
    pub fn from_ring(points: &[Point]) -> Self {
        match ring_polygon(points) {
            Some(p) => Self(MultiPolygon::new(vec![p])).repaired(),
            None => Self::empty(),
        }
    }

    /// Combine rings with the even-odd rule: each ring toggles coverage.
    pub fn from_rings_even_odd<R: AsRef<[Point]>>(rings: &[R]) -> Self {
        rings
            .iter()
            .map(|r| Self::from_ring(r.as_ref()))
            .fold(Self::empty(), |acc, g| acc.xor(&g))
    }

    /// Number of disjoint parts.
    pub fn part_count(&self) -> usize {
        self.0.0.len()
    }

    /// Whether there are no parts.
    pub fn is_empty(&self) -> bool {
        self.0.0.is_empty()
    }

    /// Total enclosed area; holes are subtracted.
    pub fn area(&self) -> f64 {
        self.0.unsigned_area()
    }

    /// Finite coordinates and positive area.
    pub fn is_valid(&self) -> bool {
        !self.is_empty() && self.is_finite() && self.area() > 0.0
    }

    fn is_finite(&self) -> bool {
        self.rings()
            .flat_map(|ring| ring.0.iter())
            .all(|c| c.x.is_finite() && c.y.is_finite())
    }

    fn rings(&self) -> impl Iterator<Item = &LineString<f64>> {
        self.0
            .0
            .iter()
            .flat_map(|p| core::iter::once(p.exterior()).chain(p.interiors()))
    }

    /// Axis-aligned bounds, or `None` when empty.
    pub fn bounds(&self) -> Option<Aabb2D> {
        let r = self.0.bounding_rect()?;
        Some(Aabb2D::new(r.min().x, r.min().y, r.max().x, r.max().y))
    }

    /// The same parts with every hole filled in.
    ///
    /// Containment between visible regions is judged on outlines: a region
    /// sitting in a hole another region leaves is inside that region.
    pub fn outline(&self) -> Self {
        let parts = self
            .0
            .0
            .iter()
            .map(|p| Polygon::new(p.exterior().clone(), Vec::new()))
            .collect();
        Self::from_multi_polygon(MultiPolygon::new(parts))
    }

    /// Set union.
    pub fn union(&self, other: &Self) -> Self {
        match (self.usable(), other.usable()) {
            (false, _) => other.sanitized(),
            (_, false) => self.clone(),
            _ => Self(self.0.union(&other.0)),
        }
    }

    /// Set difference `self − other`.
    pub fn difference(&self, other: &Self) -> Self {
        match (self.usable(), other.usable()) {
            (false, _) => Self::empty(),
            (_, false) => self.clone(),
            _ => Self(self.0.difference(&other.0)),
        }
    }

    /// Set intersection.
    pub fn intersection(&self, other: &Self) -> Self {
        if !self.usable() || !other.usable() {
            return Self::empty();
        }
        Self(self.0.intersection(&other.0))
    }

    /// Symmetric difference.
    pub fn xor(&self, other: &Self) -> Self {
        match (self.usable(), other.usable()) {
            (false, _) => other.sanitized(),
            (_, false) => self.clone(),
            _ => Self(self.0.xor(&other.0)),
        }
    }

    /// Whether the part of `other` outside `self` has area at most `tolerance`.
    pub fn covers(&self, other: &Self, tolerance: f64) -> bool {
        if !other.usable() {
            return true;
        }
        if let (Some(a), Some(b)) = (self.bounds(), other.bounds())
            && !a.overlaps(&b)
        {
            return false;
        }
        other.difference(self).area() <= tolerance
    }

    /// Whether `other` lies inside `self`, up to a relative area tolerance.
    pub fn contains(&self, other: &Self) -> bool {
        self.covers(other, CONTAIN_EPSILON * other.area().max(1.0))
    }

    /// Whether the two geometries share at least one point.
    pub fn intersects(&self, other: &Self) -> bool {
        self.usable() && other.usable() && self.0.intersects(&other.0)
    }

    /// SVG path data: one `M … L … Z` run per ring.
    ///
    /// ```
    /// use strata_region::Geometry;
    ///
    /// let d = Geometry::rect(0.0, 0.0, 2.0, 1.0).to_path_data();
    /// assert!(d.starts_with('M') && d.ends_with('Z'));
    /// ```
    pub fn to_path_data(&self) -> String {
        let mut out = String::new();
        for ring in self.rings() {
            // Rings are stored closed; the closing point is implied by `Z`.
            let n = ring.0.len().saturating_sub(1);
            for (i, c) in ring.0.iter().take(n).enumerate() {
                if !out.is_empty() {
                    out.push(' ');
                }
                let cmd = if i == 0 { 'M' } else { 'L' };
                let _ = write!(out, "{cmd} {} {}", c.x, c.y);
            }
            if n > 0 {
                out.push_str(" Z");
            }
        }
        out
    }

    fn usable(&self) -> bool {
        !self.is_empty() && self.is_finite()
    }

    fn sanitized(&self) -> Self {
        if self.usable() {
            self.clone()
        } else {
            Self::empty()
        }
    }

    fn repaired(self) -> Self {
        if !self.usable() {
            return Self::empty();
        }
        Self(self.0.union(&MultiPolygon::new(Vec::new())))
    }
}

const CONTAIN_EPSILON: f64 = 1e-6;

fn ring_polygon(points: &[Point]) -> Option<Polygon<f64>> {
    let mut coords: Vec<Coord<f64>> = Vec::with_capacity(points.len() + 1);
    for p in points {
        let c = Coord { x: p.x, y: p.y };
        if coords.last() != Some(&c) {
            coords.push(c);
        }
    }
    while coords.len() > 1 && coords.first() == coords.last() {
        coords.pop();
    }
    if coords.len() < 3 {
        return None;
    }
    Some(Polygon::new(LineString::new(coords), Vec::new()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn rect_area_and_bounds() {
        let g = Geometry::rect(1.0, 2.0, 11.0, 7.0);
        assert!(close(g.area(), 50.0), "area {}", g.area());
        let b = g.bounds().expect("non-empty geometry has bounds");
        assert!(
            close(b.min_x, 1.0) && close(b.min_y, 2.0) && close(b.max_x, 11.0) && close(b.max_y, 7.0),
            "bounds {b:?}"
        );
        assert!(g.is_valid());
    }

    #[test]
    fn degenerate_rings_are_empty() {
        let line = Geometry::from_ring(&[Point::new(0.0, 0.0), Point::new(5.0, 0.0)]);
        assert!(line.is_empty());
        let nan = Geometry::from_ring(&[
            Point::new(0.0, 0.0),
            Point::new(f64::NAN, 0.0),
            Point::new(1.0, 1.0),
        ]);
        assert!(!nan.is_valid());
    }

    #[test]
    fn bow_tie_is_repaired() {
        let g = Geometry::from_ring(&[
            Point::new(0.0, 0.0),
            Point::new(2.0, 2.0),
            Point::new(2.0, 0.0),
            Point::new(0.0, 2.0),
        ]);
        assert!(close(g.area(), 2.0), "two triangles of area 1, got {}", g.area());
    }

    #[test]
    fn even_odd_makes_holes() {
        let outer = [
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 10.0),
            Point::new(0.0, 10.0),
        ];
        let inner = [
            Point::new(2.0, 2.0),
            Point::new(8.0, 2.0),
            Point::new(8.0, 8.0),
            Point::new(2.0, 8.0),
        ];
        let g = Geometry::from_rings_even_odd(&[outer.to_vec(), inner.to_vec()]);
        assert!(close(g.area(), 64.0), "area {}", g.area());
        assert!(close(g.outline().area(), 100.0));
    }

    #[test]
    fn booleans() {
        let a = Geometry::rect(0.0, 0.0, 10.0, 10.0);
        let b = Geometry::rect(5.0, 0.0, 15.0, 10.0);
        assert!(close(a.union(&b).area(), 150.0));
        assert!(close(a.difference(&b).area(), 50.0));
        assert!(close(a.intersection(&b).area(), 50.0));
        assert!(close(a.xor(&b).area(), 100.0));
        assert!(a.intersects(&b));
        assert!(!a.contains(&b));
        assert!(a.contains(&Geometry::rect(1.0, 1.0, 9.0, 9.0)));
        assert!(a.contains(&Geometry::rect(0.0, 0.0, 10.0, 5.0)), "shared edges still count");
    }

    #[test]
    fn empty_operands() {
        let a = Geometry::rect(0.0, 0.0, 1.0, 1.0);
        let e = Geometry::empty();
        assert_eq!(a.difference(&e), a);
        assert!(e.difference(&a).is_empty());
        assert!(close(e.union(&a).area(), 1.0));
        assert!(a.covers(&e, 0.0));
        assert!(!e.intersects(&a));
    }

    #[test]
    fn path_data_lists_every_ring() {
        let g = Geometry::rect(0.0, 0.0, 4.0, 4.0).difference(&Geometry::rect(1.0, 1.0, 2.0, 2.0));
        let d = g.to_path_data();
        assert_eq!(d.matches('M').count(), 2, "exterior plus one hole: {d}");
        assert_eq!(d.matches('Z').count(), 2);
    }
}
