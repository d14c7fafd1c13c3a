// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Flattening of curves and strokes into polygon rings.

use core::f64::consts::TAU;

use kurbo::{BezPath, CubicBez, ParamCurve, PathEl, Point, QuadBez, Vec2};

use crate::geometry::Geometry;

/// Split a path into rings, one per subpath.
///
/// Curves are evaluated at `samples` evenly spaced parameters; line segments
/// contribute only their end point. Subpaths with fewer than three points are
/// dropped.
pub(crate) fn path_rings(path: &BezPath, samples: usize) -> Vec<Vec<Point>> {
    let samples = samples.max(1);
    let mut rings = Vec::new();
    let mut ring: Vec<Point> = Vec::new();
    let mut start = Point::ZERO;
    let mut last = Point::ZERO;

    for el in path.elements() {
        match *el {
            PathEl::MoveTo(p) => {
                flush(&mut ring, &mut rings);
                ring.push(p);
                start = p;
                last = p;
            }
            PathEl::LineTo(p) => {
                if ring.is_empty() {
                    ring.push(last);
                }
                ring.push(p);
                last = p;
            }
            PathEl::QuadTo(p1, p2) => {
                if ring.is_empty() {
                    ring.push(last);
                }
                let q = QuadBez::new(last, p1, p2);
                push_samples(&mut ring, &q, samples);
                last = p2;
            }
            PathEl::CurveTo(p1, p2, p3) => {
                if ring.is_empty() {
                    ring.push(last);
                }
                let c = CubicBez::new(last, p1, p2, p3);
                push_samples(&mut ring, &c, samples);
                last = p3;
            }
            PathEl::ClosePath => {
                flush(&mut ring, &mut rings);
                last = start;
            }
        }
    }
    flush(&mut ring, &mut rings);
    rings
}

fn flush(ring: &mut Vec<Point>, rings: &mut Vec<Vec<Point>>) {
    if ring.len() >= 3 {
        rings.push(core::mem::take(ring));
    } else {
        ring.clear();
    }
}

#[allow(
    clippy::cast_precision_loss,
    reason = "Sample counts are small; the conversion is exact."
)]
fn push_samples(ring: &mut Vec<Point>, curve: &impl ParamCurve, samples: usize) {
    let n = samples as f64;
    ring.extend((1..=samples).map(|i| curve.eval(i as f64 / n)));
}

/// A closed polygon approximating an axis-aligned ellipse.
#[allow(
    clippy::cast_precision_loss,
    reason = "Segment counts are small; the conversion is exact."
)]
pub(crate) fn ellipse_ring(center: Point, rx: f64, ry: f64, segments: usize) -> Vec<Point> {
    let segments = segments.max(8);
    let n = segments as f64;
    (0..segments)
        .map(|i| {
            let (sin, cos) = (TAU * i as f64 / n).sin_cos();
            center + Vec2::new(rx * cos, ry * sin)
        })
        .collect()
}

/// Area swept by a polyline of the given half width, with round joins and caps.
pub(crate) fn stroke_footprint(points: &[Point], half_width: f64, segments: usize) -> Geometry {
    let mut acc = Geometry::empty();
    let mut distinct = points.to_vec();
    distinct.dedup();
    if distinct.len() < 2 || half_width <= 0.0 {
        return acc;
    }
    for pair in distinct.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        let d = b - a;
        let len = d.hypot();
        if len <= f64::EPSILON {
            continue;
        }
        let n = Vec2::new(-d.y, d.x) * (half_width / len);
        let quad = Geometry::from_ring(&[a + n, b + n, b - n, a - n]);
        acc = acc.union(&quad);
    }
    for &p in &distinct {
        let cap = Geometry::from_ring(&ellipse_ring(p, half_width, half_width, segments));
        acc = acc.union(&cap);
    }
    acc
}
