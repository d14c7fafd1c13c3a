// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Property tests for primitive extraction.

use proptest::prelude::*;
use strata_region::{ExtractParams, Primitive, StyleContext, extract};

fn run(p: &Primitive) -> Result<strata_region::Region, strata_region::Skip> {
    extract(p, 0, &StyleContext::new(), &ExtractParams::default())
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]

    #[test]
    fn rects_keep_their_area(x in -50..50_i32, y in -50..50_i32, w in 1..60_i32, h in 1..60_i32) {
        let (x, y, w, h) = (f64::from(x), f64::from(y), f64::from(w), f64::from(h));
        let region = run(&Primitive::rect(x, y, w, h)).expect("positive rect extracts");
        prop_assert!(region.is_valid());
        prop_assert!((region.geometry.area() - w * h).abs() < 1e-6 * w * h);
    }

    #[test]
    fn circles_approximate_the_disk(cx in -50..50_i32, cy in -50..50_i32, r in 1..40_i32) {
        let r = f64::from(r);
        let region = run(&Primitive::circle(f64::from(cx), f64::from(cy), r))
            .expect("positive circle extracts");
        prop_assert!(region.is_valid());
        let disk = core::f64::consts::PI * r * r;
        let area = region.geometry.area();
        prop_assert!(area <= disk && area > 0.99 * disk, "area {} vs disk {}", area, disk);
    }

    #[test]
    fn polygons_are_valid_and_bounded(
        points in prop::collection::vec((0..40_i32, 0..40_i32), 0..8),
    ) {
        let points: Vec<(f64, f64)> = points
            .into_iter()
            .map(|(x, y)| (f64::from(x), f64::from(y)))
            .collect();
        // Self-intersecting or collinear input either repairs or is skipped.
        if let Ok(region) = run(&Primitive::polygon(&points)) {
            prop_assert!(region.is_valid());
            let area = region.geometry.area();
            prop_assert!(area > 0.0);
            prop_assert!(area <= 40.0 * 40.0 + 1e-6);
            let b = region.geometry.bounds().expect("non-empty region has bounds");
            prop_assert!(b.min_x >= -1e-6 && b.min_y >= -1e-6);
            prop_assert!(b.max_x <= 40.0 + 1e-6 && b.max_y <= 40.0 + 1e-6);
        }
    }
}
