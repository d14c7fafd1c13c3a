// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Property tests for occlusion and containment.

use proptest::prelude::*;
use strata_region::{Geometry, Region};
use strata_scene::{
    ContainmentPolicy, NodeId, ResolveParams, build_hierarchy, resolve_paint_order,
    resolve_with_report,
};

fn rect_strategy() -> impl Strategy<Value = (i32, i32, i32, i32)> {
    (0..80_i32, 0..80_i32, 1..40_i32, 1..40_i32)
}

fn regions_from(rects: &[(i32, i32, i32, i32)]) -> Vec<Region> {
    rects
        .iter()
        .enumerate()
        .map(|(i, &(x, y, w, h))| {
            let (x, y, w, h) = (f64::from(x), f64::from(y), f64::from(w), f64::from(h));
            Region::new(i, Geometry::rect(x, y, x + w, y + h), None)
        })
        .collect()
}

fn policy_strategy() -> impl Strategy<Value = ContainmentPolicy> {
    prop_oneof![
        Just(ContainmentPolicy::StrictPolygon),
        Just(ContainmentPolicy::ContainsOrIntersects),
        (0..10_i32).prop_map(|m| ContainmentPolicy::BoundingBox {
            margin: f64::from(m)
        }),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]

    #[test]
    fn visible_area_never_grows(rects in prop::collection::vec(rect_strategy(), 0..10)) {
        let regions = regions_from(&rects);
        let report = resolve_with_report(&regions, &ResolveParams::default());
        prop_assert_eq!(report.visible.len() + report.dropped.len(), regions.len());

        let mut last = None;
        for v in &report.visible {
            prop_assert!(last < Some(v.source_index), "paint order preserved");
            last = Some(v.source_index);
            prop_assert!(v.area() > 0.0);
            prop_assert!(v.area() <= v.original_area + 1e-6);
            prop_assert!(v.geometry.is_valid());
        }
    }

    #[test]
    fn resolving_is_deterministic_and_idempotent(
        rects in prop::collection::vec(rect_strategy(), 0..10),
    ) {
        let regions = regions_from(&rects);
        let params = ResolveParams::default();
        let once = resolve_paint_order(&regions, &params);
        prop_assert_eq!(&resolve_paint_order(&regions, &params), &once);

        let again: Vec<Region> = once
            .iter()
            .map(|v| Region::new(v.source_index, v.geometry.clone(), v.fill))
            .collect();
        let twice = resolve_paint_order(&again, &params);
        prop_assert_eq!(twice.len(), once.len());
        for (a, b) in once.iter().zip(&twice) {
            prop_assert_eq!(a.source_index, b.source_index);
            prop_assert!(
                (a.area() - b.area()).abs() <= 1e-6 * a.area().max(1.0),
                "area of {} changed from {} to {}",
                a.source_index,
                a.area(),
                b.area()
            );
        }
    }

    #[test]
    fn disjoint_regions_are_untouched(
        cells in prop::collection::vec((0..8_i32, 0..8_i32, 1..9_i32, 1..9_i32), 0..12),
    ) {
        // One region per 10x10 grid cell, each strictly inside its cell.
        let mut seen = std::collections::HashSet::new();
        let rects: Vec<_> = cells
            .into_iter()
            .filter(|&(cx, cy, _, _)| seen.insert((cx, cy)))
            .map(|(cx, cy, w, h)| (cx * 10, cy * 10, w, h))
            .collect();
        let regions = regions_from(&rects);
        let visible = resolve_paint_order(&regions, &ResolveParams::default());
        prop_assert_eq!(visible.len(), regions.len());
        for (v, r) in visible.iter().zip(&regions) {
            prop_assert!((v.area() - r.geometry.area()).abs() < 1e-6);
        }
    }

    #[test]
    fn exact_cover_drops_the_lower_region(
        rects in prop::collection::vec(rect_strategy(), 1..6),
        pick in any::<prop::sample::Index>(),
    ) {
        let mut regions = regions_from(&rects);
        let victim = pick.index(regions.len());
        let cover = Region::new(regions.len(), regions[victim].geometry.clone(), None);
        regions.push(cover);
        let visible = resolve_paint_order(&regions, &ResolveParams::default());
        prop_assert!(visible.iter().all(|v| v.source_index != victim));
        prop_assert_eq!(visible.last().map(|v| v.source_index), Some(regions.len() - 1));
    }

    #[test]
    fn parents_are_eligible_and_larger(
        rects in prop::collection::vec(rect_strategy(), 0..10),
        policy in policy_strategy(),
    ) {
        let regions = regions_from(&rects);
        let visible = resolve_paint_order(&regions, &ResolveParams::default());
        let n = visible.len();
        let forest = build_hierarchy(visible, policy);
        prop_assert_eq!(forest.len(), n + 1);
        prop_assert_eq!(forest.depth_first().count(), n + 1, "every node reachable once");

        for node in forest.nodes().iter().skip(1) {
            let parent = node.parent().expect("non-root nodes have a parent");
            if parent == NodeId::ROOT {
                continue;
            }
            let child = node.region().expect("non-root nodes own a region");
            let up = forest.node(parent).and_then(|p| p.region()).expect("parent region");
            match policy {
                ContainmentPolicy::BoundingBox { margin } => {
                    let (cb, pb) = (child.bounds().expect("bounds"), up.bounds().expect("bounds"));
                    prop_assert!(pb.inflate(margin).contains(&cb));
                    prop_assert!(pb.area() > cb.area());
                }
                ContainmentPolicy::StrictPolygon | ContainmentPolicy::ContainsOrIntersects => {
                    let (co, po) = (child.geometry.outline(), up.geometry.outline());
                    let ok = po.contains(&co)
                        || (policy == ContainmentPolicy::ContainsOrIntersects && po.intersects(&co));
                    prop_assert!(ok);
                    prop_assert!(po.area() > co.area());
                }
            }
        }
    }
}
