// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Containment hierarchy: every region hangs off the smallest region that
//! encloses it.

use strata_index::{Aabb2D, Backend, Index};
use strata_region::Geometry;

use crate::forest::Forest;
use crate::visibility::VisibleRegion;

/// How candidate parents are judged.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub enum ContainmentPolicy {
    /// The parent's outline must contain the child's outline.
    #[default]
    StrictPolygon,
    /// Containing parents first; failing that, the smallest larger region
    /// whose outline intersects the child's.
    ContainsOrIntersects,
    /// The parent's box, grown by `margin` on every side, must contain the
    /// child's box.
    BoundingBox {
        /// Slack added around the candidate box.
        margin: f64,
    },
}

impl ContainmentPolicy {
    /// Margin used by [`ContainmentPolicy::bounding_box`].
    pub const DEFAULT_MARGIN: f64 = 5.0;

    /// Bounding-box policy with the default margin.
    pub const fn bounding_box() -> Self {
        Self::BoundingBox {
            margin: Self::DEFAULT_MARGIN,
        }
    }

    fn tiers(self) -> &'static [Tier] {
        match self {
            Self::StrictPolygon => &[Tier::Contains],
            Self::ContainsOrIntersects => &[Tier::Contains, Tier::Intersects],
            Self::BoundingBox { .. } => &[Tier::BoxContains],
        }
    }

    fn uses_polygons(self) -> bool {
        !matches!(self, Self::BoundingBox { .. })
    }

    fn margin(self) -> f64 {
        match self {
            Self::BoundingBox { margin } => margin,
            _ => 0.0,
        }
    }
}

/// One eligibility test. A policy is an ordered list of these; the first
/// tier with any eligible candidate decides.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Tier {
    Contains,
    Intersects,
    BoxContains,
}

/// What the builder knows about one region.
#[derive(Debug)]
struct Shape {
    source_index: usize,
    outline: Geometry,
    bounds: Aabb2D,
    measure: f64,
}

/// Above this many regions the broad phase switches to a uniform grid.
const GRID_THRESHOLD: usize = 64;

/// Build the containment forest of a set of visible regions.
///
/// Region `i` becomes node `i + 1`. Each node's parent is the eligible
/// candidate with the smallest measure (outline area for polygon policies,
/// box area for [`ContainmentPolicy::BoundingBox`]), where a candidate must
/// measure strictly more than the node itself. Equal measures go to the
/// candidate with the lowest `source_index`, so the result does not depend on
/// the order of `regions`. Nodes without a candidate hang off the root.
pub fn build_hierarchy(regions: Vec<VisibleRegion>, policy: ContainmentPolicy) -> Forest {
    let shapes: Vec<Option<Shape>> = regions.iter().map(|r| shape_of(r, policy)).collect();

    let parents = if regions.len() > GRID_THRESHOLD {
        let mut index = Index::with_grid(cell_size(&shapes));
        fill_index(&mut index, &shapes);
        assign_parents(&shapes, &index, policy)
    } else {
        let mut index = Index::new();
        fill_index(&mut index, &shapes);
        assign_parents(&shapes, &index, policy)
    };

    let attached = parents.iter().filter(|p| p.is_some()).count();
    tracing::debug!(
        regions = regions.len(),
        attached,
        top_level = regions.len() - attached,
        ?policy,
        "built hierarchy"
    );
    Forest::from_parents(regions, &parents)
}

fn shape_of(region: &VisibleRegion, policy: ContainmentPolicy) -> Option<Shape> {
    let bounds = region.bounds()?;
    let (outline, measure) = if policy.uses_polygons() {
        let outline = region.geometry.outline();
        let measure = outline.area();
        (outline, measure)
    } else {
        (Geometry::empty(), bounds.area())
    };
    Some(Shape {
        source_index: region.source_index,
        outline,
        bounds,
        measure,
    })
}

#[allow(
    clippy::cast_precision_loss,
    reason = "Region counts are far below 2^52."
)]
fn cell_size(shapes: &[Option<Shape>]) -> f64 {
    let (sum, n) = shapes
        .iter()
        .flatten()
        .map(|s| s.bounds.width().max(s.bounds.height()))
        .fold((0.0, 0_usize), |(sum, n), side| (sum + side, n + 1));
    if n == 0 {
        return 1.0;
    }
    (sum / n as f64).max(1.0)
}

fn fill_index<B: Backend>(index: &mut Index<usize, B>, shapes: &[Option<Shape>]) {
    index.reserve(shapes.len());
    for (i, shape) in shapes.iter().enumerate() {
        if let Some(shape) = shape {
            index.insert(shape.bounds, i);
        }
    }
}

fn assign_parents<B: Backend>(
    shapes: &[Option<Shape>],
    index: &Index<usize, B>,
    policy: ContainmentPolicy,
) -> Vec<Option<usize>> {
    let margin = policy.margin();
    shapes
        .iter()
        .enumerate()
        .map(|(i, shape)| {
            let shape = shape.as_ref()?;
            let probe = shape.bounds.inflate(margin);
            let candidates = index.query_rect(probe);
            policy.tiers().iter().find_map(|&tier| {
                candidates
                    .iter()
                    .map(|&(_, j)| j)
                    .filter(|&j| j != i)
                    .filter_map(|j| Some((j, shapes[j].as_ref()?)))
                    .filter(|(_, c)| c.measure > shape.measure)
                    .filter(|(_, c)| eligible(tier, c, shape, margin))
                    .min_by(|(_, a), (_, b)| {
                        a.measure
                            .total_cmp(&b.measure)
                            .then_with(|| a.source_index.cmp(&b.source_index))
                    })
                    .map(|(j, _)| j)
            })
        })
        .collect()
}

fn eligible(tier: Tier, candidate: &Shape, shape: &Shape, margin: f64) -> bool {
    match tier {
        Tier::Contains => candidate.outline.contains(&shape.outline),
        Tier::Intersects => candidate.outline.intersects(&shape.outline),
        Tier::BoxContains => candidate.bounds.inflate(margin).contains(&shape.bounds),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forest::NodeId;
    use strata_region::Region;

    fn visible(i: usize, g: Geometry) -> VisibleRegion {
        VisibleRegion::unoccluded(Region::new(i, g, None))
    }

    fn rect(i: usize, x0: f64, y0: f64, x1: f64, y1: f64) -> VisibleRegion {
        visible(i, Geometry::rect(x0, y0, x1, y1))
    }

    fn parents(f: &Forest) -> Vec<i64> {
        f.nodes().iter().skip(1).map(|n| n.parent_id()).collect()
    }

    #[test]
    fn nested_rectangles() {
        let regions = vec![
            rect(0, 0.0, 0.0, 100.0, 100.0),
            rect(1, 20.0, 20.0, 80.0, 80.0),
            rect(2, 40.0, 40.0, 60.0, 60.0),
        ];
        for policy in [
            ContainmentPolicy::StrictPolygon,
            ContainmentPolicy::ContainsOrIntersects,
            ContainmentPolicy::bounding_box(),
        ] {
            let f = build_hierarchy(regions.clone(), policy);
            assert_eq!(parents(&f), vec![0, 1, 2], "{policy:?}");
        }
    }

    #[test]
    fn holes_count_as_inside() {
        // A frame whose hole is filled by a second region.
        let frame = Geometry::rect(0.0, 0.0, 10.0, 10.0).difference(&Geometry::rect(2.0, 2.0, 8.0, 8.0));
        let regions = vec![visible(0, frame), rect(1, 2.0, 2.0, 8.0, 8.0)];
        let f = build_hierarchy(regions, ContainmentPolicy::StrictPolygon);
        assert_eq!(parents(&f), vec![0, 1]);
    }

    #[test]
    fn intersect_fallback_only_when_nothing_contains() {
        let regions = vec![
            rect(0, 0.0, 0.0, 10.0, 10.0),
            rect(1, 8.0, 0.0, 12.0, 4.0),
        ];
        let strict = build_hierarchy(regions.clone(), ContainmentPolicy::StrictPolygon);
        assert_eq!(parents(&strict), vec![0, 0]);
        let loose = build_hierarchy(regions, ContainmentPolicy::ContainsOrIntersects);
        assert_eq!(parents(&loose), vec![0, 1]);
    }

    #[test]
    fn box_margin_absorbs_overhang() {
        let regions = vec![rect(0, 0.0, 0.0, 50.0, 50.0), rect(1, 45.0, 10.0, 53.0, 20.0)];
        let f = build_hierarchy(regions.clone(), ContainmentPolicy::bounding_box());
        assert_eq!(parents(&f), vec![0, 1]);
        let tight = build_hierarchy(regions, ContainmentPolicy::BoundingBox { margin: 0.0 });
        assert_eq!(parents(&tight), vec![0, 0]);
    }

    #[test]
    fn equal_measures_go_to_the_lowest_source_index() {
        // Two same-size boxes that both contain the small one under the margin rule.
        let regions = vec![
            rect(0, 0.0, 0.0, 10.0, 10.0),
            rect(1, 2.0, 0.0, 12.0, 10.0),
            rect(2, 4.0, 4.0, 6.0, 6.0),
        ];
        let f = build_hierarchy(regions, ContainmentPolicy::BoundingBox { margin: 0.0 });
        assert_eq!(f.parent_of(NodeId::new(3)), Some(NodeId::new(1)));
        // Neither box is strictly larger than the other.
        assert_eq!(f.parent_of(NodeId::new(1)), Some(NodeId::ROOT));
        assert_eq!(f.parent_of(NodeId::new(2)), Some(NodeId::ROOT));
    }

    #[test]
    fn equal_measures_ignore_input_order() {
        let (a, b, c) = (
            rect(0, 0.0, 0.0, 10.0, 10.0),
            rect(1, 2.0, 0.0, 12.0, 10.0),
            rect(2, 4.0, 4.0, 6.0, 6.0),
        );
        let orders = [
            [&a, &b, &c],
            [&b, &a, &c],
            [&c, &b, &a],
            [&b, &c, &a],
            [&a, &c, &b],
            [&c, &a, &b],
        ];
        for order in orders {
            let regions: Vec<_> = order.into_iter().cloned().collect();
            let f = build_hierarchy(regions, ContainmentPolicy::BoundingBox { margin: 0.0 });
            let small = f
                .nodes()
                .iter()
                .find(|n| n.region().is_some_and(|r| r.source_index == 2))
                .expect("small box present");
            let parent = small
                .parent()
                .and_then(|p| f.node(p))
                .and_then(|p| p.region())
                .map(|r| r.source_index);
            assert_eq!(parent, Some(0), "lowest source index wins");
        }
    }

    #[test]
    fn grid_broad_phase_matches_flat() {
        // Enough regions to switch to the grid: a row of cells, each with a dot inside.
        let mut regions = Vec::new();
        for k in 0..40 {
            let x = f64::from(k) * 20.0;
            regions.push(rect(regions.len(), x, 0.0, x + 15.0, 15.0));
            regions.push(rect(regions.len(), x + 5.0, 5.0, x + 10.0, 10.0));
        }
        assert!(regions.len() > GRID_THRESHOLD);
        let f = build_hierarchy(regions, ContainmentPolicy::StrictPolygon);
        for k in 0..40_usize {
            let cell = NodeId::new(2 * k + 1);
            let dot = NodeId::new(2 * k + 2);
            assert_eq!(f.parent_of(cell), Some(NodeId::ROOT));
            assert_eq!(f.parent_of(dot), Some(cell), "dot {k}");
        }
    }

    #[test]
    fn empty_scene_is_root_only() {
        let f = build_hierarchy(Vec::new(), ContainmentPolicy::default());
        assert_eq!(f.len(), 1);
        assert_eq!(f.root().parent_id(), -1);
    }
}
