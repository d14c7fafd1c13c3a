// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Paint-order occlusion: what is left of each region once everything drawn
//! above it has been subtracted.

use strata_index::Aabb2D;
use strata_region::{Geometry, Region, Rgba};

/// Tunables for [`resolve_paint_order`].
#[derive(Clone, Debug, PartialEq)]
pub struct ResolveParams {
    /// Residuals with less area than this are dropped.
    pub min_area: f64,
}

impl Default for ResolveParams {
    fn default() -> Self {
        Self { min_area: 1e-3 }
    }
}

/// The part of a region that remains visible.
#[derive(Clone, Debug, PartialEq)]
pub struct VisibleRegion {
    /// Position of the originating primitive in paint order.
    pub source_index: usize,
    /// Visible geometry; may be split into several parts.
    pub geometry: Geometry,
    /// Fill carried over from the region.
    pub fill: Option<Rgba>,
    /// Area before occlusion.
    pub original_area: f64,
}

impl VisibleRegion {
    /// A region with nothing painted over it.
    pub fn unoccluded(region: Region) -> Self {
        let original_area = region.geometry.area();
        Self {
            source_index: region.source_index,
            geometry: region.geometry,
            fill: region.fill,
            original_area,
        }
    }

    /// Visible area.
    pub fn area(&self) -> f64 {
        self.geometry.area()
    }

    /// Bounds of the visible geometry.
    pub fn bounds(&self) -> Option<Aabb2D> {
        self.geometry.bounds()
    }
}

/// Why a region did not survive resolution.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DropReason {
    /// Regions painted above cover it entirely.
    Occluded,
    /// Invalid geometry, or a residual smaller than the minimum area.
    Degenerate,
}

/// A region that did not survive resolution.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Dropped {
    /// Position of the originating primitive in paint order.
    pub source_index: usize,
    /// The reason.
    pub reason: DropReason,
}

/// Full outcome of a resolution pass.
#[derive(Clone, Debug, Default)]
pub struct ResolveReport {
    /// Surviving regions, in input order.
    pub visible: Vec<VisibleRegion>,
    /// Dropped regions, in input order.
    pub dropped: Vec<Dropped>,
}

/// Resolve occlusion for regions given back-to-front.
///
/// See [`resolve_with_report`] for the variant that also says what was dropped.
pub fn resolve_paint_order(regions: &[Region], params: &ResolveParams) -> Vec<VisibleRegion> {
    resolve_with_report(regions, params).visible
}

/// Resolve occlusion and report dropped regions.
///
/// Regions are walked front to back while a running union of everything seen
/// so far serves as the occluder of the next one, so the pass does one
/// difference and one union per region. Occluders are the original
/// geometries, not the residuals.
pub fn resolve_with_report(regions: &[Region], params: &ResolveParams) -> ResolveReport {
    let mut occluders = Geometry::empty();
    let mut occluder_bounds: Option<Aabb2D> = None;
    let mut visible = Vec::with_capacity(regions.len());
    let mut dropped = Vec::new();

    for region in regions.iter().rev() {
        let bounds = region.geometry.bounds();
        let valid = region.is_valid();
        let outcome = if valid {
            peel(region, &occluders, occluder_bounds, bounds, params)
        } else {
            Err(DropReason::Degenerate)
        };
        match outcome {
            Ok(v) => visible.push(v),
            Err(reason) => {
                tracing::trace!(source_index = region.source_index, ?reason, "dropping region");
                dropped.push(Dropped {
                    source_index: region.source_index,
                    reason,
                });
            }
        }
        if valid {
            occluders = occluders.union(&region.geometry);
            occluder_bounds = match (occluder_bounds, bounds) {
                (Some(a), Some(b)) => Some(Aabb2D::new(
                    a.min_x.min(b.min_x),
                    a.min_y.min(b.min_y),
                    a.max_x.max(b.max_x),
                    a.max_y.max(b.max_y),
                )),
                (a, b) => a.or(b),
            };
        }
    }

    visible.reverse();
    dropped.reverse();
    tracing::debug!(
        visible = visible.len(),
        dropped = dropped.len(),
        "resolved paint order"
    );
    ResolveReport { visible, dropped }
}

/// Share of the original area under which a residual counts as fully covered.
const COVERED_EPSILON: f64 = 1e-9;

fn peel(
    region: &Region,
    occluders: &Geometry,
    occluder_bounds: Option<Aabb2D>,
    bounds: Option<Aabb2D>,
    params: &ResolveParams,
) -> Result<VisibleRegion, DropReason> {
    let original_area = region.geometry.area();
    let touched = matches!((occluder_bounds, bounds), (Some(o), Some(b)) if o.overlaps(&b));
    let geometry = if touched {
        region.geometry.difference(occluders)
    } else {
        region.geometry.clone()
    };
    let area = geometry.area();
    if touched && (geometry.is_empty() || area <= COVERED_EPSILON * original_area) {
        return Err(DropReason::Occluded);
    }
    if area < params.min_area {
        return Err(DropReason::Degenerate);
    }
    Ok(VisibleRegion {
        source_index: region.source_index,
        geometry,
        fill: region.fill,
        original_area,
    })
}
