// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use strata_region::ExtractParams;
use strata_scene::{ContainmentPolicy, ResolveParams};

#[derive(Parser, Debug)]
#[command(
    name = "strata",
    version,
    about = "Turn layered SVG scenes into containment hierarchies of visible regions"
)]
pub(crate) struct Args {
    /// An SVG file, or a directory whose `.svg` files are processed as separate scenes
    pub(crate) input: PathBuf,

    /// Directory receiving `<scene>_hierarchy.json` (and segments)
    #[arg(long, short, default_value = "out")]
    pub(crate) out: PathBuf,

    /// How parents are chosen
    #[arg(long, value_enum, default_value_t = PolicyArg::Strict)]
    pub(crate) policy: PolicyArg,

    /// Slack around candidate boxes for `--policy bbox`
    #[arg(long, default_value_t = ContainmentPolicy::DEFAULT_MARGIN)]
    pub(crate) margin: f64,

    /// Visible regions smaller than this are dropped
    #[arg(long, default_value_t = ResolveParams::default().min_area)]
    pub(crate) min_area: f64,

    /// Samples per curve segment when flattening paths
    #[arg(long, default_value_t = 100, value_parser = clap::value_parser!(u32).range(1..))]
    pub(crate) samples: u32,

    /// Caption file, or a directory holding `<scene>/response.json`
    #[arg(long)]
    pub(crate) captions: Option<PathBuf>,

    /// Metadata file, or a directory holding `<scene>/scene_metadata.json`
    #[arg(long)]
    pub(crate) metadata: Option<PathBuf>,

    /// Also write one SVG per visible region into `<out>/<scene>/`
    #[arg(long)]
    pub(crate) segments: bool,

    /// Log at debug level unless `RUST_LOG` says otherwise
    #[arg(long, short)]
    pub(crate) verbose: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub(crate) enum PolicyArg {
    /// Parent outline contains the child outline
    Strict,
    /// Containment first, then any intersecting larger region
    Intersects,
    /// Parent box plus margin contains the child box
    Bbox,
}

impl Args {
    pub(crate) fn policy(&self) -> ContainmentPolicy {
        match self.policy {
            PolicyArg::Strict => ContainmentPolicy::StrictPolygon,
            PolicyArg::Intersects => ContainmentPolicy::ContainsOrIntersects,
            PolicyArg::Bbox => ContainmentPolicy::BoundingBox {
                margin: self.margin,
            },
        }
    }

    pub(crate) fn extract_params(&self) -> ExtractParams {
        ExtractParams {
            samples_per_segment: self.samples as usize,
            ..ExtractParams::default()
        }
    }

    pub(crate) fn resolve_params(&self) -> ResolveParams {
        ResolveParams {
            min_area: self.min_area,
        }
    }
}
