// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! `strata`: turn layered SVG scenes into containment hierarchies.
//!
//! ```text
//! strata scene.svg --out out/
//! strata scenes/ --policy bbox --margin 3 --segments --captions captions/
//! ```
//!
//! Each scene yields `<out>/<scene>_hierarchy.json`; with `--segments`, every
//! visible region is also written to `<out>/<scene>/<scene>_element_<n>.svg`.

mod args;
mod run;

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::args::Args;

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    match run::run(&args) {
        Ok(outcomes) => {
            for outcome in &outcomes {
                println!(
                    "{}: {} regions, {} segments",
                    outcome.hierarchy.display(),
                    outcome.nodes,
                    outcome.segments
                );
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            tracing::error!("{err}");
            ExitCode::FAILURE
        }
    }
}
