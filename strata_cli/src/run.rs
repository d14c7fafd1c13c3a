// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! One scene per SVG file: read, extract, resolve, build, export.

use std::path::{Path, PathBuf};

use strata_export::{
    CaptionTable, ExportError, NameCounter, SceneMetadata, SegmentContext, SegmentNames,
    build_document, order_by_name, write_document, write_segments,
};
use strata_region::extract_scene;
use strata_scene::{build_hierarchy, resolve_with_report};
use strata_svg::SvgError;
use thiserror::Error;

use crate::args::Args;

const CAPTIONS_FILE: &str = "response.json";
const METADATA_FILE: &str = "scene_metadata.json";

#[derive(Debug, Error)]
pub(crate) enum CliError {
    #[error("{path}: {source}")]
    Svg {
        path: PathBuf,
        #[source]
        source: SvgError,
    },
    #[error(transparent)]
    Export(#[from] ExportError),
    #[error("cannot list {path}: {source}")]
    ListDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("no .svg files in {0}")]
    NoScenes(PathBuf),
    #[error("{failed} of {total} scenes failed")]
    ScenesFailed { failed: usize, total: usize },
}

/// What one processed scene produced.
#[derive(Debug)]
pub(crate) struct SceneOutcome {
    pub(crate) hierarchy: PathBuf,
    pub(crate) nodes: usize,
    pub(crate) segments: usize,
}

/// Process the input file or every `.svg` file of the input directory.
pub(crate) fn run(args: &Args) -> Result<Vec<SceneOutcome>, CliError> {
    if !args.input.is_dir() {
        return Ok(vec![run_scene(args, &args.input)?]);
    }
    let files = svg_files(&args.input)?;
    if files.is_empty() {
        return Err(CliError::NoScenes(args.input.clone()));
    }
    let mut outcomes = Vec::with_capacity(files.len());
    let mut failed = 0;
    for file in &files {
        match run_scene(args, file) {
            Ok(outcome) => outcomes.push(outcome),
            Err(err) => {
                tracing::error!(file = %file.display(), %err, "scene failed");
                failed += 1;
            }
        }
    }
    if failed > 0 {
        return Err(CliError::ScenesFailed {
            failed,
            total: files.len(),
        });
    }
    Ok(outcomes)
}

fn svg_files(dir: &Path) -> Result<Vec<PathBuf>, CliError> {
    let list_err = |source| CliError::ListDir {
        path: dir.to_path_buf(),
        source,
    };
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(list_err)? {
        let path = entry.map_err(list_err)?.path();
        if path.is_file()
            && path
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("svg"))
        {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

fn scene_name(path: &Path) -> String {
    path.file_stem()
        .map_or_else(|| "scene".to_owned(), |s| s.to_string_lossy().into_owned())
}

/// `path` itself if it is a file, else `<path>/<scene>/<file>`.
fn side_path(path: Option<&Path>, scene: &str, file: &str) -> Option<PathBuf> {
    let path = path?;
    if path.is_dir() {
        Some(strata_export::side_file(path, scene, file))
    } else {
        Some(path.to_path_buf())
    }
}

fn load_captions(args: &Args, scene: &str) -> CaptionTable {
    let Some(path) = side_path(args.captions.as_deref(), scene, CAPTIONS_FILE) else {
        return CaptionTable::new();
    };
    CaptionTable::load(&path).unwrap_or_else(|err| {
        tracing::warn!(%err, "ignoring captions");
        CaptionTable::new()
    })
}

fn load_metadata(args: &Args, scene: &str) -> SceneMetadata {
    let Some(path) = side_path(args.metadata.as_deref(), scene, METADATA_FILE) else {
        return SceneMetadata::default();
    };
    SceneMetadata::load(&path).unwrap_or_else(|err| {
        tracing::warn!(%err, "ignoring scene metadata");
        SceneMetadata::default()
    })
}

fn run_scene(args: &Args, file: &Path) -> Result<SceneOutcome, CliError> {
    let scene = scene_name(file);
    let _span = tracing::info_span!("scene", name = %scene).entered();

    let svg = strata_svg::read_svg(file).map_err(|source| CliError::Svg {
        path: file.to_path_buf(),
        source,
    })?;
    let extracted = extract_scene(&svg.primitives, &svg.style, &args.extract_params());
    let report = resolve_with_report(&extracted.regions, &args.resolve_params());
    for dropped in &report.dropped {
        tracing::trace!(source_index = dropped.source_index, reason = ?dropped.reason, "dropped region");
    }

    let mut counter = NameCounter::new();
    let names = SegmentNames::assign(&scene, &report.visible, &mut counter);

    let mut segments = 0;
    if args.segments {
        let ctx = SegmentContext {
            root_attributes: &svg.root_attributes,
            stylesheet: &svg.stylesheet,
        };
        let dir = args.out.join(&scene);
        segments = write_segments(&dir, ctx, &svg.primitives, &report.visible, &names)?.len();
    }

    let forest = order_by_name(build_hierarchy(report.visible, args.policy()), &names);
    let captions = load_captions(args, &scene);
    let metadata = load_metadata(args, &scene);
    let doc = build_document(&forest, &scene, &names, &captions, &metadata);

    let hierarchy = args.out.join(format!("{scene}_hierarchy.json"));
    write_document(&hierarchy, &doc)?;
    tracing::info!(
        primitives = svg.primitives.len(),
        skipped = extracted.skipped.len(),
        dropped = report.dropped.len(),
        nodes = forest.len() - 1,
        segments,
        out = %hierarchy.display(),
        "scene done"
    );
    Ok(SceneOutcome {
        hierarchy,
        nodes: forest.len() - 1,
        segments,
    })
}
