// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The serialized hierarchy document and the side files that feed it.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write as _};
use std::path::{Path, PathBuf};

use hashbrown::HashMap;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use strata_scene::{Forest, NodeId};

use crate::error::{ExportError, Result};
use crate::names::{SegmentName, SegmentNames};

/// One row of the exported scene.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SceneRecord {
    /// Node id; `0` is the whole scene.
    pub id: u32,
    /// Segment file name, or `Full <scene>` for the root.
    pub filename: String,
    /// Parent id; `-1` for the root.
    pub parent: i64,
    /// Mask file the caption was written for.
    #[serde(default)]
    pub mask_path: Option<String>,
    /// Caption text.
    #[serde(default)]
    pub description: Option<String>,
    /// Fill as `rgba(r, g, b, a)`.
    #[serde(default)]
    pub color: Option<String>,
}

/// The exported tree: scene-wide style plus one record per node.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct HierarchyDocument {
    /// Scene-wide style text from the metadata file.
    #[serde(default)]
    pub global_style: String,
    /// Root first, then nodes in id order.
    pub scene: Vec<SceneRecord>,
}

/// Scene-wide metadata read from `scene_metadata.json`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneMetadata {
    /// Style description applied to the whole scene.
    #[serde(default)]
    pub global_style: String,
    /// Description of the whole scene.
    #[serde(default)]
    pub description: String,
}

impl SceneMetadata {
    /// Read metadata; a missing file yields the default.
    pub fn load(path: &Path) -> Result<Self> {
        Ok(read_json_if_exists(path)?.unwrap_or_default())
    }
}

/// One entry of a caption file.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CaptionEntry {
    /// Mask or segment file name the caption belongs to.
    #[serde(default)]
    pub id: Option<String>,
    /// Same as `id` in newer files; preferred when present.
    #[serde(default)]
    pub mask_path: Option<String>,
    /// Caption text.
    #[serde(default)]
    pub description: Option<String>,
}

/// A resolved caption.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Caption {
    /// File the caption was written for.
    pub mask_path: String,
    /// Caption text.
    pub description: Option<String>,
}

/// Captions indexed by file name and by name classification.
///
/// Lookups try the exact segment file name first, then any caption whose
/// file carries the same layer or element number (mask files are often
/// `.png` siblings of the `.svg` segments).
#[derive(Clone, Debug, Default)]
pub struct CaptionTable {
    by_name: HashMap<String, Caption>,
    by_segment: HashMap<SegmentName, Caption>,
}

impl CaptionTable {
    /// An empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from caption entries. Entries without a file name are ignored;
    /// later entries win.
    pub fn from_entries(entries: impl IntoIterator<Item = CaptionEntry>) -> Self {
        let mut table = Self::new();
        for entry in entries {
            let Some(name) = entry.mask_path.or(entry.id) else {
                continue;
            };
            let caption = Caption {
                mask_path: name.clone(),
                description: entry.description,
            };
            let class = SegmentName::classify(&name);
            if class != SegmentName::Other {
                table.by_segment.insert(class, caption.clone());
            }
            table.by_name.insert(name, caption);
        }
        table
    }

    /// Read a caption file (a JSON array of [`CaptionEntry`]); a missing file
    /// yields an empty table.
    pub fn load(path: &Path) -> Result<Self> {
        let entries: Vec<CaptionEntry> = read_json_if_exists(path)?.unwrap_or_default();
        Ok(Self::from_entries(entries))
    }

    /// Caption for a segment file name.
    pub fn lookup(&self, file_name: &str) -> Option<&Caption> {
        self.by_name.get(file_name).or_else(|| {
            match SegmentName::classify(file_name) {
                SegmentName::Other => None,
                class => self.by_segment.get(&class),
            }
        })
    }

    /// Number of captions.
    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    /// Whether there are no captions.
    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

/// Renumber a forest so layers come first, then elements by number.
///
/// Regions whose names do not classify keep their relative paint order and
/// go last.
pub fn order_by_name(forest: Forest, names: &SegmentNames) -> Forest {
    forest.renumbered_by(|r| names.classify(r.source_index))
}

/// Build the exported document of a (renumbered) forest.
pub fn build_document(
    forest: &Forest,
    scene: &str,
    names: &SegmentNames,
    captions: &CaptionTable,
    metadata: &SceneMetadata,
) -> HierarchyDocument {
    let mut records = Vec::with_capacity(forest.len());
    records.push(SceneRecord {
        id: NodeId::ROOT.get(),
        filename: format!("Full {scene}"),
        parent: -1,
        mask_path: None,
        description: Some(metadata.description.clone()),
        color: None,
    });
    for node in forest.nodes().iter().skip(1) {
        let Some(region) = node.region() else {
            continue;
        };
        let filename = names
            .get(region.source_index)
            .map_or_else(|| format!("{scene}_source_{}", region.source_index), str::to_owned);
        let caption = captions.lookup(&filename);
        records.push(SceneRecord {
            id: node.id().get(),
            filename,
            parent: node.parent_id(),
            mask_path: caption.map(|c| c.mask_path.clone()),
            description: caption.and_then(|c| c.description.clone()),
            color: region.fill.map(|c| c.to_string()),
        });
    }
    let captioned = records.iter().filter(|r| r.mask_path.is_some()).count();
    tracing::debug!(scene, records = records.len(), captioned, "built hierarchy document");
    HierarchyDocument {
        global_style: metadata.global_style.clone(),
        scene: records,
    }
}

/// Write a document as pretty-printed JSON, creating parent directories.
pub fn write_document(path: &Path, doc: &HierarchyDocument) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| ExportError::io(parent, e))?;
    }
    let file = File::create(path).map_err(|e| ExportError::io(path, e))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, doc).map_err(|e| ExportError::json(path, e))?;
    writer.write_all(b"\n").map_err(|e| ExportError::io(path, e))?;
    writer.flush().map_err(|e| ExportError::io(path, e))?;
    Ok(())
}

fn read_json_if_exists<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    let file = match File::open(path) {
        Ok(f) => f,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "side file not found");
            return Ok(None);
        }
        Err(e) => return Err(ExportError::io(path, e)),
    };
    serde_json::from_reader(BufReader::new(file))
        .map(Some)
        .map_err(|e| ExportError::json(path, e))
}

/// Conventional location of a side file for `scene` under `dir`.
pub fn side_file(dir: &Path, scene: &str, file: &str) -> PathBuf {
    dir.join(scene).join(file)
}
