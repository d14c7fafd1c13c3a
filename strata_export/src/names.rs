// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Generated segment names and their classification.

use hashbrown::HashMap;
use strata_scene::VisibleRegion;

/// Hands out `base_1`, `base_2`, … per base name.
///
/// Threaded explicitly through whoever generates names, so two scenes never
/// share numbering by accident.
#[derive(Clone, Debug, Default)]
pub struct NameCounter {
    counts: HashMap<String, u32>,
}

impl NameCounter {
    /// A counter with nothing issued.
    pub fn new() -> Self {
        Self::default()
    }

    /// The next name for `base`.
    ///
    /// ```
    /// use strata_export::NameCounter;
    ///
    /// let mut names = NameCounter::new();
    /// assert_eq!(names.next("element"), "element_1");
    /// assert_eq!(names.next("element"), "element_2");
    /// assert_eq!(names.next("group"), "group_1");
    /// ```
    pub fn next(&mut self, base: &str) -> String {
        let n = self.counts.entry_ref(base).or_insert(0);
        *n += 1;
        format!("{base}_{n}")
    }

    /// How many names were issued for `base`.
    pub fn issued(&self, base: &str) -> u32 {
        self.counts.get(base).copied().unwrap_or(0)
    }
}

/// What a segment file name says about where the segment came from.
///
/// Ordering puts authored layers first, then generated elements, then
/// anything unrecognized; within a class the number decides.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SegmentName {
    /// `Layer 3`, `Layer_3`, `Layer3`.
    Layer(u32),
    /// `…_element_7…`.
    Element(u32),
    /// No recognized pattern.
    Other,
}

impl SegmentName {
    /// Classify a file name or stem.
    ///
    /// ```
    /// use strata_export::SegmentName;
    ///
    /// assert_eq!(SegmentName::classify("cat_element_12.svg"), SegmentName::Element(12));
    /// assert_eq!(SegmentName::classify("Layer 2.png"), SegmentName::Layer(2));
    /// assert_eq!(SegmentName::classify("notes.txt"), SegmentName::Other);
    /// ```
    pub fn classify(name: &str) -> Self {
        if let Some(n) = number_after(name, "_element_") {
            return Self::Element(n);
        }
        if let Some(n) = layer_number(name) {
            return Self::Layer(n);
        }
        Self::Other
    }

    /// The number carried by the name, if any.
    pub fn index(self) -> Option<u32> {
        match self {
            Self::Layer(n) | Self::Element(n) => Some(n),
            Self::Other => None,
        }
    }
}

fn leading_number(s: &str) -> Option<u32> {
    let end = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    s[..end].parse().ok()
}

fn number_after(name: &str, marker: &str) -> Option<u32> {
    name.match_indices(marker)
        .find_map(|(at, _)| leading_number(&name[at + marker.len()..]))
}

fn layer_number(name: &str) -> Option<u32> {
    name.match_indices("Layer").find_map(|(at, _)| {
        let rest = &name[at + "Layer".len()..];
        let rest = rest
            .strip_prefix('_')
            .or_else(|| rest.strip_prefix(' '))
            .unwrap_or(rest);
        leading_number(rest)
    })
}

/// File-system-safe form of `name`.
pub fn sanitize_file_name(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*' => '_',
            c => c,
        })
        .collect()
}

/// Segment file names keyed by the source index of their region.
#[derive(Clone, Debug, Default)]
pub struct SegmentNames {
    by_source: HashMap<usize, String>,
}

impl SegmentNames {
    /// Name every region `<scene>_element_<n>.svg`, numbering in slice order.
    pub fn assign(scene: &str, regions: &[VisibleRegion], counter: &mut NameCounter) -> Self {
        let by_source = regions
            .iter()
            .map(|r| {
                let stem = format!("{scene}_{}", counter.next("element"));
                (r.source_index, sanitize_file_name(&format!("{stem}.svg")))
            })
            .collect();
        Self { by_source }
    }

    /// Record a name explicitly.
    pub fn insert(&mut self, source_index: usize, name: impl Into<String>) {
        self.by_source.insert(source_index, name.into());
    }

    /// The file name of the region with `source_index`.
    pub fn get(&self, source_index: usize) -> Option<&str> {
        self.by_source.get(&source_index).map(String::as_str)
    }

    /// Classification of the region's name; unnamed regions are [`SegmentName::Other`].
    pub fn classify(&self, source_index: usize) -> SegmentName {
        self.get(source_index)
            .map_or(SegmentName::Other, SegmentName::classify)
    }

    /// Number of named regions.
    pub fn len(&self) -> usize {
        self.by_source.len()
    }

    /// Whether no region is named.
    pub fn is_empty(&self) -> bool {
        self.by_source.is_empty()
    }
}
