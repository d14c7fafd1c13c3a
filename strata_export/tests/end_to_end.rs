// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! SVG text in, hierarchy JSON and segment files out.

use strata_export::{
    CaptionTable, HierarchyDocument, NameCounter, SceneMetadata, SegmentContext, SegmentNames,
    build_document, order_by_name, write_document, write_segments,
};
use strata_region::{ExtractParams, extract_scene};
use strata_scene::{ContainmentPolicy, ResolveParams, build_hierarchy, resolve_paint_order};
use tempfile::tempdir;

const CAT: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 100 100">
  <style>.body { fill: #123456 } .bg { fill: white }</style>
  <defs>
    <radialGradient id="eye"><stop offset="0" stop-color="black"/><stop offset="1" stop-color="red"/></radialGradient>
  </defs>
  <rect class="body" x="10" y="10" width="80" height="80"/>
  <circle cx="40" cy="40" r="5" fill="url(#eye)"/>
  <rect x="0" y="0" width="100" height="100" fill="blue" opacity="0.1"/>
  <rect x="95" y="95" width="4" height="4" fill="green"/>
</svg>"##;

#[test]
fn svg_to_hierarchy_json() {
    let tmp = tempdir().expect("temp dir");
    let dir = tmp.path();
    let svg = strata_svg::parse_svg(CAT).expect("valid svg");
    let scene = extract_scene(&svg.primitives, &svg.style, &ExtractParams::default());
    assert_eq!(scene.regions.len(), 3, "translucent overlay is skipped");

    let visible = resolve_paint_order(&scene.regions, &ResolveParams::default());
    let mut counter = NameCounter::new();
    let names = SegmentNames::assign("cat", &visible, &mut counter);
    assert_eq!(counter.issued("element"), 3);

    let captions_path = dir.join("response.json");
    std::fs::write(
        &captions_path,
        r#"[{"id": "cat_element_2.png", "description": "an eye"}]"#,
    )
    .expect("write captions");
    let captions = CaptionTable::load(&captions_path).expect("captions parse");
    let metadata = SceneMetadata::load(&dir.join("missing.json")).expect("missing is fine");

    let forest = order_by_name(build_hierarchy(visible, ContainmentPolicy::default()), &names);
    let doc = build_document(&forest, "cat", &names, &captions, &metadata);

    let out = dir.join("out").join("cat_hierarchy.json");
    write_document(&out, &doc).expect("write json");
    let text = std::fs::read_to_string(&out).expect("read back");
    let back: HierarchyDocument = serde_json::from_str(&text).expect("valid json");
    assert_eq!(back, doc);

    let by_name = |name: &str| {
        back.scene
            .iter()
            .find(|r| r.filename == name)
            .unwrap_or_else(|| panic!("{name} missing"))
    };
    assert_eq!(back.scene[0].filename, "Full cat");
    assert_eq!(back.scene[0].description.as_deref(), Some(""));

    let body = by_name("cat_element_1.svg");
    assert_eq!(body.parent, 0);
    assert_eq!(body.color.as_deref(), Some("rgba(18, 52, 86, 1.0)"));

    let eye = by_name("cat_element_2.svg");
    assert_eq!(eye.parent, i64::from(body.id));
    assert_eq!(eye.color.as_deref(), Some("rgba(255, 0, 0, 1.0)"));
    assert_eq!(eye.description.as_deref(), Some("an eye"));
    assert_eq!(eye.mask_path.as_deref(), Some("cat_element_2.png"));

    let corner = by_name("cat_element_3.svg");
    assert_eq!(corner.parent, 0);
    assert_eq!(corner.description, None);
}

#[test]
fn segments_are_written_per_region() {
    let tmp = tempdir().expect("temp dir");
    let dir = tmp.path().join("segments");
    let svg = strata_svg::parse_svg(CAT).expect("valid svg");
    let scene = extract_scene(&svg.primitives, &svg.style, &ExtractParams::default());
    let visible = resolve_paint_order(&scene.regions, &ResolveParams::default());
    let names = SegmentNames::assign("cat", &visible, &mut NameCounter::new());

    let ctx = SegmentContext {
        root_attributes: &svg.root_attributes,
        stylesheet: &svg.stylesheet,
    };
    let written = write_segments(&dir, ctx, &svg.primitives, &visible, &names).expect("write");
    assert_eq!(written.len(), visible.len());

    let body = std::fs::read_to_string(dir.join("cat_element_1.svg")).expect("segment exists");
    assert!(body.contains("id=\"element_1\""));
    assert!(body.contains("class=\"body\""));
    assert!(body.contains(".body { fill: #123456 }"));
    let reparsed = strata_svg::parse_svg(&body).expect("segment is valid svg");
    assert_eq!(reparsed.primitives.len(), 1);
    assert_eq!(reparsed.primitives[0].kind().tag(), "path");
}
