//! End-to-end tests for building the index and rendering documents.

mod common;

use std::collections::HashMap;
use std::sync::Arc;

use common::{sheet_png, write_sheet};
use sheetglyph_api::TextRange;
use sheetglyph_atlas::{
    DescriptorCache, FallbackSheets, GlyphCell, GlyphEngine, GlyphIndex, GlyphOptions,
    RenderModel, SheetSource, code_point,
};

fn options(exclude_transparent: bool) -> GlyphOptions {
    GlyphOptions {
        exclude_transparent,
        ..GlyphOptions::default()
    }
}

#[test]
fn test_every_entry_matches_its_cell() {
    let dir = tempfile::tempdir().unwrap();
    write_sheet(dir.path(), 0x41, |row, col| (row + col) % 3 == 0);
    write_sheet(&dir.path().join("assets"), 0xE0, |_, _| true);
    write_sheet(&dir.path().join("assets/deeper"), 0xFF, |row, _| row > 10);

    let (index, report) = GlyphIndex::build(Some(dir.path()), &options(true), &FallbackSheets::none());
    assert_eq!(report.sheets.len(), 3);
    assert!(!index.is_empty());
    for cell in index.cells() {
        assert_eq!(cell.code_point(), code_point(cell.sheet, cell.row, cell.col));
        assert_eq!(index.lookup(cell.code_point()), Some(cell));
    }
}

#[test]
fn test_rebuild_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    write_sheet(dir.path(), 0x41, |row, _| row % 2 == 0);
    write_sheet(&dir.path().join("a"), 0x41, |_, _| true);
    write_sheet(&dir.path().join("b/c"), 0xE1, |_, col| col == 7);

    for filter in [true, false] {
        let (first, _) = GlyphIndex::build(Some(dir.path()), &options(filter), &FallbackSheets::none());
        let (second, _) = GlyphIndex::build(Some(dir.path()), &options(filter), &FallbackSheets::none());
        assert_eq!(first, second);
    }
}

#[test]
fn test_filtering_controls_transparent_cells() {
    let dir = tempfile::tempdir().unwrap();
    write_sheet(dir.path(), 0x50, |row, col| row == 0 && col < 4);
    write_sheet(&dir.path().join("pkg"), 0x51, |_, _| false);

    let (filtered, _) = GlyphIndex::build(Some(dir.path()), &options(true), &FallbackSheets::none());
    assert_eq!(filtered.len(), 4);
    assert!(filtered.lookup(0x5004).is_none());
    assert!(filtered.cells().all(|c| !c.transparent));

    let (unfiltered, _) = GlyphIndex::build(Some(dir.path()), &options(false), &FallbackSheets::none());
    assert_eq!(unfiltered.len(), 512);
}

#[test]
fn test_shallower_duplicate_wins() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    // "aaa" sorts first, but its sheet sits one level deeper.
    write_sheet(&root.join("aaa/nested"), 0xE1, |_, _| true);
    let shallow = write_sheet(&root.join("zzz"), 0xE1, |row, _| row == 0);

    let (index, report) = GlyphIndex::build(Some(root), &options(true), &FallbackSheets::none());
    assert_eq!(index.sheet(0xE1).and_then(|s| s.path()), Some(shallow.as_path()));
    assert_eq!(index.len(), 16);
    assert_eq!(report.duplicates, 1);
}

#[test]
fn test_root_container_beats_nested_duplicate() {
    let dir = tempfile::tempdir().unwrap();
    let root_sheet = write_sheet(dir.path(), 0xE1, |_, _| true);
    write_sheet(&dir.path().join("a"), 0xE1, |_, _| true);

    let (index, _) = GlyphIndex::build(Some(dir.path()), &options(false), &FallbackSheets::none());
    assert_eq!(index.sheet(0xE1).and_then(|s| s.path()), Some(root_sheet.as_path()));
}

#[test]
fn test_single_opaque_cell_scenario() {
    let dir = tempfile::tempdir().unwrap();
    write_sheet(dir.path(), 0x41, |row, col| (row, col) == (0, 0));

    let (index, _) = GlyphIndex::build(Some(dir.path()), &options(true), &FallbackSheets::none());
    let entries: Vec<_> = index.cells().map(|c| (c.code_point(), c.sheet, c.row, c.col)).collect();
    assert_eq!(entries, vec![(0x4100, 0x41, 0, 0)]);
}

#[test]
fn test_fallback_sheet_renders_bmp_glyph() {
    let dir = tempfile::tempdir().unwrap();
    let fallback = FallbackSheets::none().with_bytes(0xE0, sheet_png(|_, _| true));
    let mut engine = GlyphEngine::new(Some(dir.path().to_path_buf()), fallback, GlyphOptions::default());

    let model = engine.render("\u{E050}");
    assert_eq!(model.len(), 1);
    let entry = &model.entries()[0];
    assert_eq!(entry.range, TextRange::new(0, 1));
    assert_eq!((entry.descriptor.sheet, entry.descriptor.row, entry.descriptor.col), (0xE0, 5, 0));
    assert!(entry.descriptor.image_uri.starts_with("data:image/png;base64,"));
}

#[test]
fn test_supplementary_code_points_take_two_units() {
    let source = SheetSource::Bundled {
        name: "glyph_E0.png".into(),
        bytes: sheet_png(|_, _| true).into(),
    };
    let cell = |row, col| GlyphCell {
        sheet: 0xE0,
        row,
        col,
        source: source.clone(),
        transparent: false,
    };
    let mut glyphs: HashMap<u32, GlyphCell> = HashMap::new();
    glyphs.insert(0x1F600, cell(0, 0));
    glyphs.insert(0xE001, cell(0, 1));

    let mut cache = DescriptorCache::new();
    let text = "x\u{1F600}\u{E001}\u{1F600}yz\u{1F601}";
    let model = RenderModel::compute(text, &glyphs, &mut cache, GlyphOptions::default().render_mode());
    let ranges: Vec<_> = model.entries().iter().map(|e| (e.range.start, e.range.len())).collect();
    assert_eq!(ranges, vec![(1, 2), (3, 1), (4, 2)]);

    let units: Vec<u16> = text.encode_utf16().collect();
    for entry in model.entries() {
        let slice = &units[entry.range.start..entry.range.end];
        let decoded: Vec<char> = char::decode_utf16(slice.iter().copied())
            .map(|r| r.expect("range splits a surrogate pair"))
            .collect();
        assert_eq!(decoded.len(), 1);
        assert_eq!(u32::from(decoded[0]), entry.code_point);
    }
}

#[test]
fn test_render_reuses_descriptors_until_options_change() {
    let dir = tempfile::tempdir().unwrap();
    write_sheet(dir.path(), 0xE0, |_, _| true);
    let mut engine = GlyphEngine::new(Some(dir.path().to_path_buf()), FallbackSheets::none(), GlyphOptions::default());

    let first = engine.render("\u{E000}");
    let second = engine.render("ab\u{E000}");
    assert!(Arc::ptr_eq(&first.entries()[0].descriptor, &second.entries()[0].descriptor));

    assert!(engine.set_options(GlyphOptions::default()).is_none());

    let reload = engine
        .set_options(GlyphOptions {
            hide_source_char: false,
            ..GlyphOptions::default()
        })
        .expect("options changed");
    assert_eq!(reload.released, vec![first.entries()[0].descriptor.id]);

    let third = engine.render("\u{E000}");
    assert!(!third.entries()[0].descriptor.mode.hide_source);
    assert_ne!(third.entries()[0].descriptor.id, first.entries()[0].descriptor.id);
}

#[test]
fn test_reload_picks_up_new_sheets() {
    let dir = tempfile::tempdir().unwrap();
    let mut engine = GlyphEngine::new(Some(dir.path().to_path_buf()), FallbackSheets::none(), GlyphOptions::default());
    assert!(engine.index().is_empty());

    write_sheet(&dir.path().join("docs"), 0x42, |row, col| row == col);
    let reload = engine.reload();
    assert_eq!(reload.report.code_points, 16);
    assert_eq!(engine.report().code_points, 16);
}

#[test]
fn test_find_sheet_uses_targeted_walk_and_fallback() {
    let dir = tempfile::tempdir().unwrap();
    // Fully transparent: registered, but contributes no code points.
    write_sheet(&dir.path().join("x"), 0x30, |_, _| false);
    let nested = write_sheet(&dir.path().join("x/y"), 0x31, |_, _| true);
    let fallback = FallbackSheets::none().with_bytes(0xE1, sheet_png(|_, _| true));
    let engine = GlyphEngine::new(Some(dir.path().to_path_buf()), fallback, GlyphOptions::default());

    assert!(engine.find_sheet(0x30).is_some());
    assert_eq!(engine.find_sheet(0x31).and_then(|s| s.path().map(|p| p.to_path_buf())), Some(nested));
    assert!(matches!(engine.find_sheet(0xE1), Some(SheetSource::Bundled { .. })));
    assert!(engine.find_sheet(0x99).is_none());
}
