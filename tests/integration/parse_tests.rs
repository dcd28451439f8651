//! Document-level parse failures surfaced through the public API.

use tempfile::TempDir;

use axio_montage::{
    parse_document, ImageFileReader, ImportConfig, LumaConverter, MontageImporter, ParseError,
    TagRegistry,
};

use super::test_utils::{meta_xml, write_montage};

fn run_preflight(xml: &str) -> i32 {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken_meta.xml");
    std::fs::write(&path, xml).unwrap();

    MontageImporter::new(ImportConfig::new(&path), ImageFileReader, LumaConverter)
        .preflight()
        .unwrap_err()
        .code()
}

#[test]
fn test_malformed_xml() {
    assert_eq!(run_preflight("<ROOT><Tags></ROOT>"), -70000);
}

#[test]
fn test_not_an_axiovision_document() {
    assert_eq!(run_preflight("<svg><rect/></svg>"), -70001);
}

#[test]
fn test_declared_tile_absent() {
    // Global section declares 3 tiles but the document only carries 2
    let mut xml = meta_xml("Mosaic.png", &[(0, 0), (1000, 0), (2000, 0)], 2, 2);
    let start = xml.find("<p2>").unwrap();
    let end = xml.find("</p2>").unwrap() + "</p2>".len();
    xml.replace_range(start..end, "");

    assert_eq!(run_preflight(&xml), -70002);
}

#[test]
fn test_huge_declared_count_is_a_parse_error() {
    // Billions of declared images, zero tile elements: the run must come
    // back with the missing-tile parse error, not allocate for the count
    let xml = "<ROOT><Tags><Count>2</Count>\
               <I0>517</I0><V0>2100000000</V0>\
               <I1>1025</I1><V1>Mosaic.png</V1></Tags></ROOT>";
    assert_eq!(run_preflight(xml), -70002);
}

#[test]
fn test_missing_mandatory_global_tag() {
    // No ImageCountRaw in the root section
    let xml = "<ROOT><Tags><Count>1</Count><I0>1025</I0><V0>Mosaic.png</V0></Tags></ROOT>";
    assert_eq!(run_preflight(xml), -70010);
}

#[test]
fn test_missing_input_file() {
    let err = MontageImporter::new(
        ImportConfig::new("/no/such/place_meta.xml"),
        ImageFileReader,
        LumaConverter,
    )
    .preflight()
    .unwrap_err();
    assert_eq!(err.code(), -388);
}

#[test]
fn test_unset_input_file() {
    let err = MontageImporter::new(ImportConfig::new(""), ImageFileReader, LumaConverter)
        .preflight()
        .unwrap_err();
    assert_eq!(err.code(), -387);
}

#[test]
fn test_padding_switches_at_ten_tiles() {
    // 10 tiles use two-digit element names (p00..p09) and derived filenames
    let starts: Vec<(i32, i32)> = (0..10).map(|i| (i * 1000, 0)).collect();
    let dir = TempDir::new().unwrap();
    let xml = write_montage(dir.path(), "Mosaic.png", &starts, 2, 2);

    let outcome = MontageImporter::new(ImportConfig::new(&xml), ImageFileReader, LumaConverter)
        .preflight()
        .unwrap();
    assert_eq!(outcome.report.column_count, 10);
    assert!(outcome.report.filenames[0].ends_with("Mosaic_p00.png"));
    assert!(outcome.report.filenames[9].ends_with("Mosaic_p09.png"));
}

#[test]
fn test_parse_document_resolves_tile_paths() {
    let xml = meta_xml("Scan.png", &[(0, 0)], 8, 8);
    let plan = parse_document(&xml, &TagRegistry::axio_vision(), std::path::Path::new("/data"))
        .unwrap();

    assert_eq!(plan.tiles[0].filename, std::path::PathBuf::from("/data/Scan_p0.png"));
    assert_eq!(plan.tiles[0].array_name, "Scan_p0");
}

#[test]
fn test_tile_section_error_names_the_tile() {
    // Break tile p1's Count element
    let xml = meta_xml("Mosaic.png", &[(0, 0), (1000, 0)], 2, 2);
    let xml = xml.replacen("<p1><Tags><Count>7</Count>", "<p1><Tags><Count>x</Count>", 1);

    let err = parse_document(
        &xml,
        &TagRegistry::axio_vision(),
        std::path::Path::new("/data"),
    )
    .unwrap_err();
    match err {
        ParseError::TileSection { tag, .. } => assert_eq!(tag, "p1"),
        other => panic!("expected TileSection, got {other:?}"),
    }
}
