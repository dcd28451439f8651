//! End-to-end import runs over montages written to disk.

use tempfile::TempDir;

use axio_montage::{
    ImageFileReader, ImportConfig, LumaConverter, MetaColumn, MontageImporter,
};

use super::test_utils::{tile_color, tile_filename, write_montage};

const STARTS_2X2: [(i32, i32); 4] = [(0, 0), (1000, 0), (0, 1000), (1000, 1000)];

fn importer(config: ImportConfig) -> MontageImporter<ImageFileReader, LumaConverter> {
    MontageImporter::new(config, ImageFileReader, LumaConverter)
}

#[test]
fn test_execute_two_by_two_montage() {
    let dir = TempDir::new().unwrap();
    let xml = write_montage(dir.path(), "Mosaic.png", &STARTS_2X2, 4, 2);

    let outcome = importer(ImportConfig::new(&xml)).execute().unwrap();
    let report = &outcome.report;

    assert_eq!(report.image_count, 4);
    assert_eq!((report.row_count, report.column_count), (2, 2));
    assert_eq!((report.tile_width, report.tile_height), (4, 2));
    assert!(!report.from_cache);

    // Tile pixel arrays carry the decoded solid fills
    let tiles = outcome.container.matrix("Tile AttributeMatrix").unwrap();
    assert_eq!(tiles.tuple_dims(), &[4, 2, 1]);
    for p in 0..4 {
        let name = format!("Mosaic_p{p}");
        match tiles.get_array(&name).unwrap() {
            MetaColumn::UInt8 { data, components } => {
                assert_eq!(*components, 3);
                assert_eq!(data.len(), 4 * 2 * 3);
                let expected = tile_color(p).0;
                assert_eq!(&data[0..3], &expected);
            }
            other => panic!("expected UInt8 array for {name}, got {other:?}"),
        }
    }

    // Metadata columns align positionally with tile order
    let meta = outcome
        .container
        .matrix("Tile AttributeMatrix MetaData")
        .unwrap();
    match meta.get_array("ImagePositionX").unwrap() {
        MetaColumn::Int32(values) => assert_eq!(values, &vec![0, 1000, 0, 1000]),
        other => panic!("expected Int32 column, got {other:?}"),
    }
    match meta.get_array("ScaleFactorX").unwrap() {
        MetaColumn::Float32(values) => assert_eq!(values, &vec![0.65; 4]),
        other => panic!("expected Float32 column, got {other:?}"),
    }
}

#[test]
fn test_execute_with_grayscale_conversion() {
    let dir = TempDir::new().unwrap();
    let xml = write_montage(dir.path(), "Mosaic.png", &[(0, 0), (1000, 0)], 2, 2);

    let mut config = ImportConfig::new(&xml);
    config.convert_to_gray_scale = true;
    let outcome = importer(config).execute().unwrap();

    let tiles = outcome.container.matrix("Tile AttributeMatrix").unwrap();
    for p in 0..2usize {
        let name = format!("Mosaic_p{p}");
        match tiles.get_array(&name).unwrap() {
            MetaColumn::UInt8 { data, components } => {
                assert_eq!(*components, 1);
                assert_eq!(data.len(), 4);
                // weighted sum of the tile's solid fill
                let [r, g, b] = tile_color(p).0;
                let expected = (f32::from(r) * 0.2125
                    + f32::from(g) * 0.7154
                    + f32::from(b) * 0.0721)
                    .round() as u8;
                assert!(data.iter().all(|&v| v == expected));
            }
            other => panic!("expected UInt8 array for {name}, got {other:?}"),
        }
    }
    assert!(!tiles.contains_array("gray_scale_temp"));
}

#[test]
fn test_preflight_touches_no_pixels() {
    let dir = TempDir::new().unwrap();
    let xml = write_montage(dir.path(), "Mosaic.png", &STARTS_2X2, 4, 2);

    // Corrupt one tile file; preflight only checks existence
    let broken = dir.path().join(tile_filename("Mosaic.png", "p2"));
    std::fs::write(&broken, b"not a png").unwrap();

    let outcome = importer(ImportConfig::new(&xml)).preflight().unwrap();
    assert_eq!(outcome.report.image_count, 4);

    let tiles = outcome.container.matrix("Tile AttributeMatrix").unwrap();
    for p in 0..4 {
        let array = tiles.get_array(&format!("Mosaic_p{p}")).unwrap();
        assert_eq!(array.tuple_count(), 0);
    }
}

#[test]
fn test_missing_tile_file_fails_preflight() {
    let dir = TempDir::new().unwrap();
    let xml = write_montage(dir.path(), "Mosaic.png", &STARTS_2X2, 4, 2);
    std::fs::remove_file(dir.path().join(tile_filename("Mosaic.png", "p1"))).unwrap();

    let err = importer(ImportConfig::new(&xml)).preflight().unwrap_err();
    assert_eq!(err.code(), -70020);
}

#[test]
fn test_plan_memoized_until_flushed() {
    let dir = TempDir::new().unwrap();
    let xml = write_montage(dir.path(), "Mosaic.png", &[(0, 0), (1000, 0)], 2, 2);

    let mut importer = importer(ImportConfig::new(&xml));
    assert!(!importer.preflight().unwrap().report.from_cache);
    assert!(importer.preflight().unwrap().report.from_cache);

    // A flushed cache re-parses and picks up new content
    write_montage(dir.path(), "Mosaic.png", &[(0, 0), (1000, 0), (2000, 0)], 2, 2);
    importer.flush_cache();
    let outcome = importer.preflight().unwrap();
    assert!(!outcome.report.from_cache);
    assert_eq!(outcome.report.image_count, 3);
    assert_eq!(outcome.report.column_count, 3);
}

#[test]
fn test_empty_montage() {
    let dir = TempDir::new().unwrap();
    let xml = write_montage(dir.path(), "Mosaic.png", &[], 4, 2);

    let outcome = importer(ImportConfig::new(&xml)).execute().unwrap();
    assert_eq!(outcome.report.image_count, 0);
    assert_eq!((outcome.report.row_count, outcome.report.column_count), (0, 0));
    assert!(outcome.report.filenames.is_empty());
}

#[test]
fn test_report_serializes_to_json() {
    let dir = TempDir::new().unwrap();
    let xml = write_montage(dir.path(), "Mosaic.png", &[(0, 0)], 2, 2);

    let outcome = importer(ImportConfig::new(&xml)).preflight().unwrap();
    let json = serde_json::to_value(&outcome.report).unwrap();

    assert_eq!(json["image_count"], 1);
    assert_eq!(json["row_count"], 1);
    assert_eq!(json["column_count"], 1);
    assert!(json["filenames"][0]
        .as_str()
        .unwrap()
        .ends_with("Mosaic_p0.png"));
    assert!(json["montage_information"].as_str().is_some());
}

#[test]
fn test_jittered_grid_reconstruction() {
    // Stage positions wobble within the tolerance; the grid still comes out 2x3
    let starts = [
        (3, 7),
        (1004, 0),
        (2001, 12),
        (0, 1010),
        (998, 1003),
        (2010, 1000),
    ];
    let dir = TempDir::new().unwrap();
    let xml = write_montage(dir.path(), "Mosaic.png", &starts, 2, 2);

    let outcome = importer(ImportConfig::new(&xml)).preflight().unwrap();
    assert_eq!(outcome.report.row_count, 2);
    assert_eq!(outcome.report.column_count, 3);
}
