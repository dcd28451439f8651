//! Test utilities for integration tests.
//!
//! Helpers for materializing complete montages on disk: the `_meta.xml`
//! document plus the per-tile image files it references.

use std::path::{Path, PathBuf};

use image::{Rgb, RgbImage};

use axio_montage::document::{tile_tag, zero_padding_width};

// Tag ids matching the importer's registry.
pub const TAG_IMAGE_COUNT_RAW: i32 = 517;
pub const TAG_FILENAME: i32 = 1025;
pub const TAG_IMAGE_WIDTH: i32 = 515;
pub const TAG_IMAGE_HEIGHT: i32 = 516;
pub const TAG_TILE_INDEX: i32 = 520;
pub const TAG_POSITION_X: i32 = 2073;
pub const TAG_POSITION_Y: i32 = 2074;
pub const TAG_SCALE_X: i32 = 769;
pub const TAG_SCALE_Y: i32 = 772;

/// Build a well-formed `_meta.xml` document for a set of tiles.
///
/// `starts` holds one `(start_x, start_y)` pair per tile; all tiles share the
/// given pixel dimensions.
pub fn meta_xml(base_filename: &str, starts: &[(i32, i32)], width: i32, height: i32) -> String {
    let count = starts.len() as i32;
    let padding = zero_padding_width(count);

    let mut xml = String::from("<ROOT>\n");
    xml.push_str(&format!(
        "<Tags><Count>2</Count>\
         <I0>{TAG_IMAGE_COUNT_RAW}</I0><V0>{count}</V0><A0>0</A0>\
         <I1>{TAG_FILENAME}</I1><V1>{base_filename}</V1><A1>0</A1></Tags>\n",
    ));

    for (p, &(start_x, start_y)) in starts.iter().enumerate() {
        let ptag = tile_tag(p as i32, padding);
        let entries: Vec<(i32, String)> = vec![
            (TAG_IMAGE_WIDTH, width.to_string()),
            (TAG_IMAGE_HEIGHT, height.to_string()),
            (TAG_TILE_INDEX, p.to_string()),
            (TAG_POSITION_X, start_x.to_string()),
            (TAG_POSITION_Y, start_y.to_string()),
            (TAG_SCALE_X, "0.65".to_string()),
            (TAG_SCALE_Y, "0.65".to_string()),
        ];

        xml.push_str(&format!("<{ptag}><Tags><Count>{}</Count>", entries.len()));
        for (c, (id, value)) in entries.iter().enumerate() {
            xml.push_str(&format!("<I{c}>{id}</I{c}><V{c}>{value}</V{c}>"));
        }
        xml.push_str(&format!("</Tags></{ptag}>\n"));
    }

    xml.push_str("</ROOT>\n");
    xml
}

/// Write a complete montage into `dir`: the `_meta.xml` plus one PNG per
/// tile. Tile `p` is filled with a solid color encoding its index, so pixel
/// assertions can tell tiles apart. Returns the path of the XML file.
pub fn write_montage(
    dir: &Path,
    base_filename: &str,
    starts: &[(i32, i32)],
    width: u32,
    height: u32,
) -> PathBuf {
    let xml_path = dir.join(meta_filename(base_filename));
    std::fs::write(
        &xml_path,
        meta_xml(base_filename, starts, width as i32, height as i32),
    )
    .unwrap();

    let padding = zero_padding_width(starts.len() as i32);
    for p in 0..starts.len() {
        let ptag = tile_tag(p as i32, padding);
        let path = dir.join(tile_filename(base_filename, &ptag));
        let img = RgbImage::from_pixel(width, height, tile_color(p));
        img.save(&path).unwrap();
    }
    xml_path
}

/// Solid fill color for tile `p`.
pub fn tile_color(p: usize) -> Rgb<u8> {
    Rgb([(p * 40) as u8, 0, 255 - (p * 40) as u8])
}

/// Sidecar XML filename for a base image filename, e.g. `Mosaic_meta.xml`.
pub fn meta_filename(base_filename: &str) -> String {
    let stem = Path::new(base_filename)
        .file_stem()
        .unwrap()
        .to_string_lossy();
    format!("{stem}_meta.xml")
}

/// Derived tile image filename, e.g. `Mosaic_p0.png`.
pub fn tile_filename(base_filename: &str, ptag: &str) -> String {
    let base = Path::new(base_filename);
    let stem = base.file_stem().unwrap().to_string_lossy();
    let ext = base.extension().unwrap().to_string_lossy();
    format!("{stem}_{ptag}.{ext}")
}
