//! Shared builders for synthetic `_meta.xml` documents used across the unit
//! test suites.

use crate::meta::tags;

/// Build a well-formed `_meta.xml` document for a set of tiles.
///
/// `starts` holds one `(start_x, start_y)` pair per tile; all tiles share the
/// given pixel dimensions and a 0.65 spacing. Each tile section also carries
/// one vendor tag unknown to the registry, as real files do.
pub(crate) fn meta_xml(base_filename: &str, starts: &[(i32, i32)], width: i32, height: i32) -> String {
    let count = starts.len() as i32;
    let padding = crate::document::zero_padding_width(count);

    let mut xml = String::from("<ROOT>\n");
    xml.push_str(&format!(
        "<Tags><Count>2</Count>\
         <I0>{}</I0><V0>{count}</V0><A0>0</A0>\
         <I1>{}</I1><V1>{base_filename}</V1><A1>0</A1></Tags>\n",
        tags::IMAGE_COUNT_RAW,
        tags::FILENAME,
    ));

    for (p, &(start_x, start_y)) in starts.iter().enumerate() {
        let ptag = crate::document::tile_tag(p as i32, padding);
        let entries: Vec<(i32, String)> = vec![
            (tags::IMAGE_WIDTH_PIXEL, width.to_string()),
            (tags::IMAGE_HEIGHT_PIXEL, height.to_string()),
            (tags::IMAGE_TILE_INDEX, p.to_string()),
            (tags::IMAGE_POSITION_X, start_x.to_string()),
            (tags::IMAGE_POSITION_Y, start_y.to_string()),
            (tags::SCALE_FACTOR_X, "0.65".to_string()),
            (tags::SCALE_FACTOR_Y, "0.65".to_string()),
            // vendor tag the registry does not know
            (31337, "proprietary".to_string()),
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
