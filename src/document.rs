//! Document parser for the AxioVision `_meta.xml` montage description.
//!
//! The document shape is a root element holding one global `<Tags>` block
//! plus one `<pNNN>` element per tile image, each with its own nested
//! `<Tags>` block:
//!
//! ```text
//! <ROOT>
//!   <Tags>...image count, base filename...</Tags>
//!   <p0><Tags>...per-tile metadata...</Tags></p0>
//!   <p1><Tags>...</Tags></p1>
//! </ROOT>
//! ```
//!
//! The image count declared in the global section is authoritative: every
//! declared `<pNNN>` element must exist or the parse fails. Parsing is
//! all-or-nothing; on any failure no partial plan is returned.

use std::path::{Path, PathBuf};

use tracing::warn;

use crate::error::ParseError;
use crate::meta::tags::{
    self, TagRegistry, FILENAME, IMAGE_COUNT_RAW, IMAGE_HEIGHT_PIXEL, IMAGE_POSITION_X,
    IMAGE_POSITION_Y, IMAGE_WIDTH_PIXEL, SCALE_FACTOR_X, SCALE_FACTOR_Y,
};
use crate::meta::{parse_tags_section, TagSection};
use crate::xml::XmlElement;

// =============================================================================
// TileBounds
// =============================================================================

/// Position, size and spacing metadata for one tile, plus the grid indices
/// assigned later by the reconstructor.
#[derive(Debug, Clone, PartialEq)]
pub struct TileBounds {
    /// Resolved path of the tile image file.
    pub filename: PathBuf,

    /// Name of the destination array holding this tile's pixel data.
    pub array_name: String,

    /// Pixel start position within the stitched mosaic.
    pub start_x: i32,
    pub start_y: i32,

    /// Pixel dimensions of the tile.
    pub size_x: i32,
    pub size_y: i32,

    /// Stage dimension start indices (channel / scene / block / mosaic).
    pub start_c: i32,
    pub start_s: i32,
    pub start_b: i32,
    pub start_m: i32,

    /// Grid indices, -1 until [`assign_grid_indices`](crate::grid::assign_grid_indices)
    /// runs over the collected set.
    pub row: i32,
    pub col: i32,

    /// Physical pixel spacing.
    pub spacing_x: f32,
    pub spacing_y: f32,
}

// =============================================================================
// MontagePlan
// =============================================================================

/// Everything the orchestrator needs from one parsed `_meta.xml`: the global
/// counts and naming, the per-tile bounds in discovery order, and the
/// per-tile tag sections the metadata columns are filled from.
#[derive(Debug, Clone)]
pub struct MontagePlan {
    pub image_count: i32,
    pub base_filename: String,

    /// Pixel dimensions shared by all tiles, fixed by the first tile.
    pub tile_width: i32,
    pub tile_height: i32,

    /// One entry per tile, index-aligned with `sections`.
    pub tiles: Vec<TileBounds>,
    pub sections: Vec<TagSection>,
}

// =============================================================================
// Tile element naming
// =============================================================================

/// Zero-padding width for `pNNN` element names.
///
/// The width grows at powers of ten (1 digit up to 9 images, 2 up to 99, and
/// so on) and is capped at 5 digits, matching the naming scheme AxioVision
/// writes.
pub fn zero_padding_width(image_count: i32) -> usize {
    let mut width = 0;
    for threshold in [0, 9, 99, 999, 9999] {
        if image_count > threshold {
            width += 1;
        }
    }
    width
}

/// Element name for tile `index` at the given padding width, e.g. `p007`.
pub fn tile_tag(index: i32, width: usize) -> String {
    format!("p{index:0width$}")
}

/// Derived tile image filename: base filename stem, underscore, tile tag,
/// original extension, resolved relative to `base_dir`.
pub fn tile_image_path(base_dir: &Path, base_filename: &str, ptag: &str) -> PathBuf {
    let base = Path::new(base_filename);
    let stem = base
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| base_filename.to_owned());
    let name = match base.extension() {
        Some(ext) => format!("{stem}_{ptag}.{}", ext.to_string_lossy()),
        None => format!("{stem}_{ptag}"),
    };
    base_dir.join(name)
}

/// Destination array name for one tile's pixel data.
pub fn tile_array_name(base_filename: &str, ptag: &str) -> String {
    let base = Path::new(base_filename);
    let stem = base
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| base_filename.to_owned());
    format!("{stem}_{ptag}")
}

// =============================================================================
// Document parsing
// =============================================================================

/// Parse a whole `_meta.xml` document into a [`MontagePlan`].
///
/// `base_dir` is the directory containing the XML file; derived tile image
/// paths are resolved against it.
pub fn parse_document(
    xml: &str,
    registry: &TagRegistry,
    base_dir: &Path,
) -> Result<MontagePlan, ParseError> {
    let root = XmlElement::parse(xml)?;

    let tags = root.child("Tags").ok_or(ParseError::MissingRootTags)?;
    let global = parse_tags_section(tags, registry)?;

    let image_count = global
        .get_i32(IMAGE_COUNT_RAW)
        .ok_or(ParseError::MissingGlobalTag {
            name: "ImageCountRaw",
        })?;
    let base_filename = global
        .get_str(FILENAME)
        .ok_or(ParseError::MissingGlobalTag { name: "Filename" })?
        .to_owned();

    let padding = zero_padding_width(image_count);

    let mut plan = MontagePlan {
        image_count,
        base_filename: base_filename.clone(),
        tile_width: 0,
        tile_height: 0,
        // The declared count is untrusted input; never allocate from it.
        // The loop below fails on the first tile the document does not carry.
        tiles: Vec::new(),
        sections: Vec::new(),
    };

    for p in 0..image_count {
        let ptag = tile_tag(p, padding);

        let photo = root
            .child(&ptag)
            .ok_or_else(|| ParseError::MissingTileElement { tag: ptag.clone() })?;
        let tile_tags = photo
            .child("Tags")
            .ok_or_else(|| ParseError::MissingTileTags { tag: ptag.clone() })?;

        let section =
            parse_tags_section(tile_tags, registry).map_err(|e| ParseError::TileSection {
                tag: ptag.clone(),
                source: Box::new(e),
            })?;

        let width = require_i32(&section, IMAGE_WIDTH_PIXEL, "ImageWidthPixel", p)?;
        let height = require_i32(&section, IMAGE_HEIGHT_PIXEL, "ImageHeightPixel", p)?;
        if width <= 0 || height <= 0 {
            return Err(ParseError::InvalidTileDimensions {
                tile: p,
                width,
                height,
            });
        }

        if p == 0 {
            // The format assumes all tiles share the first tile's dimensions
            plan.tile_width = width;
            plan.tile_height = height;
        } else if width != plan.tile_width || height != plan.tile_height {
            warn!(
                tile = p,
                width,
                height,
                expected_width = plan.tile_width,
                expected_height = plan.tile_height,
                "tile dimensions differ from the first tile"
            );
        }

        let bounds = TileBounds {
            filename: tile_image_path(base_dir, &base_filename, &ptag),
            array_name: tile_array_name(&base_filename, &ptag),
            start_x: require_i32(&section, IMAGE_POSITION_X, "ImagePositionX", p)?,
            start_y: require_i32(&section, IMAGE_POSITION_Y, "ImagePositionY", p)?,
            size_x: width,
            size_y: height,
            start_c: section.get_i32(tags::STAGE_START_C).unwrap_or(0),
            start_s: section.get_i32(tags::STAGE_START_S).unwrap_or(0),
            start_b: section.get_i32(tags::STAGE_START_B).unwrap_or(0),
            start_m: section.get_i32(tags::STAGE_START_M).unwrap_or(0),
            row: -1,
            col: -1,
            spacing_x: require_f32(&section, SCALE_FACTOR_X, "ScaleFactorX", p)?,
            spacing_y: require_f32(&section, SCALE_FACTOR_Y, "ScaleFactorY", p)?,
        };

        plan.tiles.push(bounds);
        plan.sections.push(section);
    }

    Ok(plan)
}

fn require_i32(
    section: &TagSection,
    id: i32,
    name: &'static str,
    tile: i32,
) -> Result<i32, ParseError> {
    section
        .get_i32(id)
        .ok_or(ParseError::MissingTileTag { tile, name })
}

fn require_f32(
    section: &TagSection,
    id: i32,
    name: &'static str,
    tile: i32,
) -> Result<f32, ParseError> {
    section
        .get_f32(id)
        .ok_or(ParseError::MissingTileTag { tile, name })
}

// =============================================================================
// Tests
// =============================================================================
