//! Tag vocabulary for the AxioVision `_meta.xml` dialect.
//!
//! Every metadata value in the dialect is carried as a numbered tag. This
//! module defines the numeric ids the importer understands, the value type
//! each id decodes to, and the registry mapping ids to their specs.
//!
//! The registry is an explicitly constructed, immutable table passed by
//! reference into the parsers. Ids not present in the table are not an
//! error; AxioVision files routinely carry vendor tags this importer has no
//! use for, and those are recorded and skipped.

use std::collections::BTreeMap;

// =============================================================================
// Well-known tag ids
// =============================================================================

/// Number of tile images in the document. Global section, mandatory.
pub const IMAGE_COUNT_RAW: i32 = 517;

/// Base image filename the per-tile files are derived from. Global section,
/// mandatory.
pub const FILENAME: i32 = 1025;

/// Tile width in pixels. Mandatory per tile; the first tile fixes the
/// dimensions for the whole set.
pub const IMAGE_WIDTH_PIXEL: i32 = 515;

/// Tile height in pixels. Mandatory per tile.
pub const IMAGE_HEIGHT_PIXEL: i32 = 516;

/// Pixel type discriminant as written by the acquisition software. Optional.
pub const PIXEL_TYPE: i32 = 518;

/// Zero-based index of the tile within the acquisition. Carried into the
/// per-image metadata when present.
pub const IMAGE_TILE_INDEX: i32 = 520;

/// Pixel start position of the tile along X. Mandatory per tile; drives
/// column clustering.
pub const IMAGE_POSITION_X: i32 = 2073;

/// Pixel start position of the tile along Y. Mandatory per tile; drives row
/// clustering.
pub const IMAGE_POSITION_Y: i32 = 2074;

/// Stage dimension start indices (channel / scene / block / mosaic).
/// Optional per tile, default 0.
pub const STAGE_START_C: i32 = 2080;
pub const STAGE_START_S: i32 = 2081;
pub const STAGE_START_B: i32 = 2082;
pub const STAGE_START_M: i32 = 2083;

/// Physical pixel spacing along X, in the unit the scope was calibrated in.
/// Mandatory per tile.
pub const SCALE_FACTOR_X: i32 = 769;

/// Physical pixel spacing along Y. Mandatory per tile.
pub const SCALE_FACTOR_Y: i32 = 772;

/// Acquisition timestamp as written by AxioVision. Optional.
pub const ACQUISITION_TIME: i32 = 1024;

// =============================================================================
// Value kinds and tag specs
// =============================================================================

/// The value type a tag id decodes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    /// Signed 32-bit integer, base-10 text.
    Int32,
    /// 32-bit float, decimal text.
    Float32,
    /// Free-form text.
    Text,
}

impl ValueKind {
    /// Human-readable name, used in diagnostics.
    pub const fn name(self) -> &'static str {
        match self {
            ValueKind::Int32 => "Int32",
            ValueKind::Float32 => "Float32",
            ValueKind::Text => "Text",
        }
    }
}

/// Decoder specification for one tag id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagSpec {
    pub id: i32,
    pub name: &'static str,
    pub kind: ValueKind,
}

// =============================================================================
// TagRegistry
// =============================================================================

/// Immutable id-to-spec lookup table.
///
/// Construct once with [`TagRegistry::axio_vision`] and pass by reference
/// into the parsers. Lookups for unrecognized ids return `None` rather than
/// failing.
#[derive(Debug, Clone)]
pub struct TagRegistry {
    specs: BTreeMap<i32, TagSpec>,
}

impl TagRegistry {
    /// The stock AxioVision tag table.
    pub fn axio_vision() -> Self {
        const SPECS: &[(i32, &str, ValueKind)] = &[
            (IMAGE_COUNT_RAW, "ImageCountRaw", ValueKind::Int32),
            (FILENAME, "Filename", ValueKind::Text),
            (IMAGE_WIDTH_PIXEL, "ImageWidthPixel", ValueKind::Int32),
            (IMAGE_HEIGHT_PIXEL, "ImageHeightPixel", ValueKind::Int32),
            (PIXEL_TYPE, "PixelType", ValueKind::Int32),
            (IMAGE_TILE_INDEX, "ImageTileIndex", ValueKind::Int32),
            (IMAGE_POSITION_X, "ImagePositionX", ValueKind::Int32),
            (IMAGE_POSITION_Y, "ImagePositionY", ValueKind::Int32),
            (STAGE_START_C, "StageStartC", ValueKind::Int32),
            (STAGE_START_S, "StageStartS", ValueKind::Int32),
            (STAGE_START_B, "StageStartB", ValueKind::Int32),
            (STAGE_START_M, "StageStartM", ValueKind::Int32),
            (SCALE_FACTOR_X, "ScaleFactorX", ValueKind::Float32),
            (SCALE_FACTOR_Y, "ScaleFactorY", ValueKind::Float32),
            (ACQUISITION_TIME, "AcquisitionTime", ValueKind::Text),
        ];

        let specs = SPECS
            .iter()
            .map(|&(id, name, kind)| (id, TagSpec { id, name, kind }))
            .collect();
        Self { specs }
    }

    /// Decoder spec for a numeric tag id, or `None` for unrecognized ids.
    pub fn spec_for(&self, id: i32) -> Option<&TagSpec> {
        self.specs.get(&id)
    }

    /// Display name for a tag id, or `None` for unrecognized ids.
    pub fn name_for(&self, id: i32) -> Option<&'static str> {
        self.specs.get(&id).map(|s| s.name)
    }

    /// Number of known tag ids.
    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }
}

// =============================================================================
// Tests
// =============================================================================
