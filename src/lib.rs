//! # AxioVision Montage Importer
//!
//! An importer for tiled microscopy montages acquired with Zeiss AxioVision.
//!
//! AxioVision writes each mosaic as a set of individual tile image files
//! described by a sidecar `_meta.xml` document in a compact tag dialect:
//! numbered `I{c}`/`V{c}` element pairs carrying numeric tag ids and values,
//! one global section plus one `<pNNN>` section per tile. This library parses
//! that dialect, reconstructs the row/column grid from the per-tile stage
//! positions and assembles the mosaic into a columnar destination store.
//!
//! ## Features
//!
//! - **Tag dialect parser**: Decodes the `I{c}`/`V{c}` pair scheme against an
//!   explicit tag registry, preserving unknown vendor tags for diagnostics
//! - **Grid reconstruction**: Greedy tolerance clustering of tile start
//!   positions into row and column indices
//! - **Preflight mode**: Validates the whole montage and builds the
//!   destination structure without decoding a single pixel
//! - **Grayscale conversion**: Optional weighted RGB-to-gray reduction of
//!   every imported tile
//! - **Memoized parsing**: The parsed plan is cached by file path and
//!   modification time across repeated runs
//!
//! ## Architecture
//!
//! - [`xml`] - Minimal element tree over `quick-xml` for the dialect
//! - [`meta`] - Tag registry, typed entries and the tag-section parser
//! - [`document`] - Whole-document parser producing a [`MontagePlan`]
//! - [`grid`] - Tile grid reconstruction from start positions
//! - [`store`] - Columnar destination store the montage is assembled into
//! - [`import`] - Orchestrator, collaborator traits and stock collaborators
//! - [`config`] - CLI and configuration types
//!
//! ## Example
//!
//! ```rust,no_run
//! use axio_montage::{ImageFileReader, ImportConfig, LumaConverter, MontageImporter};
//!
//! fn main() -> axio_montage::Result<()> {
//!     let config = ImportConfig::new("/data/run1/Mosaic_meta.xml");
//!     let mut importer = MontageImporter::new(config, ImageFileReader, LumaConverter);
//!
//!     // Validate without decoding pixels, then do the real import
//!     let preflight = importer.preflight()?;
//!     println!("{}", preflight.report.montage_information);
//!
//!     let outcome = importer.execute()?;
//!     println!("{} tile(s) imported", outcome.report.image_count);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod document;
pub mod error;
pub mod grid;
pub mod import;
pub mod meta;
pub mod store;
pub mod xml;

#[cfg(test)]
pub(crate) mod testutil;

pub use config::{Cli, Command, ImportConfig, RunArgs};
pub use document::{parse_document, MontagePlan, TileBounds};
pub use error::{
    CollaboratorError, ConfigError, MontageError, ParseError, Result, StoreError,
};
pub use grid::{assign_grid_indices, GridShape};
pub use import::{
    GrayscaleConverter, GrayscaleRequest, ImageFileReader, ImageImportRequest, ImageImporter,
    ImportMode, ImportOutcome, LumaConverter, MontageImporter, MontageReport,
};
pub use meta::{parse_tags_section, MetaEntry, MetaValue, TagRegistry, TagSection, TagSpec, ValueKind};
pub use store::{AttributeMatrix, DataContainer, MetaColumn};
