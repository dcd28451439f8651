//! Import orchestration.
//!
//! [`MontageImporter`] sequences the whole pipeline: parse the `_meta.xml`
//! document, build the destination structure, drive the per-tile image
//! import and optional grayscale conversion, and reconstruct the tile grid.
//!
//! The image reader and grayscale converter are injected at construction as
//! trait objects with strongly typed request structs, so a missing or
//! misconfigured collaborator is a compile-time impossibility rather than a
//! runtime lookup failure.
//!
//! Every run happens in one of two modes: **preflight** performs all parsing
//! and structural checks without materializing pixel data, **execute**
//! performs the same steps plus actual image decoding. Both are synchronous
//! and strictly sequential; tiles are visited in ascending order and the
//! per-image metadata columns rely on that order for positional alignment.

pub mod collaborators;

use std::path::Path;
use std::time::SystemTime;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::{ImportConfig, GRAYSCALE_TEMP_ARRAY_NAME};
use crate::document::{parse_document, MontagePlan};
use crate::error::{CollaboratorError, ConfigError, MontageError, Result};
use crate::grid::{assign_grid_indices, GridShape};
use crate::meta::TagRegistry;
use crate::store::DataContainer;

pub use collaborators::{ImageFileReader, LumaConverter};

// =============================================================================
// Modes and collaborator contracts
// =============================================================================

/// Execution mode of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportMode {
    /// Validate everything, build the structure, decode nothing.
    Preflight,
    /// Validate and decode.
    Execute,
}

/// Configuration handed to the image reader for one tile.
#[derive(Debug, Clone, Copy)]
pub struct ImageImportRequest<'a> {
    /// Path of the tile image file to read.
    pub input_file: &'a Path,
    /// Destination container name.
    pub data_container_name: &'a str,
    /// Destination attribute matrix name.
    pub cell_attribute_matrix_name: &'a str,
    /// Name of the pixel array to create.
    pub image_data_array_name: &'a str,
}

/// Configuration handed to the grayscale converter for one tile.
#[derive(Debug, Clone, Copy)]
pub struct GrayscaleRequest<'a> {
    pub data_container_name: &'a str,
    pub cell_attribute_matrix_name: &'a str,
    /// Source RGB array.
    pub input_array_name: &'a str,
    /// Scratch array to write the gray data into; the orchestrator swaps it
    /// in under the source array's name afterwards.
    pub output_array_name: &'a str,
    /// Per-channel weights.
    pub color_weights: [f32; 3],
}

/// Reads one tile image into a pixel array in the destination store.
pub trait ImageImporter {
    fn import(
        &self,
        mode: ImportMode,
        request: &ImageImportRequest<'_>,
        container: &mut DataContainer,
    ) -> Result<(), CollaboratorError>;
}

/// Converts one RGB tile array to a single-channel gray array.
pub trait GrayscaleConverter {
    fn convert(
        &self,
        mode: ImportMode,
        request: &GrayscaleRequest<'_>,
        container: &mut DataContainer,
    ) -> Result<(), CollaboratorError>;
}

// =============================================================================
// Report
// =============================================================================

/// Summary of one run, serializable for host consumption.
#[derive(Debug, Clone, Serialize)]
pub struct MontageReport {
    pub image_count: i32,
    pub row_count: i32,
    pub column_count: i32,
    pub tile_width: i32,
    pub tile_height: i32,
    /// Tile image filenames in discovery order.
    pub filenames: Vec<String>,
    /// Whether the parsed plan was reused from the memo cache.
    pub from_cache: bool,
    /// Origin override, when configured.
    pub origin: Option<[f32; 3]>,
    /// Spacing override, when configured.
    pub spacing: Option<[f32; 3]>,
    /// Human-readable montage summary.
    pub montage_information: String,
}

/// Result of a run: the report plus the populated destination container.
#[derive(Debug)]
pub struct ImportOutcome {
    pub report: MontageReport,
    pub container: DataContainer,
}

// =============================================================================
// Plan cache
// =============================================================================

/// Memoized parse result keyed by (input path, modification time).
///
/// Preflight may run repeatedly while the user fiddles with parameters; the
/// document is only re-parsed when the file path or its timestamp changes.
#[derive(Debug, Clone)]
struct PlanCache {
    input_file: std::path::PathBuf,
    modified: SystemTime,
    plan: MontagePlan,
}

// =============================================================================
// MontageImporter
// =============================================================================

/// The import orchestrator. Construct with the typed configuration and the
/// two collaborators, then call [`preflight`](Self::preflight) or
/// [`execute`](Self::execute).
pub struct MontageImporter<I, G> {
    config: ImportConfig,
    registry: TagRegistry,
    image_importer: I,
    grayscale_converter: G,
    cache: Option<PlanCache>,
}

impl<I, G> MontageImporter<I, G>
where
    I: ImageImporter,
    G: GrayscaleConverter,
{
    pub fn new(config: ImportConfig, image_importer: I, grayscale_converter: G) -> Self {
        Self {
            config,
            registry: TagRegistry::axio_vision(),
            image_importer,
            grayscale_converter,
            cache: None,
        }
    }

    pub fn config(&self) -> &ImportConfig {
        &self.config
    }

    /// Drop the memoized plan, forcing the next run to re-parse.
    pub fn flush_cache(&mut self) {
        self.cache = None;
    }

    /// Validate-only run: parses, checks structure, decodes nothing.
    pub fn preflight(&mut self) -> Result<ImportOutcome> {
        self.run(ImportMode::Preflight)
    }

    /// Full run: everything preflight does, plus pixel decoding.
    pub fn execute(&mut self) -> Result<ImportOutcome> {
        self.run(ImportMode::Execute)
    }

    /// Run the pipeline in the given mode.
    pub fn run(&mut self, mode: ImportMode) -> Result<ImportOutcome> {
        self.config.validate()?;

        let (mut plan, from_cache) = self.load_plan()?;

        let mut container = DataContainer::new(&self.config.data_container_name);
        if plan.image_count > 0 {
            self.build_structure(&plan, &mut container)?;
            self.import_tiles(mode, &plan, &mut container)?;
        }

        let shape = assign_grid_indices(&mut plan.tiles, self.config.tolerance);
        debug!(rows = shape.rows, cols = shape.cols, "grid reconstructed");

        let report = self.build_report(&plan, shape, from_cache);
        Ok(ImportOutcome { report, container })
    }

    // -------------------------------------------------------------------------
    // Plan acquisition
    // -------------------------------------------------------------------------

    /// Parse the input document, reusing the memoized plan when the file is
    /// unchanged.
    fn load_plan(&mut self) -> Result<(MontagePlan, bool)> {
        let path = self.config.input_file.clone();
        let modified = std::fs::metadata(&path)
            .and_then(|m| m.modified())
            .unwrap_or(SystemTime::UNIX_EPOCH);

        if let Some(cache) = &self.cache {
            if cache.input_file == path && cache.modified == modified {
                debug!(path = %path.display(), "reusing cached montage plan");
                return Ok((cache.plan.clone(), true));
            }
        }

        let xml = std::fs::read_to_string(&path).map_err(|e| {
            MontageError::from(ConfigError::InputFileUnreadable {
                path: path.clone(),
                message: e.to_string(),
            })
        })?;
        let base_dir = path.parent().unwrap_or_else(|| Path::new("."));

        let mut plan = parse_document(&xml, &self.registry, base_dir)?;
        if let Some(spacing) = self.config.spacing {
            for tile in &mut plan.tiles {
                tile.spacing_x = spacing[0];
                tile.spacing_y = spacing[1];
            }
        }

        self.cache = Some(PlanCache {
            input_file: path,
            modified,
            plan: plan.clone(),
        });
        Ok((plan, false))
    }

    // -------------------------------------------------------------------------
    // Destination structure
    // -------------------------------------------------------------------------

    /// Create the tile matrix and the per-image metadata matrix with one
    /// column per tag id seen in the first tile's section.
    fn build_structure(&self, plan: &MontagePlan, container: &mut DataContainer) -> Result<()> {
        let tile_dims = vec![plan.tile_width as usize, plan.tile_height as usize, 1];
        container.create_attribute_matrix(&self.config.cell_attribute_matrix_name, tile_dims)?;

        let count = plan.image_count as usize;
        let meta_name = self.config.metadata_matrix_name();
        let meta = container.create_attribute_matrix(&meta_name, vec![count])?;
        if let Some(first) = plan.sections.first() {
            for entry in first.entries() {
                meta.add_array(entry.name, entry.make_column(count))?;
            }
        }
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Per-tile work
    // -------------------------------------------------------------------------

    fn import_tiles(
        &self,
        mode: ImportMode,
        plan: &MontagePlan,
        container: &mut DataContainer,
    ) -> Result<()> {
        let meta_name = self.config.metadata_matrix_name();

        for (p, (tile, section)) in plan.tiles.iter().zip(&plan.sections).enumerate() {
            info!(
                tile = p,
                total = plan.image_count,
                file = %tile.filename.display(),
                "importing tile image"
            );

            // Accumulate this tile's values into the metadata columns. Tags
            // absent from the first tile have no column and are skipped.
            let meta = container.matrix_mut(&meta_name)?;
            for entry in section.entries() {
                match meta.get_array_mut(entry.name) {
                    Some(column) => {
                        if !column.set_from(p, &entry.value) {
                            warn!(tile = p, tag = entry.name, "metadata value kind mismatch");
                        }
                    }
                    None => {
                        warn!(tile = p, tag = entry.name, "tag has no metadata column");
                    }
                }
            }

            let request = ImageImportRequest {
                input_file: &tile.filename,
                data_container_name: &self.config.data_container_name,
                cell_attribute_matrix_name: &self.config.cell_attribute_matrix_name,
                image_data_array_name: &tile.array_name,
            };
            self.image_importer.import(mode, &request, container)?;

            if self.config.convert_to_gray_scale {
                self.convert_tile(mode, &tile.array_name, container)?;
            }
        }
        Ok(())
    }

    /// Convert one tile array to gray and swap the result in under the
    /// original array's name.
    fn convert_tile(
        &self,
        mode: ImportMode,
        array_name: &str,
        container: &mut DataContainer,
    ) -> Result<()> {
        let request = GrayscaleRequest {
            data_container_name: &self.config.data_container_name,
            cell_attribute_matrix_name: &self.config.cell_attribute_matrix_name,
            input_array_name: array_name,
            output_array_name: GRAYSCALE_TEMP_ARRAY_NAME,
            color_weights: self.config.color_weights,
        };
        self.grayscale_converter.convert(mode, &request, container)?;

        let matrix = container.matrix_mut(&self.config.cell_attribute_matrix_name)?;
        let _rgb = matrix.remove_array(array_name)?;
        let gray = matrix.remove_array(GRAYSCALE_TEMP_ARRAY_NAME)?;
        matrix.add_array(array_name, gray)?;
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Reporting
    // -------------------------------------------------------------------------

    fn build_report(&self, plan: &MontagePlan, shape: GridShape, from_cache: bool) -> MontageReport {
        let filenames: Vec<String> = plan
            .tiles
            .iter()
            .map(|t| t.filename.display().to_string())
            .collect();

        let montage_information = format!(
            "Mosaic of {} image(s) arranged as {} column(s) x {} row(s), tile size {}x{} px",
            plan.image_count, shape.cols, shape.rows, plan.tile_width, plan.tile_height
        );

        MontageReport {
            image_count: plan.image_count,
            row_count: shape.rows,
            column_count: shape.cols,
            tile_width: plan.tile_width,
            tile_height: plan.tile_height,
            filenames,
            from_cache,
            origin: self.config.origin,
            spacing: self.config.spacing,
            montage_information,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
