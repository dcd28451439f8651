//! Configuration for the montage importer.
//!
//! [`ImportConfig`] is the strongly typed configuration the orchestrator is
//! constructed with; the clap types below map the CLI onto it. All options
//! can also be set via environment variables with the `AXIO_` prefix.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::error::ConfigError;

// =============================================================================
// Default Values
// =============================================================================

/// Default name of the destination data container.
pub const DEFAULT_DATA_CONTAINER_NAME: &str = "Zeiss AxioVision Montage";

/// Default name of the attribute matrix holding the per-tile pixel arrays.
pub const DEFAULT_TILE_MATRIX_NAME: &str = "Tile AttributeMatrix";

/// Suffix appended to the tile matrix name for the per-image metadata matrix.
pub const METADATA_MATRIX_SUFFIX: &str = " MetaData";

/// Name of the scratch array the grayscale conversion writes before the swap.
pub const GRAYSCALE_TEMP_ARRAY_NAME: &str = "gray_scale_temp";

/// ITU luma-like channel weights used when converting RGB tiles to gray.
pub const DEFAULT_COLOR_WEIGHTS: [f32; 3] = [0.2125, 0.7154, 0.0721];

/// Default stage-position tolerance for row/column clustering.
pub const DEFAULT_TOLERANCE: i32 = 100;

// =============================================================================
// ImportConfig
// =============================================================================

/// Typed configuration for one import run.
#[derive(Debug, Clone)]
pub struct ImportConfig {
    /// Path of the `_meta.xml` file describing the montage.
    pub input_file: PathBuf,

    /// Name of the destination data container.
    pub data_container_name: String,

    /// Name of the attribute matrix the tile arrays are created in. The
    /// metadata matrix name is derived from it.
    pub cell_attribute_matrix_name: String,

    /// Convert each imported RGB tile to a single-channel gray array.
    pub convert_to_gray_scale: bool,

    /// Channel weights for the grayscale conversion.
    pub color_weights: [f32; 3],

    /// Stage-position tolerance for grid clustering.
    pub tolerance: i32,

    /// Optional origin override recorded in the montage report.
    pub origin: Option<[f32; 3]>,

    /// Optional spacing override applied to every tile's spacing.
    pub spacing: Option<[f32; 3]>,
}

impl ImportConfig {
    /// Configuration with stock defaults for the given input file.
    pub fn new(input_file: impl Into<PathBuf>) -> Self {
        Self {
            input_file: input_file.into(),
            data_container_name: DEFAULT_DATA_CONTAINER_NAME.to_owned(),
            cell_attribute_matrix_name: DEFAULT_TILE_MATRIX_NAME.to_owned(),
            convert_to_gray_scale: false,
            color_weights: DEFAULT_COLOR_WEIGHTS,
            tolerance: DEFAULT_TOLERANCE,
            origin: None,
            spacing: None,
        }
    }

    /// Name of the per-image metadata matrix.
    pub fn metadata_matrix_name(&self) -> String {
        format!("{}{}", self.cell_attribute_matrix_name, METADATA_MATRIX_SUFFIX)
    }

    /// Check the setup before any parsing happens.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.input_file.as_os_str().is_empty() {
            return Err(ConfigError::InputFileNotSet);
        }
        if !self.input_file.exists() {
            return Err(ConfigError::InputFileMissing {
                path: self.input_file.clone(),
            });
        }
        Ok(())
    }
}

// =============================================================================
// CLI Arguments
// =============================================================================

/// AxioVision montage importer.
///
/// Parses a Zeiss AxioVision `_meta.xml` montage description, reconstructs
/// the tile grid from the per-image position metadata and assembles the
/// mosaic into a columnar store.
#[derive(Parser, Debug)]
#[command(name = "axio-montage")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Validate the montage without decoding any pixel data.
    Preflight(RunArgs),

    /// Import the montage, decoding every tile image.
    Import(RunArgs),
}

/// Arguments shared by the preflight and import subcommands.
#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// Path of the AxioVision _meta.xml file.
    pub input_file: PathBuf,

    /// Destination data container name.
    #[arg(long, default_value = DEFAULT_DATA_CONTAINER_NAME, env = "AXIO_DATA_CONTAINER")]
    pub data_container: String,

    /// Attribute matrix name for the tile pixel arrays.
    #[arg(long, default_value = DEFAULT_TILE_MATRIX_NAME, env = "AXIO_TILE_MATRIX")]
    pub attribute_matrix: String,

    /// Convert imported tiles to grayscale.
    #[arg(long, default_value_t = false, env = "AXIO_GRAYSCALE")]
    pub convert_to_gray_scale: bool,

    /// Channel weights for the grayscale conversion (R G B).
    #[arg(long, num_args = 3, value_names = ["R", "G", "B"])]
    pub color_weights: Option<Vec<f32>>,

    /// Stage-position tolerance for row/column clustering.
    #[arg(long, default_value_t = DEFAULT_TOLERANCE, env = "AXIO_TOLERANCE")]
    pub tolerance: i32,

    /// Override the montage origin (X Y Z).
    #[arg(long, num_args = 3, value_names = ["X", "Y", "Z"])]
    pub origin: Option<Vec<f32>>,

    /// Override the pixel spacing (X Y Z).
    #[arg(long, num_args = 3, value_names = ["X", "Y", "Z"])]
    pub spacing: Option<Vec<f32>>,

    /// Write a JSON montage report to this path.
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// Enable verbose logging (debug level).
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

impl RunArgs {
    /// Build the typed import configuration from the CLI arguments.
    pub fn to_config(&self) -> ImportConfig {
        let mut config = ImportConfig::new(&self.input_file);
        config.data_container_name = self.data_container.clone();
        config.cell_attribute_matrix_name = self.attribute_matrix.clone();
        config.convert_to_gray_scale = self.convert_to_gray_scale;
        if let Some(weights) = &self.color_weights {
            config.color_weights = [weights[0], weights[1], weights[2]];
        }
        config.tolerance = self.tolerance;
        if let Some(origin) = &self.origin {
            config.origin = Some([origin[0], origin[1], origin[2]]);
        }
        if let Some(spacing) = &self.spacing {
            config.spacing = Some([spacing[0], spacing[1], spacing[2]]);
        }
        config
    }
}

// =============================================================================
// Tests
// =============================================================================
