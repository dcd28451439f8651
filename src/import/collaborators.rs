//! Stock collaborator implementations.
//!
//! [`ImageFileReader`] decodes tile image files from disk with the `image`
//! crate; [`LumaConverter`] performs the weighted RGB-to-gray reduction.
//! Both honor the preflight/execute split: preflight validates and creates
//! empty placeholder arrays so the destination structure is inspectable
//! without touching pixel data.

use std::path::Path;

use tracing::debug;

use crate::error::{CollaboratorError, StoreError};
use crate::import::{GrayscaleConverter, GrayscaleRequest, ImageImporter, ImageImportRequest, ImportMode};
use crate::store::{DataContainer, MetaColumn};

// =============================================================================
// ImageFileReader
// =============================================================================

/// Reads tile images from disk into 3-component RGB arrays.
///
/// Non-RGB inputs (gray, palette, RGBA) are expanded or reduced to RGB8 on
/// decode. Execute rejects an image whose decoded pixel count does not match
/// the tile matrix.
#[derive(Debug, Default, Clone, Copy)]
pub struct ImageFileReader;

impl ImageImporter for ImageFileReader {
    fn import(
        &self,
        mode: ImportMode,
        request: &ImageImportRequest<'_>,
        container: &mut DataContainer,
    ) -> Result<(), CollaboratorError> {
        let matrix = container.matrix_mut(request.cell_attribute_matrix_name)?;

        let column = match mode {
            ImportMode::Preflight => {
                if !request.input_file.is_file() {
                    return Err(image_read(request.input_file, "file does not exist"));
                }
                MetaColumn::UInt8 {
                    data: Vec::new(),
                    components: 3,
                }
            }
            ImportMode::Execute => {
                let decoded = image::open(request.input_file)
                    .map_err(|e| image_read(request.input_file, e.to_string()))?;
                let rgb = decoded.into_rgb8();
                let (width, height) = rgb.dimensions();
                let expected = matrix.tuple_count();
                if (width as usize) * (height as usize) != expected {
                    return Err(image_read(
                        request.input_file,
                        format!(
                            "decoded size {width}x{height} does not match the tile matrix \
                             ({expected} pixels)"
                        ),
                    ));
                }
                debug!(
                    file = %request.input_file.display(),
                    width,
                    height,
                    "decoded tile image"
                );
                MetaColumn::UInt8 {
                    data: rgb.into_raw(),
                    components: 3,
                }
            }
        };

        matrix.add_array(request.image_data_array_name, column)?;
        Ok(())
    }
}

fn image_read(path: &Path, message: impl Into<String>) -> CollaboratorError {
    CollaboratorError::ImageRead {
        path: path.to_owned(),
        message: message.into(),
    }
}

// =============================================================================
// LumaConverter
// =============================================================================

/// Weighted RGB-to-gray reduction over a 3-component UInt8 array.
///
/// Each output pixel is `round(r*wr + g*wg + b*wb)` clamped to `0..=255`.
/// The result lands in the requested output array; the orchestrator swaps it
/// in under the source array's name.
#[derive(Debug, Default, Clone, Copy)]
pub struct LumaConverter;

impl GrayscaleConverter for LumaConverter {
    fn convert(
        &self,
        mode: ImportMode,
        request: &GrayscaleRequest<'_>,
        container: &mut DataContainer,
    ) -> Result<(), CollaboratorError> {
        let matrix = container.matrix_mut(request.cell_attribute_matrix_name)?;
        let source = matrix.get_array(request.input_array_name).ok_or_else(|| {
            StoreError::MissingArray(
                request.input_array_name.to_owned(),
                request.cell_attribute_matrix_name.to_owned(),
            )
        })?;

        let gray = match source {
            MetaColumn::UInt8 {
                data,
                components: 3,
            } => match mode {
                ImportMode::Preflight => MetaColumn::UInt8 {
                    data: Vec::new(),
                    components: 1,
                },
                ImportMode::Execute => {
                    let [wr, wg, wb] = request.color_weights;
                    let mut out = Vec::with_capacity(data.len() / 3);
                    for pixel in data.chunks_exact(3) {
                        let value = f32::from(pixel[0]) * wr
                            + f32::from(pixel[1]) * wg
                            + f32::from(pixel[2]) * wb;
                        out.push(value.round().clamp(0.0, 255.0) as u8);
                    }
                    MetaColumn::UInt8 {
                        data: out,
                        components: 1,
                    }
                }
            },
            other => {
                return Err(CollaboratorError::Grayscale {
                    array: request.input_array_name.to_owned(),
                    message: format!(
                        "expected a 3-component UInt8 array, found {}",
                        other.kind_name()
                    ),
                });
            }
        };

        matrix.add_array(request.output_array_name, gray)?;
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================
