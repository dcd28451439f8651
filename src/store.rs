//! Destination columnar store the montage is assembled into.
//!
//! This is the narrow surface the import pipeline needs from the host data
//! structure: a named container holding attribute matrices, each matrix
//! holding typed arrays keyed by name. Arrays are created pre-sized and
//! filled positionally, one tuple per tile, in tile discovery order.

use std::collections::BTreeMap;

use crate::error::StoreError;
use crate::meta::entry::MetaValue;

// =============================================================================
// MetaColumn
// =============================================================================

/// A typed array stored in an attribute matrix.
///
/// `UInt8` carries decoded pixel data with a per-tuple component count
/// (3 for RGB, 1 for grayscale); the numeric and text variants carry
/// per-image metadata, one value per tile.
#[derive(Debug, Clone, PartialEq)]
pub enum MetaColumn {
    UInt8 { data: Vec<u8>, components: usize },
    Int32(Vec<i32>),
    Float32(Vec<f32>),
    Text(Vec<String>),
}

impl MetaColumn {
    /// Human-readable type name for diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            MetaColumn::UInt8 { .. } => "UInt8",
            MetaColumn::Int32(_) => "Int32",
            MetaColumn::Float32(_) => "Float32",
            MetaColumn::Text(_) => "Text",
        }
    }

    /// Number of tuples in the column.
    pub fn tuple_count(&self) -> usize {
        match self {
            MetaColumn::UInt8 { data, components } => {
                if *components == 0 {
                    0
                } else {
                    data.len() / components
                }
            }
            MetaColumn::Int32(v) => v.len(),
            MetaColumn::Float32(v) => v.len(),
            MetaColumn::Text(v) => v.len(),
        }
    }

    /// Store a decoded metadata value at a tuple index.
    ///
    /// Returns `false` when the value kind does not match the column type or
    /// the index is out of range; the caller decides whether that is worth a
    /// warning.
    pub fn set_from(&mut self, index: usize, value: &MetaValue) -> bool {
        match (self, value) {
            (MetaColumn::Int32(col), MetaValue::Int32(v)) if index < col.len() => {
                col[index] = *v;
                true
            }
            (MetaColumn::Float32(col), MetaValue::Float32(v)) if index < col.len() => {
                col[index] = *v;
                true
            }
            (MetaColumn::Text(col), MetaValue::Text(v)) if index < col.len() => {
                col[index] = v.clone();
                true
            }
            _ => false,
        }
    }
}

// =============================================================================
// AttributeMatrix
// =============================================================================

/// A named collection of equally sized typed arrays.
#[derive(Debug, Clone, Default)]
pub struct AttributeMatrix {
    name: String,
    tuple_dims: Vec<usize>,
    arrays: BTreeMap<String, MetaColumn>,
}

impl AttributeMatrix {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn tuple_dims(&self) -> &[usize] {
        &self.tuple_dims
    }

    /// Total tuple count, the product of the tuple dimensions.
    pub fn tuple_count(&self) -> usize {
        self.tuple_dims.iter().product()
    }

    /// Add a typed array under a unique name.
    pub fn add_array(&mut self, name: impl Into<String>, column: MetaColumn) -> Result<(), StoreError> {
        let name = name.into();
        if self.arrays.contains_key(&name) {
            return Err(StoreError::DuplicateArray(name, self.name.clone()));
        }
        self.arrays.insert(name, column);
        Ok(())
    }

    /// Remove an array by name, returning it.
    pub fn remove_array(&mut self, name: &str) -> Result<MetaColumn, StoreError> {
        self.arrays
            .remove(name)
            .ok_or_else(|| StoreError::MissingArray(name.to_owned(), self.name.clone()))
    }

    pub fn get_array(&self, name: &str) -> Option<&MetaColumn> {
        self.arrays.get(name)
    }

    pub fn get_array_mut(&mut self, name: &str) -> Option<&mut MetaColumn> {
        self.arrays.get_mut(name)
    }

    pub fn contains_array(&self, name: &str) -> bool {
        self.arrays.contains_key(name)
    }

    /// Array names in sorted order.
    pub fn array_names(&self) -> impl Iterator<Item = &str> {
        self.arrays.keys().map(String::as_str)
    }

    pub fn array_count(&self) -> usize {
        self.arrays.len()
    }
}

// =============================================================================
// DataContainer
// =============================================================================

/// Top-level destination container, one per import run.
#[derive(Debug, Clone)]
pub struct DataContainer {
    name: String,
    matrices: BTreeMap<String, AttributeMatrix>,
}

impl DataContainer {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            matrices: BTreeMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Create an attribute matrix with the given tuple dimensions.
    pub fn create_attribute_matrix(
        &mut self,
        name: impl Into<String>,
        tuple_dims: Vec<usize>,
    ) -> Result<&mut AttributeMatrix, StoreError> {
        let name = name.into();
        if self.matrices.contains_key(&name) {
            return Err(StoreError::DuplicateMatrix(name));
        }
        let matrix = AttributeMatrix {
            name: name.clone(),
            tuple_dims,
            arrays: BTreeMap::new(),
        };
        Ok(self.matrices.entry(name).or_insert(matrix))
    }

    pub fn matrix(&self, name: &str) -> Result<&AttributeMatrix, StoreError> {
        self.matrices
            .get(name)
            .ok_or_else(|| StoreError::MissingMatrix(name.to_owned()))
    }

    pub fn matrix_mut(&mut self, name: &str) -> Result<&mut AttributeMatrix, StoreError> {
        self.matrices
            .get_mut(name)
            .ok_or_else(|| StoreError::MissingMatrix(name.to_owned()))
    }

    pub fn matrix_names(&self) -> impl Iterator<Item = &str> {
        self.matrices.keys().map(String::as_str)
    }
}

// =============================================================================
// Tests
// =============================================================================
