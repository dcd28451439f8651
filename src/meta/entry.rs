//! Typed metadata entries.
//!
//! Each tag value in a `<Tags>` section decodes to a [`MetaValue`] according
//! to the [`TagSpec`] the registry holds for its id. Decoding is explicit
//! base-10 text conversion with a typed error on failure; a malformed value
//! never silently truncates to garbage.

use std::fmt;

use crate::error::ParseError;
use crate::meta::tags::{TagSpec, ValueKind};
use crate::store::MetaColumn;

// =============================================================================
// MetaValue
// =============================================================================

/// A decoded tag value.
#[derive(Debug, Clone, PartialEq)]
pub enum MetaValue {
    Int32(i32),
    Float32(f32),
    Text(String),
}

impl MetaValue {
    /// Decode raw tag text into a value of the given kind.
    ///
    /// Numeric kinds use strict base-10 parsing over the trimmed text;
    /// failures surface as [`ParseError::MalformedValue`] carrying the
    /// offending id and text. Text values are taken verbatim.
    pub fn parse(kind: ValueKind, id: i32, raw: &str) -> Result<MetaValue, ParseError> {
        let trimmed = raw.trim();
        match kind {
            ValueKind::Int32 => trimmed
                .parse::<i32>()
                .map(MetaValue::Int32)
                .map_err(|_| malformed(id, raw, kind)),
            ValueKind::Float32 => trimmed
                .parse::<f32>()
                .map(MetaValue::Float32)
                .map_err(|_| malformed(id, raw, kind)),
            ValueKind::Text => Ok(MetaValue::Text(raw.to_owned())),
        }
    }

    /// The kind this value was decoded as.
    pub fn kind(&self) -> ValueKind {
        match self {
            MetaValue::Int32(_) => ValueKind::Int32,
            MetaValue::Float32(_) => ValueKind::Float32,
            MetaValue::Text(_) => ValueKind::Text,
        }
    }

    pub fn as_i32(&self) -> Option<i32> {
        match self {
            MetaValue::Int32(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_f32(&self) -> Option<f32> {
        match self {
            MetaValue::Float32(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            MetaValue::Text(v) => Some(v),
            _ => None,
        }
    }
}

impl fmt::Display for MetaValue {
    /// Re-encode the value as text. For numeric kinds this round-trips the
    /// numeric value, not necessarily the original formatting.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetaValue::Int32(v) => write!(f, "{v}"),
            MetaValue::Float32(v) => write!(f, "{v}"),
            MetaValue::Text(v) => f.write_str(v),
        }
    }
}

fn malformed(id: i32, raw: &str, kind: ValueKind) -> ParseError {
    ParseError::MalformedValue {
        id,
        raw: raw.to_owned(),
        kind: kind.name(),
    }
}

// =============================================================================
// MetaEntry
// =============================================================================

/// One decoded metadata entry: numeric id, the raw text it was decoded from
/// and the typed value. Immutable once parsed; owned by exactly one
/// [`TagSection`](crate::meta::TagSection).
#[derive(Debug, Clone, PartialEq)]
pub struct MetaEntry {
    pub id: i32,
    pub name: &'static str,
    pub raw: String,
    pub value: MetaValue,
}

impl MetaEntry {
    /// Decode raw text according to the registry spec for its id.
    pub fn parse(spec: &TagSpec, raw: &str) -> Result<MetaEntry, ParseError> {
        let value = MetaValue::parse(spec.kind, spec.id, raw)?;
        Ok(MetaEntry {
            id: spec.id,
            name: spec.name,
            raw: raw.to_owned(),
            value,
        })
    }

    /// Create an empty, correctly typed storage column pre-sized to hold one
    /// value per image, to be filled as tiles are visited.
    pub fn make_column(&self, length: usize) -> MetaColumn {
        match self.value.kind() {
            ValueKind::Int32 => MetaColumn::Int32(vec![0; length]),
            ValueKind::Float32 => MetaColumn::Float32(vec![0.0; length]),
            ValueKind::Text => MetaColumn::Text(vec![String::new(); length]),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
