//! Error types shared by the mapping and configuration layers.

use serde::Serialize;
use thiserror::Error;

/// A numeric cell that could not be parsed as an integer.
///
/// `position` is the column index in the row as fetched, before any
/// skip-first-column shift, so it points at the cell the user has to fix.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("column {position} ({field}): '{raw_value}' is not an integer")]
pub struct FieldParseError {
    pub position: usize,
    pub field: String,
    pub raw_value: String,
}

/// Problems with a declarative record schema.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("schema declares no columns")]
    Empty,

    #[error("column index {index} is declared more than once")]
    DuplicateIndex { index: usize },

    #[error("field '{field}' is declared more than once")]
    DuplicateField { field: String },

    #[error("name field '{field}' is not a declared column")]
    UnknownNameField { field: String },

    #[error("name field '{field}' must be a text column")]
    NameFieldNotText { field: String },

    #[error("field '{field}' has an inverted range [{min}, {max}]")]
    InvertedRange { field: String, min: i64, max: i64 },
}
