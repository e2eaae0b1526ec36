//! Declarative column-to-field schema.
//!
//! A schema maps a positional column index onto a named field and the
//! parser used for it. The built-in [`RecordSchema::card`] describes the
//! card sheet layout; other record shapes only need a different table.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::SchemaError;

/// How a cell is coerced into a field value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    /// Raw string, no coercion.
    #[default]
    Text,
    /// Parsed as a signed integer.
    Integer,
}

impl FieldKind {
    /// Human-readable label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Integer => "integer",
        }
    }
}

/// One entry of the schema table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSpec {
    /// Column position in the (possibly shifted) row.
    pub index: usize,
    /// Field name in the produced record.
    pub field: String,
    #[serde(default)]
    pub kind: FieldKind,
    /// Documented value range for integer fields. Not enforced.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<[i64; 2]>,
}

impl ColumnSpec {
    pub fn text(index: usize, field: impl Into<String>) -> Self {
        Self {
            index,
            field: field.into(),
            kind: FieldKind::Text,
            range: None,
        }
    }

    pub fn integer(index: usize, field: impl Into<String>) -> Self {
        Self {
            index,
            field: field.into(),
            kind: FieldKind::Integer,
            range: None,
        }
    }

    #[must_use]
    pub fn with_range(mut self, min: i64, max: i64) -> Self {
        self.range = Some([min, max]);
        self
    }

    /// Returns true when `value` falls outside the documented range.
    #[must_use]
    pub fn out_of_range(&self, value: i64) -> bool {
        match self.range {
            Some([min, max]) => value < min || value > max,
            None => false,
        }
    }
}

/// Ordered schema table plus the field used to name artifacts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordSchema {
    pub name_field: String,
    pub columns: Vec<ColumnSpec>,
}

impl RecordSchema {
    /// The card layout: name, level, attack, defense at columns 0..=3.
    #[must_use]
    pub fn card() -> Self {
        Self {
            name_field: "cardName".to_string(),
            columns: vec![
                ColumnSpec::text(0, "cardName"),
                ColumnSpec::integer(1, "level").with_range(0, 3),
                ColumnSpec::integer(2, "attack").with_range(0, 3),
                ColumnSpec::integer(3, "defense").with_range(0, 3),
            ],
        }
    }

    /// Check structural consistency of the table.
    pub fn validate(&self) -> Result<(), SchemaError> {
        if self.columns.is_empty() {
            return Err(SchemaError::Empty);
        }
        let mut indices = BTreeSet::new();
        let mut fields = BTreeSet::new();
        for column in &self.columns {
            if !indices.insert(column.index) {
                return Err(SchemaError::DuplicateIndex {
                    index: column.index,
                });
            }
            if !fields.insert(column.field.as_str()) {
                return Err(SchemaError::DuplicateField {
                    field: column.field.clone(),
                });
            }
            if let Some([min, max]) = column.range
                && min > max
            {
                return Err(SchemaError::InvertedRange {
                    field: column.field.clone(),
                    min,
                    max,
                });
            }
        }
        match self.column(&self.name_field) {
            None => Err(SchemaError::UnknownNameField {
                field: self.name_field.clone(),
            }),
            Some(column) if column.kind != FieldKind::Text => Err(SchemaError::NameFieldNotText {
                field: self.name_field.clone(),
            }),
            Some(_) => Ok(()),
        }
    }

    /// Look up a column by field name.
    pub fn column(&self, field: &str) -> Option<&ColumnSpec> {
        self.columns.iter().find(|column| column.field == field)
    }
}

impl Default for RecordSchema {
    fn default() -> Self {
        Self::card()
    }
}
