//! Materialized records.

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::schema::{FieldKind, RecordSchema};

/// A single typed field value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Integer(i64),
    Text(String),
}

impl FieldValue {
    /// The value a field holds when its column is absent from the row.
    #[must_use]
    pub fn default_for(kind: FieldKind) -> Self {
        match kind {
            FieldKind::Text => Self::Text(String::new()),
            FieldKind::Integer => Self::Integer(0),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(value) => Some(value),
            Self::Integer(_) => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(value) => Some(*value),
            Self::Text(_) => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(value) => write!(f, "{value}"),
            Self::Text(value) => f.write_str(value),
        }
    }
}

/// A record built from one row, fields kept in schema order.
///
/// Serializes as a flat map so the on-disk form lists fields in the same
/// order as the schema table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    name_field: String,
    fields: Vec<(String, FieldValue)>,
}

impl Record {
    /// A record with every schema field at its default value.
    #[must_use]
    pub fn with_defaults(schema: &RecordSchema) -> Self {
        Self {
            name_field: schema.name_field.clone(),
            fields: schema
                .columns
                .iter()
                .map(|column| (column.field.clone(), FieldValue::default_for(column.kind)))
                .collect(),
        }
    }

    /// Replace the value of an existing field. Unknown fields are ignored.
    pub fn set(&mut self, field: &str, value: FieldValue) {
        if let Some(slot) = self.fields.iter_mut().find(|(name, _)| name == field) {
            slot.1 = value;
        }
    }

    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.fields
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, value)| value)
    }

    /// The value of the schema's name field, used to name the artifact.
    pub fn name(&self) -> &str {
        self.get(&self.name_field)
            .and_then(FieldValue::as_text)
            .unwrap_or_default()
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Re-attach the name field after deserialization.
    #[must_use]
    pub fn with_name_field(mut self, name_field: impl Into<String>) -> Self {
        self.name_field = name_field.into();
        self
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Record {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct RecordVisitor;

        impl<'de> Visitor<'de> for RecordVisitor {
            type Value = Record;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of field names to values")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Record, A::Error> {
                let mut fields = Vec::new();
                while let Some((name, value)) = access.next_entry::<String, FieldValue>()? {
                    fields.push((name, value));
                }
                // The first text field is the best guess until the caller
                // supplies the schema's name field.
                let name_field = fields
                    .iter()
                    .find(|(_, value)| matches!(value, FieldValue::Text(_)))
                    .map(|(name, _)| name.clone())
                    .unwrap_or_default();
                Ok(Record { name_field, fields })
            }
        }

        deserializer.deserialize_map(RecordVisitor)
    }
}

/// The card shape produced by [`RecordSchema::card`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardRecord {
    pub card_name: String,
    pub level: i64,
    pub attack: i64,
    pub defense: i64,
}

impl From<&Record> for CardRecord {
    fn from(record: &Record) -> Self {
        let integer = |field: &str| {
            record
                .get(field)
                .and_then(FieldValue::as_integer)
                .unwrap_or_default()
        };
        Self {
            card_name: record
                .get("cardName")
                .and_then(FieldValue::as_text)
                .unwrap_or_default()
                .to_string(),
            level: integer("level"),
            attack: integer("attack"),
            defense: integer("defense"),
        }
    }
}
