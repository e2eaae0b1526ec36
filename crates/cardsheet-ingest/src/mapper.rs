//! Positional mapping of tokenized rows onto schema records.

use cardsheet_model::{
    FieldKind, FieldParseError, FieldValue, ImportRequest, Record, RecordSchema, SchemaError,
};
use tracing::warn;

/// Row and column skipping for one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MapConfig {
    pub skip_first_row: bool,
    pub skip_first_column: bool,
}

impl From<&ImportRequest> for MapConfig {
    fn from(request: &ImportRequest) -> Self {
        Self {
            skip_first_row: request.skip_first_row,
            skip_first_column: request.skip_first_column,
        }
    }
}

/// What a single row turned into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowOutcome {
    Record(Record),
    /// Header row under `skip_first_row`, or a line with no fields.
    Skipped,
}

/// Maps field rows onto records according to a validated schema.
#[derive(Debug, Clone)]
pub struct RecordMapper {
    schema: RecordSchema,
    /// Schema column positions sorted by row index, so the leftmost bad
    /// cell is the one reported.
    parse_order: Vec<usize>,
}

impl RecordMapper {
    pub fn new(schema: RecordSchema) -> Result<Self, SchemaError> {
        schema.validate()?;
        let mut parse_order: Vec<usize> = (0..schema.columns.len()).collect();
        parse_order.sort_by_key(|&slot| schema.columns[slot].index);
        Ok(Self {
            schema,
            parse_order,
        })
    }

    /// Mapper for the built-in card schema.
    pub fn card() -> Self {
        let schema = RecordSchema::card();
        let parse_order = (0..schema.columns.len()).collect();
        Self {
            schema,
            parse_order,
        }
    }

    pub fn schema(&self) -> &RecordSchema {
        &self.schema
    }

    /// Map one row.
    ///
    /// With `skip_first_column` the row is shifted left by one before
    /// schema indices apply. Columns missing from a short row keep their
    /// defaults; columns beyond the schema are ignored. Error positions
    /// refer to the unshifted row.
    pub fn map(
        &self,
        fields: &[String],
        ordinal: usize,
        config: MapConfig,
    ) -> Result<RowOutcome, FieldParseError> {
        if config.skip_first_row && ordinal == 0 {
            return Ok(RowOutcome::Skipped);
        }
        if fields.is_empty() {
            return Ok(RowOutcome::Skipped);
        }

        let offset = usize::from(config.skip_first_column);
        let row = fields.get(offset..).unwrap_or_default();
        let mut record = Record::with_defaults(&self.schema);

        for &slot in &self.parse_order {
            let column = &self.schema.columns[slot];
            let Some(raw) = row.get(column.index) else {
                continue;
            };
            let value = match column.kind {
                FieldKind::Text => FieldValue::Text(raw.clone()),
                FieldKind::Integer => {
                    // Cells hold 32-bit integers; wider values are parse errors.
                    let parsed = raw
                        .trim()
                        .parse::<i32>()
                        .map(i64::from)
                        .map_err(|_| FieldParseError {
                            position: column.index + offset,
                            field: column.field.clone(),
                            raw_value: raw.clone(),
                        })?;
                    if column.out_of_range(parsed) {
                        warn!(
                            line = ordinal,
                            field = %column.field,
                            value = parsed,
                            range = ?column.range,
                            "value outside documented range"
                        );
                    }
                    FieldValue::Integer(parsed)
                }
            };
            record.set(&column.field, value);
        }

        Ok(RowOutcome::Record(record))
    }
}

impl Default for RecordMapper {
    fn default() -> Self {
        Self::card()
    }
}
