//! Data types shared across the card sheet importer.
//!
//! Nothing in this crate performs I/O. The ingest crate produces
//! [`Record`]s from fetched rows, the output crate persists them, and the
//! CLI reports an [`ImportSummary`].

pub mod document;
pub mod error;
pub mod options;
pub mod record;
pub mod request;
pub mod schema;
pub mod summary;

pub use document::{DocumentReference, EXPORT_HOST};
pub use error::{FieldParseError, SchemaError};
pub use options::{DEFAULT_EXTENSION, ImportOptions, RowErrorPolicy};
pub use record::{CardRecord, FieldValue, Record};
pub use request::{DEFAULT_DESTINATION, ImportRequest};
pub use schema::{ColumnSpec, FieldKind, RecordSchema};
pub use summary::{ImportSummary, RowError, RowErrorKind};
