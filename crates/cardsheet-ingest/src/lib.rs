//! Spreadsheet CSV ingestion.
//!
//! This crate turns a user-supplied spreadsheet link into records:
//!
//! - **URL resolution**: find the document id in a `/d/<id>/` link and build
//!   the CSV export address
//! - **Remote fetch**: GET the export, insist on `text/csv`, stream lines
//! - **Tokenizing**: split a line into raw field values
//! - **Mapping**: apply a declarative schema to produce a [`Record`]
//!
//! # Example
//!
//! ```no_run
//! use cardsheet_ingest::{HttpFetcher, MapConfig, RecordMapper, SheetFetcher, resolve, tokenize};
//!
//! let document = resolve("https://docs.google.com/spreadsheets/d/abc123/edit")?;
//! let body = HttpFetcher::new()?.fetch(&document.export_url())?;
//! let mapper = RecordMapper::card();
//! for line in body.lines() {
//!     let line = line?;
//!     let fields = tokenize(&line.text);
//!     let _ = mapper.map(&fields, line.ordinal, MapConfig::default());
//! }
//! # Ok::<(), cardsheet_ingest::IngestError>(())
//! ```
//!
//! [`Record`]: cardsheet_model::Record

mod error;
mod fetch;
mod mapper;
mod tokenize;
mod url;

// === Error Types ===
pub use error::{IngestError, Result};

// === URL Resolution ===
pub use url::{export_url, resolve};

// === Remote Fetch ===
pub use fetch::{
    CSV_MEDIA_TYPE, HttpFetcher, Lines, RawLine, SheetBody, SheetFetcher, check_content_type,
};

// === Tokenizing and Mapping ===
pub use mapper::{MapConfig, RecordMapper, RowOutcome};
pub use tokenize::tokenize;
