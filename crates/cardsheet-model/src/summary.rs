//! Outcome of an import run.

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

use crate::error::FieldParseError;

/// Why a single row produced no artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RowErrorKind {
    FieldParse(FieldParseError),
    /// The store refused the artifact for this record.
    Write { name: String, message: String },
}

/// A non-fatal failure tied to a line of the fetched body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowError {
    /// 0-based line ordinal.
    pub line: usize,
    #[serde(flatten)]
    pub kind: RowErrorKind,
}

impl fmt::Display for RowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            RowErrorKind::FieldParse(error) => write!(f, "line {}: {error}", self.line),
            RowErrorKind::Write { name, message } => {
                write!(f, "line {}: could not write '{name}': {message}", self.line)
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub document_id: String,
    pub destination: String,
    /// Records written, or that would be written in a dry run.
    pub created: usize,
    pub skipped: usize,
    pub errors: Vec<RowError>,
    pub artifacts: Vec<PathBuf>,
    pub dry_run: bool,
}

impl ImportSummary {
    pub fn new(document_id: impl Into<String>, destination: impl Into<String>) -> Self {
        Self {
            document_id: document_id.into(),
            destination: destination.into(),
            ..Self::default()
        }
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Rows seen in total, including failed ones.
    pub fn rows_seen(&self) -> usize {
        self.created + self.skipped + self.errors.len()
    }
}
