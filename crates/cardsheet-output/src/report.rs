//! Machine-readable report of an import run.

use std::fs;
use std::path::{Path, PathBuf};

use cardsheet_model::ImportSummary;
use chrono::Utc;
use serde::Serialize;

use crate::error::{OutputError, Result};

const REPORT_SCHEMA: &str = "cardsheet.import-report";
const REPORT_SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Serialize)]
struct ImportReportPayload<'a> {
    schema: &'static str,
    schema_version: u32,
    generated_at: String,
    #[serde(flatten)]
    summary: &'a ImportSummary,
}

/// Write `summary` as JSON to `path`, creating parent folders as needed.
pub fn write_summary_json(path: &Path, summary: &ImportSummary) -> Result<PathBuf> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|source| OutputError::ArtifactWrite {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    let payload = ImportReportPayload {
        schema: REPORT_SCHEMA,
        schema_version: REPORT_SCHEMA_VERSION,
        generated_at: Utc::now().to_rfc3339(),
        summary,
    };
    let json = serde_json::to_string_pretty(&payload).map_err(|source| OutputError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    fs::write(path, json).map_err(|source| OutputError::ArtifactWrite {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(path.to_path_buf())
}
