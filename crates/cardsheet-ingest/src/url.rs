//! Document id extraction from user-supplied spreadsheet links.

use cardsheet_model::DocumentReference;
use reqwest::Url;
use tracing::debug;

use crate::error::{IngestError, Result};

/// Extract the document id from a link of the form `.../d/<id>/...`.
///
/// The id segment must be followed by another `/`; a link ending in
/// `/d/<id>` without the trailing separator is rejected.
pub fn resolve(source_url: &str) -> Result<DocumentReference> {
    let url = Url::parse(source_url.trim())
        .map_err(|e| IngestError::invalid_url(source_url, e.to_string()))?;
    let segments: Vec<&str> = url
        .path_segments()
        .map(Iterator::collect)
        .ok_or_else(|| IngestError::invalid_url(source_url, "URL has no path"))?;

    let position = segments
        .iter()
        .enumerate()
        .position(|(index, segment)| *segment == "d" && index + 2 < segments.len())
        .ok_or_else(|| IngestError::invalid_url(source_url, "no /d/<id>/ segment in path"))?;

    let document = DocumentReference::new(segments[position + 1])
        .ok_or_else(|| IngestError::invalid_url(source_url, "empty document id"))?;
    debug!(document_id = %document, "resolved document id");
    Ok(document)
}

/// Resolve a link straight to its CSV export address.
pub fn export_url(source_url: &str) -> Result<String> {
    resolve(source_url).map(|document| document.export_url())
}
