//! Error types for locating, fetching and reading a sheet export.

use thiserror::Error;

/// Failures that end an import before any row is mapped.
#[derive(Debug, Error)]
pub enum IngestError {
    /// The link does not carry a `/d/<id>/` document segment.
    #[error("invalid spreadsheet URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// Transport failure, non-success status, or a broken body stream.
    #[error("network error fetching {url}: {message}")]
    Network { url: String, message: String },

    /// The server answered with something other than CSV.
    #[error("unexpected content type from {url}: {} (expected text/csv)", .observed.as_deref().unwrap_or("none"))]
    UnexpectedContentType {
        url: String,
        observed: Option<String>,
    },
}

impl IngestError {
    pub(crate) fn invalid_url(url: &str, reason: impl Into<String>) -> Self {
        Self::InvalidUrl {
            url: url.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn network(url: &str, message: impl ToString) -> Self {
        Self::Network {
            url: url.to_string(),
            message: message.to_string(),
        }
    }
}

/// Result type for ingest operations.
pub type Result<T> = std::result::Result<T, IngestError>;
