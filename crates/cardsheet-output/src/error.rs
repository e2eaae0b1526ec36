//! Error types for destination and artifact handling.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while preparing folders or writing artifacts.
#[derive(Debug, Error)]
pub enum OutputError {
    // === Destination Errors ===
    /// Logical path is empty or has an unusable segment.
    #[error("invalid destination path '{path}': {reason}")]
    InvalidPath { path: String, reason: String },

    /// The first segment of the destination must already exist.
    #[error("destination root '{root}' does not exist at {location}")]
    MissingRoot { root: String, location: PathBuf },

    /// The store refused to create a folder.
    #[error("failed to create folder '{path}': {source}")]
    FolderCreation {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// A folder created during a rolled-back run could not be removed.
    #[error("failed to remove folder '{path}': {source}")]
    FolderRemoval {
        path: String,
        #[source]
        source: std::io::Error,
    },

    // === Artifact Errors ===
    /// Record name cannot be used as a file name.
    #[error("'{name}' is not a valid artifact name")]
    InvalidArtifactName { name: String },

    #[error("failed to write {path}: {source}")]
    ArtifactWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Moving a staged artifact into place failed.
    #[error("failed to commit {path}: {source}")]
    ArtifactCommit {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to discard staged {path}: {source}")]
    ArtifactDiscard {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read {path}: {source}")]
    ArtifactRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode or decode {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl OutputError {
    /// Errors that only affect the artifact being written, not the run.
    #[must_use]
    pub fn is_artifact_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidArtifactName { .. } | Self::ArtifactWrite { .. } | Self::Json { .. }
        )
    }
}

/// Result type for output operations.
pub type Result<T> = std::result::Result<T, OutputError>;
