//! Import profiles.
//!
//! A profile is an optional TOML file holding defaults for a run:
//!
//! ```toml
//! source_url = "https://docs.google.com/spreadsheets/d/abc123/edit"
//! destination_path = "Assets/Cards/Rare"
//! skip_first_row = true
//! project_root = "../game"
//! extension = "asset"
//! row_errors = "abort"
//! timeout_secs = 30
//!
//! [schema]
//! name_field = "cardName"
//!
//! [[schema.columns]]
//! index = 0
//! field = "cardName"
//! ```
//!
//! Command-line flags win over the profile, and the profile wins over the
//! built-in defaults.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use cardsheet_model::{
    DEFAULT_DESTINATION, ImportOptions, ImportRequest, RecordSchema, RowErrorPolicy, SchemaError,
};
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read profile {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse profile {path}: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid schema in profile {path}: {source}")]
    Schema {
        path: PathBuf,
        #[source]
        source: SchemaError,
    },

    #[error("no source URL given on the command line or in the profile")]
    MissingSourceUrl,
}

/// Defaults read from a profile file. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ImportProfile {
    pub source_url: Option<String>,
    pub destination_path: Option<String>,
    pub skip_first_row: Option<bool>,
    pub skip_first_column: Option<bool>,
    /// Directory the destination path is resolved against. Relative
    /// paths are taken relative to the profile file.
    pub project_root: Option<PathBuf>,
    pub extension: Option<String>,
    pub row_errors: Option<RowErrorPolicy>,
    pub timeout_secs: Option<u64>,
    pub schema: Option<RecordSchema>,
}

/// Values given on the command line. `false` flags mean "not given".
#[derive(Debug, Clone, Default)]
pub struct ImportOverrides {
    pub source_url: Option<String>,
    pub destination_path: Option<String>,
    pub skip_first_row: bool,
    pub skip_first_column: bool,
    pub project_root: Option<PathBuf>,
    pub extension: Option<String>,
    pub fail_fast: bool,
    pub dry_run: bool,
    pub timeout_secs: Option<u64>,
}

/// Everything needed to run one import.
#[derive(Debug, Clone)]
pub struct ImportSettings {
    pub request: ImportRequest,
    pub options: ImportOptions,
    pub schema: RecordSchema,
    pub project_root: PathBuf,
    pub timeout: Option<Duration>,
}

impl ImportProfile {
    /// Load and validate a profile.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut profile: Self = toml::from_str(&contents).map_err(|source| ConfigError::Toml {
            path: path.to_path_buf(),
            source,
        })?;
        if let Some(schema) = &profile.schema {
            schema.validate().map_err(|source| ConfigError::Schema {
                path: path.to_path_buf(),
                source,
            })?;
        }
        if let Some(root) = profile.project_root.take() {
            let base = path.parent().unwrap_or_else(|| Path::new(""));
            profile.project_root = Some(if root.is_relative() {
                base.join(root)
            } else {
                root
            });
        }
        Ok(profile)
    }

    /// Load the profile at `path`, or the empty profile when there is none.
    pub fn load_optional(path: Option<&Path>) -> Result<Self, ConfigError> {
        path.map_or_else(|| Ok(Self::default()), Self::load)
    }

    /// Schema from the profile, or the card schema.
    pub fn schema(&self) -> RecordSchema {
        self.schema.clone().unwrap_or_default()
    }

    /// Merge command-line values over this profile.
    pub fn resolve(self, overrides: ImportOverrides) -> Result<ImportSettings, ConfigError> {
        let source_url = overrides
            .source_url
            .or(self.source_url)
            .ok_or(ConfigError::MissingSourceUrl)?;
        let destination = overrides
            .destination_path
            .or(self.destination_path)
            .unwrap_or_else(|| DEFAULT_DESTINATION.to_string());
        let request = ImportRequest::new(source_url)
            .with_destination(destination)
            .with_skip_first_row(overrides.skip_first_row || self.skip_first_row.unwrap_or(false))
            .with_skip_first_column(
                overrides.skip_first_column || self.skip_first_column.unwrap_or(false),
            );

        let row_errors = if overrides.fail_fast {
            RowErrorPolicy::Abort
        } else {
            self.row_errors.unwrap_or_default()
        };
        let mut options = ImportOptions::new()
            .with_row_errors(row_errors)
            .with_dry_run(overrides.dry_run);
        if let Some(extension) = overrides.extension.or(self.extension) {
            options = options.with_extension(extension);
        }

        Ok(ImportSettings {
            request,
            options,
            schema: self.schema.unwrap_or_default(),
            project_root: overrides
                .project_root
                .or(self.project_root)
                .unwrap_or_else(|| PathBuf::from(".")),
            timeout: overrides
                .timeout_secs
                .or(self.timeout_secs)
                .map(Duration::from_secs),
        })
    }
}
