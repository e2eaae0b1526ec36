//! Options controlling how a run treats rows and artifacts.

use serde::{Deserialize, Serialize};

/// Extension given to written artifacts when none is configured.
pub const DEFAULT_EXTENSION: &str = "asset";

/// What happens when a single row fails to map or write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowErrorPolicy {
    /// Record the error, skip the row, keep going.
    #[default]
    Continue,
    /// Stop the run at the first failing row.
    Abort,
}

/// Options for one import run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportOptions {
    #[serde(default)]
    pub row_errors: RowErrorPolicy,
    /// Map every row but write nothing.
    #[serde(default)]
    pub dry_run: bool,
    #[serde(default = "default_extension")]
    pub extension: String,
}

fn default_extension() -> String {
    DEFAULT_EXTENSION.to_string()
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            row_errors: RowErrorPolicy::default(),
            dry_run: false,
            extension: default_extension(),
        }
    }
}

impl ImportOptions {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_row_errors(mut self, policy: RowErrorPolicy) -> Self {
        self.row_errors = policy;
        self
    }

    #[must_use]
    pub fn with_dry_run(mut self, enable: bool) -> Self {
        self.dry_run = enable;
        self
    }

    #[must_use]
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }
}
