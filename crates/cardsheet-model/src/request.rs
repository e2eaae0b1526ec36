//! The immutable description of one import run.

use serde::{Deserialize, Serialize};

/// Destination used when none is configured.
pub const DEFAULT_DESTINATION: &str = "Assets/Cards";

/// What to import and where to put it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportRequest {
    pub source_url: String,
    #[serde(default = "default_destination")]
    pub destination_path: String,
    #[serde(default)]
    pub skip_first_row: bool,
    #[serde(default)]
    pub skip_first_column: bool,
}

fn default_destination() -> String {
    DEFAULT_DESTINATION.to_string()
}

impl ImportRequest {
    pub fn new(source_url: impl Into<String>) -> Self {
        Self {
            source_url: source_url.into(),
            destination_path: default_destination(),
            skip_first_row: false,
            skip_first_column: false,
        }
    }

    #[must_use]
    pub fn with_destination(mut self, path: impl Into<String>) -> Self {
        self.destination_path = path.into();
        self
    }

    #[must_use]
    pub fn with_skip_first_row(mut self, skip: bool) -> Self {
        self.skip_first_row = skip;
        self
    }

    #[must_use]
    pub fn with_skip_first_column(mut self, skip: bool) -> Self {
        self.skip_first_column = skip;
        self
    }

    /// Destination path with any trailing slashes removed.
    pub fn destination(&self) -> &str {
        self.destination_path.trim_end_matches('/')
    }
}
