//! Spreadsheet document identity.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Host serving the CSV export of a spreadsheet.
pub const EXPORT_HOST: &str = "https://docs.google.com";

/// Identifier of a spreadsheet document, taken from its `/d/<id>/` segment.
///
/// Only the first sheet is reachable through [`DocumentReference::export_url`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DocumentReference {
    document_id: String,
}

impl DocumentReference {
    /// Returns `None` for an empty id or one containing a separator or whitespace.
    pub fn new(document_id: impl Into<String>) -> Option<Self> {
        let document_id = document_id.into();
        let valid = !document_id.is_empty()
            && !document_id
                .chars()
                .any(|c| c == '/' || c == '?' || c == '#' || c.is_whitespace());
        valid.then_some(Self { document_id })
    }

    pub fn document_id(&self) -> &str {
        &self.document_id
    }

    /// Canonical CSV export address of the document's first sheet.
    pub fn export_url(&self) -> String {
        format!(
            "{EXPORT_HOST}/spreadsheets/d/{}/export?format=csv",
            self.document_id
        )
    }
}

impl fmt::Display for DocumentReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.document_id)
    }
}
