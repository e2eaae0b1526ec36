//! Property tests for URL resolution and tokenizing.

use cardsheet_ingest::{IngestError, resolve, tokenize};
use proptest::prelude::*;

proptest! {
    #[test]
    fn resolve_extracts_any_id(
        id in "[A-Za-z0-9_-]{1,44}",
        prefix in "(spreadsheets/|a/b/|)",
        tail in "(edit|view|edit#gid=0|)",
    ) {
        let url = format!("https://docs.google.com/{prefix}d/{id}/{tail}");
        let document = resolve(&url).unwrap();
        prop_assert_eq!(document.document_id(), id.as_str());
        let export = document.export_url();
        let needle = format!("/d/{id}/export");
        prop_assert!(export.contains(&needle));
    }

    #[test]
    fn resolve_rejects_links_without_d_segment(
        segments in prop::collection::vec("[a-ce-z][a-z0-9]{0,6}", 0..5),
    ) {
        let url = format!("https://docs.google.com/{}/", segments.join("/"));
        let rejected = matches!(resolve(&url), Err(IngestError::InvalidUrl { .. }));
        prop_assert!(rejected);
    }

    #[test]
    fn bare_fields_round_trip(
        fields in prop::collection::vec("[A-Za-z0-9.+-]{1,8}( [A-Za-z0-9]{1,8})?", 1..8),
    ) {
        let line = fields.join(",");
        prop_assert_eq!(tokenize(&line), fields);
    }

    #[test]
    fn padding_around_fields_is_ignored(
        fields in prop::collection::vec("[A-Za-z0-9]{1,8}", 1..8),
        pad in " {0,3}",
    ) {
        let line = fields
            .iter()
            .map(|field| format!("{pad}{field}{pad}"))
            .collect::<Vec<_>>()
            .join(",");
        prop_assert_eq!(tokenize(&line), fields);
    }

    #[test]
    fn quoted_fields_keep_commas(
        fields in prop::collection::vec("[A-Za-z0-9, ]{0,10}", 1..6),
    ) {
        let line = fields
            .iter()
            .map(|field| format!("\"{field}\""))
            .collect::<Vec<_>>()
            .join(",");
        prop_assert_eq!(tokenize(&line), fields);
    }
}
