//! End-to-end runs of the import pipeline against an in-memory sheet and a
//! temporary project directory.

use std::cell::RefCell;
use std::fs;
use std::io::{self, Read};
use std::path::Path;

use cardsheet_cli::pipeline::{ImportError, ImportPipeline};
use cardsheet_ingest::{IngestError, SheetBody, SheetFetcher, check_content_type};
use cardsheet_model::{
    CardRecord, FieldValue, ImportOptions, ImportRequest, RowErrorKind, RowErrorPolicy,
};
use cardsheet_output::{FsAssetStore, OutputError};
use tempfile::TempDir;

const SHEET_URL: &str = "https://docs.google.com/spreadsheets/d/doc42/edit#gid=0";
const EXPORT_URL: &str = "https://docs.google.com/spreadsheets/d/doc42/export?format=csv";

/// Serves a fixed body and remembers every requested URL.
struct FakeFetcher {
    content_type: &'static str,
    body: String,
    requests: RefCell<Vec<String>>,
}

impl FakeFetcher {
    fn csv(body: &str) -> Self {
        Self {
            content_type: "text/csv",
            body: body.to_string(),
            requests: RefCell::new(Vec::new()),
        }
    }

    fn html() -> Self {
        Self {
            content_type: "text/html; charset=utf-8",
            ..Self::csv("<html></html>")
        }
    }
}

impl SheetFetcher for FakeFetcher {
    fn fetch(&self, url: &str) -> Result<SheetBody, IngestError> {
        self.requests.borrow_mut().push(url.to_string());
        check_content_type(url, Some(self.content_type))?;
        Ok(SheetBody::from_text(url, self.body.clone()))
    }
}

/// Sends two rows, then fails the read as a dropped connection would.
struct DroppingReader {
    sent: bool,
}

impl Read for DroppingReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.sent {
            return Err(io::Error::other("connection reset"));
        }
        self.sent = true;
        let chunk = b"Dragon,3,2,1\nGoblin,1,1,0\n";
        buf[..chunk.len()].copy_from_slice(chunk);
        Ok(chunk.len())
    }
}

struct DroppingFetcher;

impl SheetFetcher for DroppingFetcher {
    fn fetch(&self, url: &str) -> Result<SheetBody, IngestError> {
        Ok(SheetBody::from_reader(url, DroppingReader { sent: false }))
    }
}

fn project() -> TempDir {
    let dir = tempfile::tempdir().expect("create temp dir");
    fs::create_dir(dir.path().join("Assets")).expect("create root folder");
    dir
}

fn card(dir: &Path, name: &str) -> CardRecord {
    let store = FsAssetStore::new(dir);
    let path = dir
        .join("Assets")
        .join("Cards")
        .join(format!("{name}.asset"));
    let record = store.read_record(&path, "cardName").expect("read artifact");
    CardRecord::from(&record)
}

fn artifact_count(dir: &Path) -> usize {
    fs::read_dir(dir.join("Assets").join("Cards"))
        .map(Iterator::count)
        .unwrap_or(0)
}

#[test]
fn header_row_is_skipped_and_rows_become_artifacts() {
    let dir = project();
    let fetcher = FakeFetcher::csv("Name,Level,Attack,Defense\nDragon,3,2,1\nGoblin,1,1,0\n");
    let pipeline = ImportPipeline::new(&fetcher, FsAssetStore::new(dir.path()));
    let request = ImportRequest::new(SHEET_URL).with_skip_first_row(true);

    let summary = pipeline.run(&request).expect("import");

    assert_eq!(fetcher.requests.borrow().as_slice(), [EXPORT_URL]);
    assert_eq!(summary.document_id, "doc42");
    assert_eq!(summary.created, 2);
    assert_eq!(summary.skipped, 1);
    assert!(!summary.has_errors());
    assert_eq!(summary.artifacts.len(), 2);
    assert_eq!(
        card(dir.path(), "Dragon"),
        CardRecord {
            card_name: "Dragon".to_string(),
            level: 3,
            attack: 2,
            defense: 1,
        }
    );
    assert_eq!(card(dir.path(), "Goblin").level, 1);
}

#[test]
fn rerun_overwrites_instead_of_duplicating() {
    let dir = project();
    let request = ImportRequest::new(SHEET_URL);

    let first = FakeFetcher::csv("Dragon,3,2,1\nGoblin,1,1,0");
    ImportPipeline::new(&first, FsAssetStore::new(dir.path()))
        .run(&request)
        .expect("first run");
    let second = FakeFetcher::csv("Dragon,3,0,1\nGoblin,1,1,0");
    ImportPipeline::new(&second, FsAssetStore::new(dir.path()))
        .run(&request)
        .expect("second run");

    assert_eq!(artifact_count(dir.path()), 2);
    assert_eq!(card(dir.path(), "Dragon").attack, 0);
}

#[test]
fn destination_folders_are_created_under_existing_root() {
    let dir = project();
    let fetcher = FakeFetcher::csv("Dragon,3,2,1");
    let pipeline = ImportPipeline::new(&fetcher, FsAssetStore::new(dir.path()));
    let request = ImportRequest::new(SHEET_URL).with_destination("Assets/Cards/Rare/");

    let summary = pipeline.run(&request).expect("import");

    assert_eq!(summary.destination, "Assets/Cards/Rare");
    let rare = dir.path().join("Assets").join("Cards").join("Rare");
    assert!(rare.join("Dragon.asset").is_file());
}

#[test]
fn sheet_without_records_creates_no_folders() {
    let dir = project();
    let fetcher = FakeFetcher::csv("Name,Level,Attack,Defense\n");
    let pipeline = ImportPipeline::new(&fetcher, FsAssetStore::new(dir.path()));
    let request = ImportRequest::new(SHEET_URL).with_skip_first_row(true);

    let summary = pipeline.run(&request).expect("import");

    assert_eq!(summary.created, 0);
    assert!(!dir.path().join("Assets").join("Cards").exists());
}

#[test]
fn bad_row_is_reported_and_run_continues() {
    let dir = project();
    let fetcher = FakeFetcher::csv("Dragon,3,2,1\nImp,x,1,1\nGoblin,1,1,0");
    let pipeline = ImportPipeline::new(&fetcher, FsAssetStore::new(dir.path()));

    let summary = pipeline.run(&ImportRequest::new(SHEET_URL)).expect("import");

    assert_eq!(summary.created, 2);
    assert_eq!(summary.errors.len(), 1);
    let error = &summary.errors[0];
    assert_eq!(error.line, 1);
    match &error.kind {
        RowErrorKind::FieldParse(parse) => {
            assert_eq!(parse.position, 1);
            assert_eq!(parse.field, "level");
            assert_eq!(parse.raw_value, "x");
        }
        other => panic!("unexpected row error: {other:?}"),
    }
    assert_eq!(artifact_count(dir.path()), 2);
}

#[test]
fn fail_fast_stops_at_first_bad_row() {
    let dir = project();
    let fetcher = FakeFetcher::csv("Dragon,3,2,1\nImp,x,1,1\nGoblin,1,1,0");
    let pipeline = ImportPipeline::new(&fetcher, FsAssetStore::new(dir.path()))
        .with_options(ImportOptions::new().with_row_errors(RowErrorPolicy::Abort));

    let err = pipeline
        .run(&ImportRequest::new(SHEET_URL))
        .expect_err("abort on bad row");

    match err {
        ImportError::Aborted { error } => assert_eq!(error.line, 1),
        other => panic!("unexpected error: {other}"),
    }
    assert!(!dir.path().join("Assets").join("Cards").exists());
}

#[test]
fn fail_fast_keeps_artifacts_from_earlier_runs() {
    let dir = project();
    let request = ImportRequest::new(SHEET_URL);
    let first = FakeFetcher::csv("Dragon,3,2,1");
    ImportPipeline::new(&first, FsAssetStore::new(dir.path()))
        .run(&request)
        .expect("first run");

    let second = FakeFetcher::csv("Dragon,3,0,1
Goblin,1,1,0
Imp,x,1,1");
    ImportPipeline::new(&second, FsAssetStore::new(dir.path()))
        .with_options(ImportOptions::new().with_row_errors(RowErrorPolicy::Abort))
        .run(&request)
        .expect_err("abort on bad row");

    assert_eq!(artifact_count(dir.path()), 1);
    assert_eq!(card(dir.path(), "Dragon").attack, 2);
}

#[test]
fn connection_lost_mid_body_leaves_nothing_behind() {
    let dir = project();
    let fetcher = DroppingFetcher;
    let pipeline = ImportPipeline::new(&fetcher, FsAssetStore::new(dir.path()));
    let request = ImportRequest::new(SHEET_URL).with_destination("Assets/Cards/Rare");

    let err = pipeline.run(&request).expect_err("read failure");

    match err {
        ImportError::Ingest(IngestError::Network { url, message }) => {
            assert_eq!(url, EXPORT_URL);
            assert!(message.contains("connection reset"), "{message}");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(!dir.path().join("Assets").join("Cards").exists());
}

#[test]
fn link_without_document_segment_fetches_nothing() {
    let dir = project();
    let fetcher = FakeFetcher::csv("Dragon,3,2,1");
    let pipeline = ImportPipeline::new(&fetcher, FsAssetStore::new(dir.path()));

    let err = pipeline
        .run(&ImportRequest::new("https://docs.google.com/spreadsheets/"))
        .expect_err("invalid link");

    assert!(matches!(
        err,
        ImportError::Ingest(IngestError::InvalidUrl { .. })
    ));
    assert!(fetcher.requests.borrow().is_empty());
    assert_eq!(artifact_count(dir.path()), 0);
}

#[test]
fn html_response_writes_nothing() {
    let dir = project();
    let fetcher = FakeFetcher::html();
    let pipeline = ImportPipeline::new(&fetcher, FsAssetStore::new(dir.path()));

    let err = pipeline
        .run(&ImportRequest::new(SHEET_URL))
        .expect_err("html rejected");

    assert!(matches!(
        err,
        ImportError::Ingest(IngestError::UnexpectedContentType { .. })
    ));
    assert!(!dir.path().join("Assets").join("Cards").exists());
}

#[test]
fn dry_run_counts_without_writing() {
    let dir = project();
    let fetcher = FakeFetcher::csv("Dragon,3,2,1\nGoblin,1,1,0");
    let pipeline = ImportPipeline::new(&fetcher, FsAssetStore::new(dir.path()))
        .with_options(ImportOptions::new().with_dry_run(true));

    let summary = pipeline.run(&ImportRequest::new(SHEET_URL)).expect("import");

    assert!(summary.dry_run);
    assert_eq!(summary.created, 2);
    assert!(summary.artifacts.is_empty());
    assert!(!dir.path().join("Assets").join("Cards").exists());
}

#[test]
fn skip_first_column_shifts_the_row() {
    let dir = project();
    let fetcher = FakeFetcher::csv("7,Dragon,3,2,1");
    let pipeline = ImportPipeline::new(&fetcher, FsAssetStore::new(dir.path()));
    let request = ImportRequest::new(SHEET_URL).with_skip_first_column(true);

    pipeline.run(&request).expect("import");

    let dragon = card(dir.path(), "Dragon");
    assert_eq!((dragon.level, dragon.attack, dragon.defense), (3, 2, 1));
}

#[test]
fn missing_root_folder_is_fatal() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let fetcher = FakeFetcher::csv("Dragon,3,2,1");
    let pipeline = ImportPipeline::new(&fetcher, FsAssetStore::new(dir.path()));

    let err = pipeline
        .run(&ImportRequest::new(SHEET_URL))
        .expect_err("missing root");

    assert!(matches!(
        err,
        ImportError::Output(OutputError::MissingRoot { .. })
    ));
    assert!(!dir.path().join("Assets").exists());
}

#[test]
fn unwritable_name_is_a_row_error() {
    let dir = project();
    let fetcher = FakeFetcher::csv("Fire/Ice,1,1,1\nGoblin,1,1,0");
    let pipeline = ImportPipeline::new(&fetcher, FsAssetStore::new(dir.path()));

    let summary = pipeline.run(&ImportRequest::new(SHEET_URL)).expect("import");

    assert_eq!(summary.created, 1);
    assert_eq!(summary.errors.len(), 1);
    assert!(matches!(
        &summary.errors[0].kind,
        RowErrorKind::Write { name, .. } if name == "Fire/Ice"
    ));
}

#[test]
fn blank_lines_and_short_rows() {
    let dir = project();
    let fetcher = FakeFetcher::csv("Dragon,3\n\n   \nGoblin\n");
    let pipeline = ImportPipeline::new(&fetcher, FsAssetStore::new(dir.path()));

    let summary = pipeline.run(&ImportRequest::new(SHEET_URL)).expect("import");

    assert_eq!(summary.created, 2);
    assert_eq!(summary.skipped, 2);
    let dragon = card(dir.path(), "Dragon");
    assert_eq!((dragon.level, dragon.attack, dragon.defense), (3, 0, 0));
    let goblin = FsAssetStore::new(dir.path())
        .read_record(
            &dir.path()
                .join("Assets")
                .join("Cards")
                .join("Goblin.asset"),
            "cardName",
        )
        .expect("read goblin");
    assert_eq!(goblin.get("level"), Some(&FieldValue::Integer(0)));
}

#[test]
fn quoted_cells_keep_commas() {
    let dir = project();
    let fetcher = FakeFetcher::csv("\"Dragon, Elder\",\" 3 \",2,1");
    let pipeline = ImportPipeline::new(&fetcher, FsAssetStore::new(dir.path()));

    pipeline.run(&ImportRequest::new(SHEET_URL)).expect("import");

    let elder = card(dir.path(), "Dragon, Elder");
    assert_eq!(elder.level, 3);
}
