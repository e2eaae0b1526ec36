//! Import pipeline with explicit stages.
//!
//! One run goes through these stages in order, once:
//! 1. **Resolve**: extract the document id from the request URL
//! 2. **Fetch**: GET the CSV export and validate its content type
//! 3. **Map**: tokenize each line and apply the record schema
//! 4. **Write**: ensure the destination folders, then stage each record
//! 5. **Commit**: move every staged artifact into place
//!
//! Stages 1 and 2 abort the run on failure. Row failures in stage 3 and 4
//! follow the configured [`RowErrorPolicy`]. Lines are streamed, so only one
//! line and one record are held in memory at a time; staged records wait on
//! disk. Any error that ends the run before stage 5 discards the staged
//! artifacts and the folders this run created.

use std::time::Instant;

use cardsheet_ingest::{
    IngestError, MapConfig, RecordMapper, RowOutcome, SheetFetcher, resolve, tokenize,
};
use cardsheet_model::{
    ImportOptions, ImportRequest, ImportSummary, Record, RowError, RowErrorKind, RowErrorPolicy,
};
use cardsheet_output::{ArtifactBatch, AssetStore, ContainerHandle, OutputError};
use thiserror::Error;
use tracing::{debug, info, info_span, trace, warn};

/// Failures that end a run.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error(transparent)]
    Ingest(#[from] IngestError),

    #[error(transparent)]
    Output(#[from] OutputError),

    /// A row failed under [`RowErrorPolicy::Abort`].
    #[error("import aborted: {error}")]
    Aborted { error: RowError },
}

/// Orchestrates one import per [`ImportPipeline::run`] call. Holds no state
/// between runs.
pub struct ImportPipeline<F, S> {
    fetcher: F,
    store: S,
    mapper: RecordMapper,
    options: ImportOptions,
}

impl<F, S> ImportPipeline<F, S>
where
    F: SheetFetcher,
    S: AssetStore,
{
    pub fn new(fetcher: F, store: S) -> Self {
        Self {
            fetcher,
            store,
            mapper: RecordMapper::card(),
            options: ImportOptions::default(),
        }
    }

    #[must_use]
    pub fn with_mapper(mut self, mapper: RecordMapper) -> Self {
        self.mapper = mapper;
        self
    }

    #[must_use]
    pub fn with_options(mut self, options: ImportOptions) -> Self {
        self.options = options;
        self
    }

    pub fn run(&self, request: &ImportRequest) -> Result<ImportSummary, ImportError> {
        // =====================================================================
        // Stage 1: Resolve
        // =====================================================================
        let document = resolve(&request.source_url)?;
        let span = info_span!("import", document_id = %document);
        let _guard = span.enter();
        let started = Instant::now();
        let destination = request.destination();

        // =====================================================================
        // Stage 2: Fetch
        // =====================================================================
        let body = self.fetcher.fetch(&document.export_url())?;

        // =====================================================================
        // Stage 3-4: Map and write, line by line
        // =====================================================================
        let config = MapConfig::from(request);
        let mut summary = ImportSummary::new(document.document_id(), destination);
        summary.dry_run = self.options.dry_run;
        let mut batch = ArtifactBatch::new(&self.store);
        let mut container: Option<ContainerHandle> = None;

        for line in body.lines() {
            let line = line?;
            let fields = tokenize(&line.text);
            trace!(line = line.ordinal, ?fields, "tokenized");

            let record = match self.mapper.map(&fields, line.ordinal, config) {
                Ok(RowOutcome::Record(record)) => record,
                Ok(RowOutcome::Skipped) => {
                    debug!(line = line.ordinal, "row skipped");
                    summary.skipped += 1;
                    continue;
                }
                Err(error) => {
                    let error = RowError {
                        line: line.ordinal,
                        kind: RowErrorKind::FieldParse(error),
                    };
                    self.row_failed(&mut summary, error)?;
                    continue;
                }
            };

            if self.options.dry_run {
                summary.created += 1;
                continue;
            }

            let handle = match &container {
                Some(handle) => handle,
                None => {
                    let ensured = batch.ensure(destination)?;
                    if !ensured.created.is_empty() {
                        info!(folders = ?ensured.created, "created destination folders");
                    }
                    &*container.insert(ensured.handle)
                }
            };

            self.stage(&mut batch, handle, line.ordinal, &record, &mut summary)?;
        }

        // =====================================================================
        // Stage 5: Commit
        // =====================================================================
        summary.artifacts = batch.commit()?;

        info!(
            created = summary.created,
            skipped = summary.skipped,
            errors = summary.errors.len(),
            dry_run = summary.dry_run,
            duration_ms = started.elapsed().as_millis(),
            "import complete"
        );
        Ok(summary)
    }

    fn stage(
        &self,
        batch: &mut ArtifactBatch<'_, S>,
        handle: &ContainerHandle,
        line: usize,
        record: &Record,
        summary: &mut ImportSummary,
    ) -> Result<(), ImportError> {
        let name = record.name();
        match batch.stage(handle, name, &self.options.extension, record) {
            Ok(()) => {
                summary.created += 1;
                Ok(())
            }
            Err(error) if error.is_artifact_error() => {
                let error = RowError {
                    line,
                    kind: RowErrorKind::Write {
                        name: name.to_string(),
                        message: error.to_string(),
                    },
                };
                self.row_failed(summary, error)
            }
            Err(error) => Err(error.into()),
        }
    }

    fn row_failed(&self, summary: &mut ImportSummary, error: RowError) -> Result<(), ImportError> {
        warn!(line = error.line, "{error}");
        match self.options.row_errors {
            RowErrorPolicy::Continue => {
                summary.errors.push(error);
                Ok(())
            }
            RowErrorPolicy::Abort => Err(ImportError::Aborted { error }),
        }
    }
}
