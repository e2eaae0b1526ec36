use anyhow::{Context, Result};
use tracing::info;

use cardsheet_cli::config::ImportProfile;
use cardsheet_cli::pipeline::ImportPipeline;
use cardsheet_ingest::{HttpFetcher, RecordMapper, resolve};
use cardsheet_model::ImportSummary;
use cardsheet_output::{FsAssetStore, write_summary_json};

use crate::cli::{ImportArgs, ResolveArgs, SchemaArgs};
use crate::summary::print_schema;

pub fn run_import(args: &ImportArgs) -> Result<ImportSummary> {
    let profile = ImportProfile::load_optional(args.profile.as_deref())?;
    let settings = profile.resolve(args.overrides())?;
    let mapper = RecordMapper::new(settings.schema).context("build record mapper")?;
    let fetcher = HttpFetcher::with_timeout(settings.timeout).context("build HTTP client")?;
    let store = FsAssetStore::new(&settings.project_root);
    info!(
        source = %settings.request.source_url,
        destination = settings.request.destination(),
        project_root = %settings.project_root.display(),
        dry_run = settings.options.dry_run,
        "starting import"
    );

    let pipeline = ImportPipeline::new(fetcher, store)
        .with_mapper(mapper)
        .with_options(settings.options);
    let summary = pipeline.run(&settings.request)?;

    if let Some(path) = &args.report {
        let written = write_summary_json(path, &summary)
            .with_context(|| format!("write report {}", path.display()))?;
        info!(path = %written.display(), "wrote run report");
    }
    Ok(summary)
}

pub fn run_resolve(args: &ResolveArgs) -> Result<()> {
    let document = resolve(&args.url)?;
    println!("Document: {}", document.document_id());
    println!("Export: {}", document.export_url());
    Ok(())
}

pub fn run_schema(args: &SchemaArgs) -> Result<()> {
    let profile = ImportProfile::load_optional(args.profile.as_deref())?;
    print_schema(&profile.schema());
    Ok(())
}
