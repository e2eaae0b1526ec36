//! CLI argument definitions for the card sheet importer.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

use cardsheet_cli::config::ImportOverrides;

#[derive(Parser)]
#[command(
    name = "cardsheet",
    version,
    about = "Import card data from a shared spreadsheet into project assets",
    long_about = "Import card data from a shared spreadsheet into project assets.\n\n\
                  Each row of the sheet's CSV export becomes one record file,\n\
                  named after the card, inside the destination folder."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Prefix log lines with a timestamp.
    #[arg(long = "log-timestamps", global = true)]
    pub log_timestamps: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Fetch a sheet and write one record file per row.
    Import(ImportArgs),

    /// Print the document id and CSV export URL for a sheet link.
    Resolve(ResolveArgs),

    /// Print the active column schema.
    Schema(SchemaArgs),
}

#[derive(Parser)]
pub struct ImportArgs {
    /// Spreadsheet link containing `/d/<document id>/`.
    #[arg(value_name = "URL")]
    pub url: Option<String>,

    /// Destination folder, slash-separated (default: Assets/Cards).
    #[arg(long = "dest", value_name = "PATH")]
    pub dest: Option<String>,

    /// Ignore the first line of the sheet (header row).
    #[arg(long = "skip-first-row")]
    pub skip_first_row: bool,

    /// Ignore the first column of every row.
    #[arg(long = "skip-first-column")]
    pub skip_first_column: bool,

    /// Directory the destination path is resolved against (default: .).
    #[arg(long = "project-root", value_name = "DIR")]
    pub project_root: Option<PathBuf>,

    /// TOML profile with defaults and a custom column schema.
    #[arg(long = "profile", value_name = "FILE")]
    pub profile: Option<PathBuf>,

    /// File extension for written records (default: asset).
    #[arg(long = "extension", value_name = "EXT")]
    pub extension: Option<String>,

    /// Stop at the first row that fails to parse or write.
    #[arg(long = "fail-fast")]
    pub fail_fast: bool,

    /// Fetch and map every row without creating folders or files.
    #[arg(long = "dry-run")]
    pub dry_run: bool,

    /// Request timeout in seconds.
    #[arg(long = "timeout", value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Write a JSON run report to this file.
    #[arg(long = "report", value_name = "FILE")]
    pub report: Option<PathBuf>,
}

impl ImportArgs {
    pub fn overrides(&self) -> ImportOverrides {
        ImportOverrides {
            source_url: self.url.clone(),
            destination_path: self.dest.clone(),
            skip_first_row: self.skip_first_row,
            skip_first_column: self.skip_first_column,
            project_root: self.project_root.clone(),
            extension: self.extension.clone(),
            fail_fast: self.fail_fast,
            dry_run: self.dry_run,
            timeout_secs: self.timeout,
        }
    }
}

#[derive(Parser)]
pub struct ResolveArgs {
    /// Spreadsheet link containing `/d/<document id>/`.
    #[arg(value_name = "URL")]
    pub url: String,
}

#[derive(Parser)]
pub struct SchemaArgs {
    /// Show the schema declared in this profile instead of the built-in one.
    #[arg(long = "profile", value_name = "FILE")]
    pub profile: Option<PathBuf>,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
