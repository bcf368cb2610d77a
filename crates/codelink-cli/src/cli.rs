//! CLI argument definitions for the codelink mapper.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "codelink",
    version,
    about = "Concept mapper - link traditional-medicine codes to international classification codes",
    long_about = "Resolve traditional-medicine terminology codes to their best-matching\n\
                  international classification codes via string similarity, with a\n\
                  persisted mapping cache so the same lookup is never computed twice."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Directory holding the catalog tables and the mapping cache.
    #[arg(
        long = "data-dir",
        value_name = "DIR",
        default_value = "data",
        global = true
    )]
    pub data_dir: PathBuf,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
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
}

#[derive(Subcommand)]
pub enum Command {
    /// Manage the two code catalogs.
    #[command(subcommand)]
    Catalog(CatalogCommand),

    /// Resolve a source code to its authoritative mapping.
    Resolve(ResolveArgs),

    /// Inspect or edit the mapping cache.
    #[command(subcommand)]
    Map(MapCommand),

    /// Substring search over a catalog (plain lookup, not the fuzzy resolver).
    Search(SearchArgs),
}

#[derive(Subcommand)]
pub enum CatalogCommand {
    /// Replace a catalog table from a CSV export.
    Load(CatalogLoadArgs),
}

#[derive(Parser)]
pub struct CatalogLoadArgs {
    /// Which catalog to replace.
    #[arg(value_enum)]
    pub catalog: CatalogArg,

    /// Path to a headered CSV with code, display, and system columns.
    #[arg(value_name = "CSV")]
    pub csv_path: PathBuf,
}

#[derive(Parser)]
pub struct ResolveArgs {
    /// Source terminology code to resolve.
    #[arg(value_name = "CODE")]
    pub code: String,
}

#[derive(Subcommand)]
pub enum MapCommand {
    /// List all cached mappings.
    List,

    /// Add an operator-supplied mapping, bypassing similarity resolution.
    Add(MapAddArgs),

    /// Replace all mappings from a JSON array of mapping records.
    Import(MapImportArgs),
}

#[derive(Parser)]
pub struct MapAddArgs {
    /// Source terminology code.
    #[arg(value_name = "SOURCE_CODE")]
    pub source_code: String,

    /// Target classification code.
    #[arg(value_name = "TARGET_CODE")]
    pub target_code: String,

    /// Display text for the target code.
    #[arg(value_name = "TARGET_DISPLAY")]
    pub target_display: String,
}

#[derive(Parser)]
pub struct MapImportArgs {
    /// Path to a JSON array of mapping records.
    #[arg(value_name = "JSON")]
    pub json_path: PathBuf,
}

#[derive(Parser)]
pub struct SearchArgs {
    /// Which catalog to search.
    #[arg(value_enum)]
    pub catalog: CatalogArg,

    /// Case-insensitive substring matched against code and display.
    #[arg(value_name = "QUERY")]
    pub query: String,
}

/// CLI catalog selector.
#[derive(Clone, Copy, ValueEnum)]
pub enum CatalogArg {
    Source,
    Target,
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
