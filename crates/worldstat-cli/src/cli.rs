//! CLI argument definitions for worldstat.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

use worldstat_model::{
    DEFAULT_POPULATION_THRESHOLD, DEFAULT_SAMPLE_SIZE, DuplicateMeasurePolicy, WriteMode,
};

#[derive(Parser)]
#[command(
    name = "worldstat",
    version,
    about = "Normalize and merge country-year population and GDP tables",
    long_about = "Normalize and merge country-year population and GDP tables.\n\n\
                  Reads long or wide CSV exports, classifies each file as population or GDP,\n\
                  and writes one row per country and year as Parquet partitioned by year."
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
}

#[derive(Subcommand)]
pub enum Command {
    /// Normalize every CSV in the raw directory and write the merged table.
    Run(RunArgs),

    /// List input files with their measure hint and detected layout.
    Files(FilesArgs),
}

#[derive(Parser)]
pub struct RunArgs {
    /// Directory containing the input CSV files.
    #[arg(long = "raw-dir", value_name = "DIR", default_value = "data/raw")]
    pub raw_dir: PathBuf,

    /// Output directory; the merged dataset is written to <DIR>/combined.
    #[arg(long = "out-dir", value_name = "DIR", default_value = "data/processed")]
    pub out_dir: PathBuf,

    /// How to treat an existing output dataset.
    #[arg(long = "mode", value_enum, default_value = "overwrite")]
    pub mode: WriteModeArg,

    /// Write plain part files instead of year=YYYY directories.
    #[arg(long = "no-partition")]
    pub no_partition: bool,

    /// What to do when several files resolve to the same measure.
    #[arg(long = "duplicate-measures", value_enum, default_value = "union")]
    pub duplicate_measures: DuplicateMeasuresArg,

    /// Worker threads for per-file processing (default: available cores).
    #[arg(long = "jobs", short = 'j', value_name = "N")]
    pub jobs: Option<usize>,

    /// Leading rows sampled when classifying a file without a measure hint.
    #[arg(long = "sample-size", value_name = "ROWS", default_value_t = DEFAULT_SAMPLE_SIZE)]
    pub sample_size: usize,

    /// Mean absolute value above which an unlabeled file counts as population.
    #[arg(
        long = "population-threshold",
        value_name = "VALUE",
        default_value_t = DEFAULT_POPULATION_THRESHOLD
    )]
    pub population_threshold: f64,

    /// Process and report without writing output files.
    #[arg(long = "dry-run")]
    pub dry_run: bool,

    /// Also write the run summary as JSON to this path.
    #[arg(long = "summary-json", value_name = "PATH")]
    pub summary_json: Option<PathBuf>,
}

#[derive(Parser)]
pub struct FilesArgs {
    /// Directory containing the input CSV files.
    #[arg(long = "raw-dir", value_name = "DIR", default_value = "data/raw")]
    pub raw_dir: PathBuf,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum WriteModeArg {
    Overwrite,
    Append,
    Error,
    Ignore,
}

impl From<WriteModeArg> for WriteMode {
    fn from(arg: WriteModeArg) -> Self {
        match arg {
            WriteModeArg::Overwrite => WriteMode::Overwrite,
            WriteModeArg::Append => WriteMode::Append,
            WriteModeArg::Error => WriteMode::ErrorIfExists,
            WriteModeArg::Ignore => WriteMode::Ignore,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum DuplicateMeasuresArg {
    Union,
    LastWins,
    Reject,
}

impl From<DuplicateMeasuresArg> for DuplicateMeasurePolicy {
    fn from(arg: DuplicateMeasuresArg) -> Self {
        match arg {
            DuplicateMeasuresArg::Union => DuplicateMeasurePolicy::Union,
            DuplicateMeasuresArg::LastWins => DuplicateMeasurePolicy::LastWins,
            DuplicateMeasuresArg::Reject => DuplicateMeasurePolicy::Reject,
        }
    }
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
