use std::path::PathBuf;

use worldstat_model::{PipelineOptions, RunSummary};
use worldstat_output::WriteOptions;

/// Name of the dataset directory created under the output directory.
pub const COMBINED_DIR: &str = "combined";

/// Fully resolved settings for one integration run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub raw_dir: PathBuf,
    pub out_dir: PathBuf,
    pub pipeline: PipelineOptions,
    pub write: WriteOptions,
    /// Worker threads for per-file processing; `None` uses rayon's default.
    pub jobs: Option<usize>,
    /// Process and report without writing output.
    pub dry_run: bool,
}

impl RunConfig {
    pub fn new(raw_dir: impl Into<PathBuf>, out_dir: impl Into<PathBuf>) -> Self {
        Self {
            raw_dir: raw_dir.into(),
            out_dir: out_dir.into(),
            pipeline: PipelineOptions::default(),
            write: WriteOptions::default(),
            jobs: None,
            dry_run: false,
        }
    }

    /// Dataset location written by the run.
    pub fn target(&self) -> PathBuf {
        self.out_dir.join(COMBINED_DIR)
    }
}

#[derive(Debug)]
pub struct RunResult {
    pub summary: RunSummary,
    pub raw_dir: PathBuf,
    pub dry_run: bool,
}
