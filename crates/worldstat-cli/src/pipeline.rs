//! Integration run with explicit stages.
//!
//! 1. **Ingest**: list CSV files and derive measure hints
//! 2. **Process**: load and normalize every file on a bounded worker pool
//! 3. **Integrate**: combine same-measure tables and merge
//! 4. **Output**: write the merged table as Parquet
//!
//! Each stage takes the output of the previous stage and returns typed results.

use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use rayon::prelude::*;
use tracing::{info, info_span, warn};

use worldstat_ingest::{DiscoveredFile, discover_files, read_raw_table};
use worldstat_model::PipelineOptions;
use worldstat_output::{WriteOptions, WriteOutcome, write_merged};
use worldstat_transform::{FileResult, RunReport, integrate, process_table};

use crate::types::{RunConfig, RunResult};

// ============================================================================
// Stage 1: Ingest
// ============================================================================

/// Lists the input files of a run.
pub fn ingest(raw_dir: &Path) -> Result<Vec<DiscoveredFile>> {
    let files = discover_files(raw_dir)
        .with_context(|| format!("list csv files in {}", raw_dir.display()))?;
    if files.is_empty() {
        warn!(raw_dir = %raw_dir.display(), "no CSV files found");
    }
    info!(files = files.len(), "discovered input files");
    Ok(files)
}

// ============================================================================
// Stage 2: Process
// ============================================================================

/// Loads and normalizes one file; any failure becomes a skip reason.
pub fn process_one(file: &DiscoveredFile, options: &PipelineOptions) -> FileResult {
    let name = file.name();
    let result = read_raw_table(&file.path)
        .map_err(|error| error.to_string())
        .and_then(|raw| {
            process_table(&name, &raw, file.hint, options).map_err(|error| error.to_string())
        });
    FileResult { file: name, result }
}

/// Processes files in parallel, returning results in input order.
pub fn process_files(
    files: &[DiscoveredFile],
    options: &PipelineOptions,
    jobs: Option<usize>,
) -> Result<Vec<FileResult>> {
    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(jobs) = jobs {
        builder = builder.num_threads(jobs);
    }
    let pool = builder.build().context("build worker pool")?;

    let start = Instant::now();
    let results: Vec<FileResult> = pool.install(|| {
        files
            .par_iter()
            .map(|file| process_one(file, options))
            .collect()
    });
    info!(
        files = results.len(),
        threads = pool.current_num_threads(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "processed input files"
    );
    Ok(results)
}

// ============================================================================
// Stage 3: Integrate
// ============================================================================

pub fn integrate_results(
    results: Vec<FileResult>,
    options: &PipelineOptions,
) -> Result<RunReport> {
    integrate(results, options).context("integrate measure tables")
}

// ============================================================================
// Stage 4: Output
// ============================================================================

/// Writes the merged table unless the run is a dry run or produced nothing.
pub fn output(
    report: &RunReport,
    target: &Path,
    options: &WriteOptions,
    dry_run: bool,
) -> Result<Option<WriteOutcome>> {
    let Some(merged) = report.merged.as_ref() else {
        warn!("no measure detected, nothing to write");
        return Ok(None);
    };
    if dry_run {
        info!(target = %target.display(), rows = merged.height(), "dry run, skipping write");
        return Ok(None);
    }
    let outcome = write_merged(merged, target, options)
        .with_context(|| format!("write {}", target.display()))?;
    Ok(Some(outcome))
}

/// Runs all stages.
pub fn run(config: &RunConfig) -> Result<RunResult> {
    let span = info_span!("run", raw_dir = %config.raw_dir.display());
    let _guard = span.enter();
    let start = Instant::now();

    let files = ingest(&config.raw_dir)?;
    let results = process_files(&files, &config.pipeline, config.jobs)?;
    let report = integrate_results(results, &config.pipeline)?;

    let target = config.target();
    let outcome = output(&report, &target, &config.write, config.dry_run)?;

    let mut summary = report.summary();
    summary.write_mode = config.write.mode;
    if report.merged.is_some() {
        summary.output = Some(target);
    }
    summary.written = outcome.as_ref().is_some_and(WriteOutcome::is_written);

    info!(
        merged_rows = ?summary.merged_rows,
        written = summary.written,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "run complete"
    );
    Ok(RunResult {
        summary,
        raw_dir: config.raw_dir.clone(),
        dry_run: config.dry_run,
    })
}
