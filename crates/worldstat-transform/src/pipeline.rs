//! Per-file normalization and run integration.
//!
//! Each file moves through `shape → (reshape | pass-through) → normalize →
//! classify (unknown measure only) → clean`. Files are independent until
//! [`integrate`], which combines same-measure tables and merges the pair.

use polars::prelude::DataFrame;
use tracing::{debug, info, info_span, warn};

use worldstat_model::schema::VALUE;
use worldstat_model::{
    ClassificationSource, DuplicateMeasurePolicy, FileOutcome, FileReport, Measure, MeasureHint,
    PipelineOptions, RunSummary,
};

use crate::classify::classify_table;
use crate::clean::clean_measure_table;
use crate::data_utils::{column_names, rename_column};
use crate::error::{Result, TransformError};
use crate::frame::MeasureFrame;
use crate::merge::merge_measures;
use crate::normalize::{normalize_long, normalize_wide};
use crate::reshape::{select_id_columns, wide_to_long};
use crate::shape::{TableShape, detect_shape};

/// A loaded raw table with its file name and measure hint.
#[derive(Debug, Clone)]
pub struct SourceTable {
    pub file: String,
    pub hint: MeasureHint,
    pub data: DataFrame,
}

impl SourceTable {
    pub fn new(file: impl Into<String>, hint: MeasureHint, data: DataFrame) -> Self {
        Self {
            file: file.into(),
            hint,
            data,
        }
    }
}

/// A cleaned measure table and how its measure was decided.
#[derive(Debug, Clone)]
pub struct NormalizedTable {
    pub frame: MeasureFrame,
    pub source: ClassificationSource,
}

impl NormalizedTable {
    pub fn outcome(&self) -> FileOutcome {
        FileOutcome::Normalized {
            measure: self.frame.measure,
            source: self.source.clone(),
            rows: self.frame.record_count(),
        }
    }
}

/// Result of one file's pipeline, failures already reduced to a reason.
#[derive(Debug)]
pub struct FileResult {
    pub file: String,
    pub result: std::result::Result<NormalizedTable, String>,
}

impl FileResult {
    pub fn skipped(file: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            result: Err(reason.into()),
        }
    }

    pub fn outcome(&self) -> FileOutcome {
        match &self.result {
            Ok(table) => table.outcome(),
            Err(reason) => FileOutcome::skipped(reason.clone()),
        }
    }
}

/// Runs the per-file pipeline on a raw table.
pub fn process_table(
    file: &str,
    raw: &DataFrame,
    hint: MeasureHint,
    options: &PipelineOptions,
) -> Result<NormalizedTable> {
    let span = info_span!("process_table", file, hint = ?hint);
    let _enter = span.enter();

    let columns = column_names(raw);
    let shape = detect_shape(&columns)?;
    let target = hint.measure().map_or(VALUE, Measure::column_name);

    let normalized = match &shape {
        TableShape::Long => {
            debug!("long table");
            normalize_long(raw, target)?
        }
        TableShape::Wide { year_columns } => {
            let id_columns = select_id_columns(&columns, &options.id_columns)?;
            debug!(
                id_columns = ?id_columns,
                year_columns = year_columns.len(),
                "wide table"
            );
            let long = wide_to_long(raw, &id_columns, year_columns)?;
            normalize_wide(&long, &id_columns, target)?
        }
    };

    let (measure, source, normalized) = match hint.measure() {
        Some(measure) => (measure, ClassificationSource::Hint, normalized),
        None => {
            let classification = classify_table(&normalized, &options.classifier)?;
            let renamed =
                rename_column(&normalized, VALUE, classification.measure.column_name())?;
            let source = ClassificationSource::Heuristic {
                mean_abs: classification.mean_abs,
                sampled: classification.sampled,
            };
            (classification.measure, source, renamed)
        }
    };

    let cleaned = clean_measure_table(&normalized, measure.column_name())?;
    let mut frame = MeasureFrame::new(measure, cleaned);
    frame.add_source_file(file);

    info!(
        measure = %measure,
        rows = frame.record_count(),
        "normalized table"
    );
    Ok(NormalizedTable { frame, source })
}

/// Runs [`process_table`] and reduces failures to a skip reason.
pub fn process_file(table: &SourceTable, options: &PipelineOptions) -> FileResult {
    let result = process_table(&table.file, &table.data, table.hint, options)
        .map_err(|error| error.to_string());
    FileResult {
        file: table.file.clone(),
        result,
    }
}

/// At most one table per measure, combined under a duplicate policy.
#[derive(Debug, Clone, Default)]
pub struct MeasureTables {
    pub population: Option<MeasureFrame>,
    pub gdp: Option<MeasureFrame>,
}

impl MeasureTables {
    pub fn get(&self, measure: Measure) -> Option<&MeasureFrame> {
        match measure {
            Measure::Population => self.population.as_ref(),
            Measure::Gdp => self.gdp.as_ref(),
        }
    }

    fn slot_mut(&mut self, measure: Measure) -> &mut Option<MeasureFrame> {
        match measure {
            Measure::Population => &mut self.population,
            Measure::Gdp => &mut self.gdp,
        }
    }

    /// Adds a table, resolving a second table of the same measure per `policy`.
    pub fn insert(&mut self, frame: MeasureFrame, policy: DuplicateMeasurePolicy) -> Result<()> {
        let measure = frame.measure;
        let slot = self.slot_mut(measure);
        let Some(existing) = slot.as_mut() else {
            *slot = Some(frame);
            return Ok(());
        };

        match policy {
            DuplicateMeasurePolicy::Union => {
                existing.data = existing.data.vstack(&frame.data)?;
                for file in frame.source_files() {
                    existing.add_source_file(file.clone());
                }
                debug!(
                    measure = %measure,
                    rows = existing.record_count(),
                    "appended table to existing measure"
                );
            }
            DuplicateMeasurePolicy::LastWins => {
                warn!(
                    measure = %measure,
                    replaced = ?existing.source_files(),
                    by = ?frame.source_files(),
                    "multiple tables for one measure, keeping the last"
                );
                *existing = frame;
            }
            DuplicateMeasurePolicy::Reject => {
                return Err(TransformError::DuplicateMeasure {
                    measure,
                    first: existing.source_files().join(", "),
                    second: frame.source_files().join(", "),
                });
            }
        }
        Ok(())
    }
}

/// Outcome of an integration run.
#[derive(Debug)]
pub struct RunReport {
    pub files: Vec<FileReport>,
    pub population_rows: Option<usize>,
    pub gdp_rows: Option<usize>,
    /// The merged table, `None` when no file produced a measure.
    pub merged: Option<DataFrame>,
}

impl RunReport {
    pub fn no_measure_detected(&self) -> bool {
        self.merged.is_none()
    }

    /// Summary of the run; write fields are left at their defaults.
    pub fn summary(&self) -> RunSummary {
        RunSummary {
            files: self.files.clone(),
            population_rows: self.population_rows,
            gdp_rows: self.gdp_rows,
            merged_rows: self.merged.as_ref().map(DataFrame::height),
            ..RunSummary::default()
        }
    }
}

/// Combines per-file results in order and merges the measure tables.
///
/// Skipped files are recorded and otherwise ignored. Only the reject
/// duplicate policy can fail the run.
pub fn integrate(results: Vec<FileResult>, options: &PipelineOptions) -> Result<RunReport> {
    let span = info_span!("integrate", files = results.len());
    let _enter = span.enter();

    let mut tables = MeasureTables::default();
    let mut files = Vec::with_capacity(results.len());
    for result in results {
        let outcome = result.outcome();
        match result.result {
            Ok(table) => tables.insert(table.frame, options.duplicate_measures)?,
            Err(reason) => warn!(file = %result.file, %reason, "skipping file"),
        }
        files.push(FileReport {
            file: result.file,
            outcome,
        });
    }

    for measure in [Measure::Population, Measure::Gdp] {
        if tables.get(measure).is_none() && tables.get(measure.other()).is_some() {
            warn!(missing = %measure, "only one measure detected, the other stays null");
        }
    }

    let population_rows = tables.population.as_ref().map(MeasureFrame::record_count);
    let gdp_rows = tables.gdp.as_ref().map(MeasureFrame::record_count);
    let merged = merge_measures(tables.population.as_ref(), tables.gdp.as_ref())?;
    if merged.is_none() {
        warn!("no measure detected in any input file");
    }

    Ok(RunReport {
        files,
        population_rows,
        gdp_rows,
        merged,
    })
}

/// Processes in-memory tables in order and integrates them.
pub fn integrate_tables(tables: &[SourceTable], options: &PipelineOptions) -> Result<RunReport> {
    let results = tables
        .iter()
        .map(|table| process_file(table, options))
        .collect();
    integrate(results, options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_utils::{canonical_frame, string_column};

    fn measure_frame(measure: Measure, file: &str, code: &str) -> MeasureFrame {
        let data = canonical_frame(
            vec![Some("Name".into())],
            vec![Some(code.into())],
            vec![Some(2020)],
            vec![Some(1.0)],
            measure.column_name(),
        )
        .unwrap();
        let mut frame = MeasureFrame::new(measure, data);
        frame.add_source_file(file);
        frame
    }

    #[test]
    fn test_union_concatenates_in_order() {
        let mut tables = MeasureTables::default();
        let policy = DuplicateMeasurePolicy::Union;
        tables
            .insert(measure_frame(Measure::Gdp, "a.csv", "AAA"), policy)
            .unwrap();
        tables
            .insert(measure_frame(Measure::Gdp, "b.csv", "BBB"), policy)
            .unwrap();

        let gdp = tables.get(Measure::Gdp).unwrap();
        assert_eq!(gdp.record_count(), 2);
        assert_eq!(gdp.source_files(), ["a.csv", "b.csv"]);
        assert!(tables.get(Measure::Population).is_none());
    }

    #[test]
    fn test_last_wins_replaces() {
        let mut tables = MeasureTables::default();
        let policy = DuplicateMeasurePolicy::LastWins;
        tables
            .insert(measure_frame(Measure::Population, "a.csv", "AAA"), policy)
            .unwrap();
        tables
            .insert(measure_frame(Measure::Population, "b.csv", "BBB"), policy)
            .unwrap();
        assert_eq!(tables.population.unwrap().source_files(), ["b.csv"]);
    }

    #[test]
    fn test_reject_fails() {
        let mut tables = MeasureTables::default();
        let policy = DuplicateMeasurePolicy::Reject;
        tables
            .insert(measure_frame(Measure::Gdp, "a.csv", "AAA"), policy)
            .unwrap();
        let err = tables
            .insert(measure_frame(Measure::Gdp, "b.csv", "BBB"), policy)
            .unwrap_err();
        insta::assert_snapshot!(err.to_string(), @"duplicate gdp tables: 'a.csv' and 'b.csv'");
    }

    #[test]
    fn test_wide_id_column_named_value() {
        let raw = DataFrame::new(vec![
            string_column("Economy", vec![Some("Aland".into())]),
            string_column("value", vec![Some("ALA".into())]),
            string_column("2020", vec![Some("1250000000".into())]),
        ])
        .unwrap();

        let table =
            process_table("gdp.csv", &raw, MeasureHint::Gdp, &PipelineOptions::default()).unwrap();
        let rows = table.frame.rows().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].country_name.as_deref(), Some("Aland"));
        assert_eq!(rows[0].country_code.as_deref(), Some("ALA"));
        assert_eq!(rows[0].year, 2020);
        assert_eq!(rows[0].value, Some(1_250_000_000.0));
    }

    #[test]
    fn test_unrecognized_file_is_skipped() {
        let raw = DataFrame::new(vec![string_column("Indicator", vec![Some("x".into())])]).unwrap();
        let tables = vec![SourceTable::new("notes.csv", MeasureHint::Unknown, raw)];

        let report = integrate_tables(&tables, &PipelineOptions::default()).unwrap();
        assert!(report.no_measure_detected());
        assert_eq!(report.files.len(), 1);
        assert!(report.files[0].outcome.is_skipped());
        assert_eq!(report.summary().skipped_count(), 1);
    }
}
