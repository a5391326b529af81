pub mod measure;
pub mod options;
pub mod processing;
pub mod rows;
pub mod schema;

pub use measure::{Measure, MeasureHint};
pub use options::{
    ClassifierConfig, DEFAULT_POPULATION_THRESHOLD, DEFAULT_SAMPLE_SIZE, DuplicateMeasurePolicy,
    PipelineOptions,
};
pub use processing::{ClassificationSource, FileOutcome, FileReport, RunSummary, WriteMode};
pub use rows::{CanonicalRow, MergedRow};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_mode_displays_long_names() {
        assert_eq!(WriteMode::default(), WriteMode::Overwrite);
        assert_eq!(WriteMode::ErrorIfExists.to_string(), "error-if-exists");
        assert_eq!(WriteMode::Ignore.to_string(), "ignore-if-exists");
    }

    #[test]
    fn outcome_display_matches_summary_vocabulary() {
        let normalized = FileOutcome::Normalized {
            measure: Measure::Gdp,
            source: ClassificationSource::Hint,
            rows: 3,
        };
        assert_eq!(normalized.to_string(), "normalized-as-gdp");
        assert_eq!(
            FileOutcome::skipped("unrecognized shape").to_string(),
            "skipped: unrecognized shape"
        );
    }

    #[test]
    fn summary_serializes() {
        let summary = RunSummary {
            files: vec![FileReport {
                file: "population.csv".to_string(),
                outcome: FileOutcome::Normalized {
                    measure: Measure::Population,
                    source: ClassificationSource::Heuristic {
                        mean_abs: Some(8_000_000.0),
                        sampled: 100,
                    },
                    rows: 100,
                },
            }],
            population_rows: Some(100),
            gdp_rows: None,
            merged_rows: Some(100),
            output: None,
            write_mode: WriteMode::Overwrite,
            written: false,
        };
        let json = serde_json::to_value(&summary).expect("serialize summary");
        assert_eq!(json["files"][0]["status"], "normalized");
        assert_eq!(json["files"][0]["measure"], "population");
        assert_eq!(json["files"][0]["source"]["via"], "heuristic");
        assert_eq!(json["write_mode"], "overwrite");

        let round: RunSummary = serde_json::from_value(json).expect("deserialize summary");
        assert_eq!(round, summary);
    }

    #[test]
    fn default_options_use_world_bank_identifiers() {
        let options = PipelineOptions::default();
        assert_eq!(options.id_columns, vec!["Country Name", "Country Code"]);
        assert_eq!(options.classifier.sample_size, 100);
        assert_eq!(options.duplicate_measures, DuplicateMeasurePolicy::Union);
    }
}
