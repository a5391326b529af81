//! Configuration options for the integration pipeline.

use serde::{Deserialize, Serialize};

use crate::schema::DEFAULT_ID_COLUMNS;

/// Number of leading rows the magnitude classifier inspects.
pub const DEFAULT_SAMPLE_SIZE: usize = 100;

/// Mean absolute value above which a table is classified as population.
pub const DEFAULT_POPULATION_THRESHOLD: f64 = 1_000_000.0;

/// Settings for the magnitude-based measure classifier.
///
/// The classifier is a heuristic: country populations sit in the millions
/// to billions, while GDP in the usual source units rarely shares that scale
/// within the sampled window. It is not ground truth.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// Rows taken from the top of the table, in table order.
    pub sample_size: usize,
    /// A mean absolute value strictly above this is population.
    pub population_threshold: f64,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            sample_size: DEFAULT_SAMPLE_SIZE,
            population_threshold: DEFAULT_POPULATION_THRESHOLD,
        }
    }
}

impl ClassifierConfig {
    #[must_use]
    pub fn with_sample_size(mut self, sample_size: usize) -> Self {
        self.sample_size = sample_size;
        self
    }

    #[must_use]
    pub fn with_population_threshold(mut self, threshold: f64) -> Self {
        self.population_threshold = threshold;
        self
    }
}

/// What to do when several files resolve to the same measure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DuplicateMeasurePolicy {
    /// Concatenate same-measure tables in file order.
    #[default]
    Union,
    /// Keep only the table from the last file, warning about the rest.
    LastWins,
    /// Fail the run.
    Reject,
}

/// Options controlling normalization and integration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineOptions {
    /// Identifier headers preferred when reshaping wide tables (matched
    /// case-insensitively, kept in table order).
    pub id_columns: Vec<String>,

    /// Magnitude classifier settings for files without a measure hint.
    pub classifier: ClassifierConfig,

    /// Handling of multiple files resolving to one measure.
    pub duplicate_measures: DuplicateMeasurePolicy,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            id_columns: DEFAULT_ID_COLUMNS.iter().map(|c| (*c).to_string()).collect(),
            classifier: ClassifierConfig::default(),
            duplicate_measures: DuplicateMeasurePolicy::default(),
        }
    }
}

impl PipelineOptions {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_classifier(mut self, classifier: ClassifierConfig) -> Self {
        self.classifier = classifier;
        self
    }

    #[must_use]
    pub fn with_duplicate_measures(mut self, policy: DuplicateMeasurePolicy) -> Self {
        self.duplicate_measures = policy;
        self
    }

    #[must_use]
    pub fn with_id_columns(mut self, columns: Vec<String>) -> Self {
        self.id_columns = columns;
        self
    }
}
