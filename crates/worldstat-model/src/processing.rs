use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::measure::Measure;

/// How the writer treats an existing output location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WriteMode {
    /// Replace whatever is at the target.
    #[default]
    Overwrite,
    /// Add new part files next to existing ones.
    Append,
    /// Fail if the target already exists.
    ErrorIfExists,
    /// Skip the write if the target already exists.
    Ignore,
}

impl WriteMode {
    pub fn as_str(self) -> &'static str {
        match self {
            WriteMode::Overwrite => "overwrite",
            WriteMode::Append => "append",
            WriteMode::ErrorIfExists => "error-if-exists",
            WriteMode::Ignore => "ignore-if-exists",
        }
    }
}

impl fmt::Display for WriteMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a file's measure was decided.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "via", rename_all = "lowercase")]
pub enum ClassificationSource {
    /// The file name carried the measure.
    Hint,
    /// The magnitude classifier decided from sampled values.
    Heuristic {
        /// Mean absolute value of the sample, `None` when it held no values.
        mean_abs: Option<f64>,
        /// Non-null values the mean was computed over.
        sampled: usize,
    },
}

/// Per-file result of the normalization pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "kebab-case")]
pub enum FileOutcome {
    Normalized {
        measure: Measure,
        source: ClassificationSource,
        /// Rows surviving the cleaner.
        rows: usize,
    },
    Skipped {
        reason: String,
    },
}

impl FileOutcome {
    pub fn skipped(reason: impl Into<String>) -> Self {
        FileOutcome::Skipped {
            reason: reason.into(),
        }
    }

    pub fn measure(&self) -> Option<Measure> {
        match self {
            FileOutcome::Normalized { measure, .. } => Some(*measure),
            FileOutcome::Skipped { .. } => None,
        }
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, FileOutcome::Skipped { .. })
    }
}

impl fmt::Display for FileOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileOutcome::Normalized { measure, .. } => write!(f, "normalized-as-{measure}"),
            FileOutcome::Skipped { reason } => write!(f, "skipped: {reason}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileReport {
    pub file: String,
    #[serde(flatten)]
    pub outcome: FileOutcome,
}

/// Summary of one integration run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub files: Vec<FileReport>,
    pub population_rows: Option<usize>,
    pub gdp_rows: Option<usize>,
    pub merged_rows: Option<usize>,
    pub output: Option<PathBuf>,
    pub write_mode: WriteMode,
    /// Whether the writer persisted anything.
    pub written: bool,
}

impl RunSummary {
    pub fn skipped_count(&self) -> usize {
        self.files.iter().filter(|f| f.outcome.is_skipped()).count()
    }

    /// True when neither measure could be produced.
    pub fn no_measure_detected(&self) -> bool {
        self.merged_rows.is_none()
    }
}
