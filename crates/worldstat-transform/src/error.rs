//! Error types for table normalization and integration.

use thiserror::Error;

use worldstat_model::Measure;

/// Errors raised while normalizing a table or integrating measure tables.
///
/// Cell-level cast failures are not errors: they become nulls and are
/// filtered by the cleaner.
#[derive(Debug, Error)]
pub enum TransformError {
    /// The table is neither long nor wide format.
    #[error("unrecognized shape: no 'year' column and no four-digit year columns in [{}]", .columns.join(", "))]
    UnrecognizedShape { columns: Vec<String> },

    /// A required column is absent.
    #[error("schema mismatch: missing column(s) {}", .missing.join(", "))]
    SchemaMismatch { missing: Vec<String> },

    /// Two files resolved to the same measure under the reject policy.
    #[error("duplicate {measure} tables: '{first}' and '{second}'")]
    DuplicateMeasure {
        measure: Measure,
        first: String,
        second: String,
    },

    /// Failed DataFrame operation.
    #[error("DataFrame operation failed: {message}")]
    DataFrame { message: String },
}

impl TransformError {
    pub fn schema_mismatch<I, S>(missing: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::SchemaMismatch {
            missing: missing.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<polars::prelude::PolarsError> for TransformError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        Self::DataFrame {
            message: err.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, TransformError>;
