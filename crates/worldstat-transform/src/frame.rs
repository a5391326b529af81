//! Measure frame types.
//!
//! A [`MeasureFrame`] wraps a canonical Polars DataFrame
//! (`country_name, country_code, year, <measure>`) with the measure it holds
//! and the source files that contributed rows.

use polars::prelude::{AnyValue, DataFrame};

use worldstat_common::{any_to_string_opt, lenient_f64, lenient_i32};
use worldstat_model::schema::{COUNTRY_CODE, COUNTRY_NAME, YEAR};
use worldstat_model::{CanonicalRow, Measure};

use crate::error::{Result, TransformError};

/// Provenance of a measure frame.
#[derive(Debug, Clone, Default)]
pub struct MeasureFrameMeta {
    /// File names whose rows ended up in this frame, in the order they were added.
    pub source_files: Vec<String>,
}

/// A cleaned single-measure table.
#[derive(Debug, Clone)]
pub struct MeasureFrame {
    pub measure: Measure,
    pub data: DataFrame,
    pub meta: Option<MeasureFrameMeta>,
}

impl MeasureFrame {
    pub fn new(measure: Measure, data: DataFrame) -> Self {
        Self {
            measure,
            data,
            meta: None,
        }
    }

    /// Returns the number of records in the frame.
    pub fn record_count(&self) -> usize {
        self.data.height()
    }

    /// Name of the column carrying this frame's values.
    pub fn value_column(&self) -> &'static str {
        self.measure.column_name()
    }

    /// Get the source files that contributed to this frame.
    pub fn source_files(&self) -> &[String] {
        self.meta
            .as_ref()
            .map(|m| m.source_files.as_slice())
            .unwrap_or(&[])
    }

    /// Add a source file to the metadata.
    pub fn add_source_file(&mut self, file: impl Into<String>) {
        let meta = self.meta.get_or_insert_with(MeasureFrameMeta::default);
        meta.source_files.push(file.into());
    }

    /// Reads the frame as typed rows.
    ///
    /// Missing identifier columns read as null. Rows without a year are not
    /// observations and are left out.
    pub fn rows(&self) -> Result<Vec<CanonicalRow>> {
        let df = &self.data;
        let value_name = self.value_column();
        let years = df.column(YEAR).map_err(|_| TransformError::schema_mismatch([YEAR]))?;
        let values = df
            .column(value_name)
            .map_err(|_| TransformError::schema_mismatch([value_name]))?;
        let names = df.column(COUNTRY_NAME).ok();
        let codes = df.column(COUNTRY_CODE).ok();

        let mut rows = Vec::with_capacity(df.height());
        for idx in 0..df.height() {
            let Some(year) = lenient_i32(years.get(idx).unwrap_or(AnyValue::Null)) else {
                continue;
            };
            let text = |column: Option<&polars::prelude::Column>| {
                column.and_then(|c| any_to_string_opt(c.get(idx).unwrap_or(AnyValue::Null)))
            };
            rows.push(CanonicalRow {
                country_name: text(names),
                country_code: text(codes),
                year,
                measure: self.measure,
                value: lenient_f64(values.get(idx).unwrap_or(AnyValue::Null)),
            });
        }
        Ok(rows)
    }
}
