//! Row-level views of measure and merged tables.

use serde::{Deserialize, Serialize};

use crate::measure::Measure;

/// One observation of a single measure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalRow {
    pub country_name: Option<String>,
    pub country_code: Option<String>,
    pub year: i32,
    pub measure: Measure,
    pub value: Option<f64>,
}

/// One (country, year) row of the integrated output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergedRow {
    pub country_name: Option<String>,
    pub country_code: Option<String>,
    pub year: i32,
    pub population: Option<f64>,
    pub gdp: Option<f64>,
}

impl MergedRow {
    /// Builds a merged row from a single measure observation.
    pub fn from_single(row: &CanonicalRow) -> Self {
        let (population, gdp) = match row.measure {
            Measure::Population => (row.value, None),
            Measure::Gdp => (None, row.value),
        };
        Self {
            country_name: row.country_name.clone(),
            country_code: row.country_code.clone(),
            year: row.year,
            population,
            gdp,
        }
    }
}
