//! Measure identity and filename hints.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::schema::{GDP, POPULATION};

/// The statistical quantity a table represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Measure {
    Population,
    Gdp,
}

impl Measure {
    /// Column name the measure's values carry after normalization.
    pub fn column_name(self) -> &'static str {
        match self {
            Measure::Population => POPULATION,
            Measure::Gdp => GDP,
        }
    }

    /// Returns the other measure of the pair.
    pub fn other(self) -> Measure {
        match self {
            Measure::Population => Measure::Gdp,
            Measure::Gdp => Measure::Population,
        }
    }
}

impl fmt::Display for Measure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column_name())
    }
}

/// Measure identity as known before a file is normalized.
///
/// Resolved once per file from its name; `Unknown` routes the file through
/// the magnitude classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MeasureHint {
    Population,
    Gdp,
    Unknown,
}

impl MeasureHint {
    /// Derives a hint from a file name.
    ///
    /// Population markers are checked before GDP markers, so a name carrying
    /// both (e.g. `gdp_per_pop.csv`) resolves to population.
    ///
    /// # Examples
    ///
    /// ```
    /// use worldstat_model::MeasureHint;
    ///
    /// assert_eq!(MeasureHint::from_file_name("population.csv"), MeasureHint::Population);
    /// assert_eq!(MeasureHint::from_file_name("GDP_current_usd.csv"), MeasureHint::Gdp);
    /// assert_eq!(MeasureHint::from_file_name("indicators.csv"), MeasureHint::Unknown);
    /// ```
    pub fn from_file_name(name: &str) -> Self {
        let lower = name.to_lowercase();
        if lower.contains("pop") || lower.contains("population") {
            MeasureHint::Population
        } else if lower.contains("gdp") || lower.contains("gross") {
            MeasureHint::Gdp
        } else {
            MeasureHint::Unknown
        }
    }

    pub fn measure(self) -> Option<Measure> {
        match self {
            MeasureHint::Population => Some(Measure::Population),
            MeasureHint::Gdp => Some(Measure::Gdp),
            MeasureHint::Unknown => None,
        }
    }
}
