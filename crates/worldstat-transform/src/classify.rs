//! Magnitude-based measure classification.

use polars::prelude::DataFrame;
use tracing::{debug, warn};

use worldstat_model::schema::VALUE;
use worldstat_model::{ClassifierConfig, Measure};

use crate::data_utils::column_f64;
use crate::error::Result;

/// Outcome of the magnitude heuristic.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Classification {
    pub measure: Measure,
    /// Mean absolute value of the sample, `None` when it held no values.
    pub mean_abs: Option<f64>,
    /// Number of non-null values in the sample.
    pub sampled: usize,
}

/// Classifies a sequence of values taken in table order.
///
/// Only the first `sample_size` entries are inspected. A mean absolute value
/// strictly above the threshold is population; anything else, including an
/// empty sample, is GDP.
///
/// # Examples
///
/// ```
/// use worldstat_model::{ClassifierConfig, Measure};
/// use worldstat_transform::classify_values;
///
/// let config = ClassifierConfig::default();
/// let big = classify_values(vec![Some(8_000_000.0); 10], &config);
/// assert_eq!(big.measure, Measure::Population);
///
/// let small = classify_values(vec![Some(45_000.0); 10], &config);
/// assert_eq!(small.measure, Measure::Gdp);
/// ```
pub fn classify_values<I>(values: I, config: &ClassifierConfig) -> Classification
where
    I: IntoIterator<Item = Option<f64>>,
{
    let mut total = 0.0;
    let mut sampled = 0usize;
    for value in values.into_iter().take(config.sample_size).flatten() {
        total += value.abs();
        sampled += 1;
    }

    if sampled == 0 {
        return Classification {
            measure: Measure::Gdp,
            mean_abs: None,
            sampled,
        };
    }

    let mean_abs = total / sampled as f64;
    let measure = if mean_abs > config.population_threshold {
        Measure::Population
    } else {
        Measure::Gdp
    };
    Classification {
        measure,
        mean_abs: Some(mean_abs),
        sampled,
    }
}

/// Classifies a normalized table by its generic `value` column.
pub fn classify_table(df: &DataFrame, config: &ClassifierConfig) -> Result<Classification> {
    let values = column_f64(&df.head(Some(config.sample_size)), VALUE)?;
    let classification = classify_values(values, config);
    match classification.mean_abs {
        Some(mean_abs) => debug!(
            measure = %classification.measure,
            mean_abs,
            sampled = classification.sampled,
            "classified table by magnitude"
        ),
        None => warn!(
            sample_size = config.sample_size,
            "no values in sample, defaulting to gdp"
        ),
    }
    Ok(classification)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_utils::string_column;

    #[test]
    fn test_all_null_sample_is_gdp() {
        let result = classify_values(vec![None, None], &ClassifierConfig::default());
        assert_eq!(result.measure, Measure::Gdp);
        assert_eq!(result.mean_abs, None);
        assert_eq!(result.sampled, 0);
    }

    #[test]
    fn test_threshold_is_strict() {
        let config = ClassifierConfig::default();
        let at = classify_values(vec![Some(1_000_000.0)], &config);
        assert_eq!(at.measure, Measure::Gdp);
        let above = classify_values(vec![Some(-1_000_001.0)], &config);
        assert_eq!(above.measure, Measure::Population);
    }

    #[test]
    fn test_only_leading_rows_are_sampled() {
        let config = ClassifierConfig::default().with_sample_size(2);
        let values = vec![Some(10.0), None, Some(9e9), Some(9e9)];
        let result = classify_values(values, &config);
        assert_eq!(result.measure, Measure::Gdp);
        assert_eq!(result.sampled, 1);
        assert_eq!(result.mean_abs, Some(10.0));
    }

    #[test]
    fn test_classify_table() {
        let df = DataFrame::new(vec![string_column(
            VALUE,
            vec![Some("8000000".into()), Some("n/a".into()), None],
        )])
        .unwrap();
        let result = classify_table(&df, &ClassifierConfig::default()).unwrap();
        assert_eq!(result.measure, Measure::Population);
        assert_eq!(result.sampled, 1);
    }
}
