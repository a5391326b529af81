//! Long-format normalization into the canonical four-column layout.
//!
//! Both paths produce `country_name, country_code, year, <measure>` where
//! `year` is Int32 and the measure column Float64. Unparsable cells become
//! null; the cleaner removes them afterwards.

use polars::prelude::DataFrame;
use tracing::debug;

use worldstat_model::schema::{
    LONG_IDENTIFIER_NAMES, SHORT_VALUE, SOURCE_COUNTRY_CODE, SOURCE_COUNTRY_NAME, VALUE, YEAR,
};

use crate::data_utils::{
    canonical_frame, column_f64, column_i32, column_names, column_strings, find_column,
};
use crate::error::{Result, TransformError};
use crate::reshape::reshaped_id_columns;

/// One step of the value-column selection policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueColumnRule {
    /// Rightmost column whose name matches a candidate, ignoring case.
    ///
    /// A loader dedupe suffix (`Value_1`) counts as the base name, so a
    /// repeated header still resolves to its last occurrence.
    Named(Vec<String>),
    /// Last column that is not a known identifier.
    LastNonIdentifier,
    /// The table's last column.
    LastColumn,
}

impl ValueColumnRule {
    fn select<'a>(&self, columns: &'a [String]) -> Option<&'a str> {
        match self {
            ValueColumnRule::Named(candidates) => columns
                .iter()
                .rev()
                .find(|name| {
                    let name = name.trim();
                    let base = strip_dedupe_suffix(name);
                    candidates.iter().any(|candidate| {
                        name.eq_ignore_ascii_case(candidate) || base.eq_ignore_ascii_case(candidate)
                    })
                })
                .map(String::as_str),
            ValueColumnRule::LastNonIdentifier => columns
                .iter()
                .rev()
                .find(|name| {
                    !LONG_IDENTIFIER_NAMES.contains(&name.trim().to_lowercase().as_str())
                })
                .map(String::as_str),
            ValueColumnRule::LastColumn => columns.last().map(String::as_str),
        }
    }
}

/// `Value_2` -> `Value`; names without a numeric `_<n>` suffix are returned as is.
fn strip_dedupe_suffix(name: &str) -> &str {
    match name.rsplit_once('_') {
        Some((base, suffix))
            if !base.is_empty()
                && !suffix.is_empty()
                && suffix.bytes().all(|b| b.is_ascii_digit()) =>
        {
            base
        }
        _ => name,
    }
}

/// Default policy for a long table whose values belong to `measure_column`.
pub fn value_column_rules(measure_column: &str) -> Vec<ValueColumnRule> {
    vec![
        ValueColumnRule::Named(vec![
            VALUE.to_string(),
            measure_column.to_string(),
            SHORT_VALUE.to_string(),
        ]),
        ValueColumnRule::LastNonIdentifier,
        ValueColumnRule::LastColumn,
    ]
}

/// Applies the rules in order and returns the first column selected.
pub fn select_value_column<'a>(
    columns: &'a [String],
    rules: &[ValueColumnRule],
) -> Option<&'a str> {
    rules.iter().find_map(|rule| rule.select(columns))
}

/// Normalizes a long table.
///
/// `Country Name` and `Country Code` are required; a table lacking either
/// is rejected rather than null-filled.
pub fn normalize_long(df: &DataFrame, measure_column: &str) -> Result<DataFrame> {
    let columns = column_names(df);

    let name_column = find_column(&columns, SOURCE_COUNTRY_NAME);
    let code_column = find_column(&columns, SOURCE_COUNTRY_CODE);
    let year_column = find_column(&columns, YEAR);
    let missing: Vec<&str> = [
        (SOURCE_COUNTRY_NAME, name_column),
        (SOURCE_COUNTRY_CODE, code_column),
        (YEAR, year_column),
    ]
    .into_iter()
    .filter(|(_, found)| found.is_none())
    .map(|(wanted, _)| wanted)
    .collect();
    let (Some(name_column), Some(code_column), Some(year_column)) =
        (name_column, code_column, year_column)
    else {
        return Err(TransformError::schema_mismatch(missing));
    };

    let Some(value_column) = select_value_column(&columns, &value_column_rules(measure_column))
    else {
        return Err(TransformError::schema_mismatch(["value column"]));
    };
    debug!(value_column, measure_column, "normalizing long table");

    canonical_frame(
        column_strings(df, name_column)?,
        column_strings(df, code_column)?,
        column_i32(df, year_column)?,
        column_f64(df, value_column)?,
        measure_column,
    )
}

/// Normalizes the output of the reshaper.
///
/// The first id column supplies `country_name` and the second
/// `country_code`; with a single id column it supplies both. Further id
/// columns are dropped.
pub fn normalize_wide(
    long: &DataFrame,
    id_columns: &[String],
    measure_column: &str,
) -> Result<DataFrame> {
    let id_columns = reshaped_id_columns(id_columns);
    let Some(name_column) = id_columns.first() else {
        return Err(TransformError::schema_mismatch(["identifier column"]));
    };
    let code_column = id_columns.get(1).unwrap_or(name_column);

    canonical_frame(
        column_strings(long, name_column)?,
        column_strings(long, code_column)?,
        column_i32(long, YEAR)?,
        column_f64(long, VALUE)?,
        measure_column,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_utils::string_column;
    use worldstat_model::schema::{COUNTRY_CODE, COUNTRY_NAME};

    fn names(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_named_rule_prefers_rightmost_match() {
        let columns = names(&[
            "Country Name",
            "Country Code",
            "Year",
            "Value",
            "Value_1",
            "VAL",
        ]);
        let rules = value_column_rules("gdp");
        assert_eq!(select_value_column(&columns, &rules), Some("VAL"));
    }

    #[test]
    fn test_named_rule_treats_dedupe_suffix_as_repeat() {
        let columns = names(&["Country Name", "Country Code", "Year", "Value", "Value_1"]);
        let rules = value_column_rules("population");
        assert_eq!(select_value_column(&columns, &rules), Some("Value_1"));

        let columns = names(&["Country Name", "Year", "Value_total", "Value"]);
        assert_eq!(select_value_column(&columns, &rules), Some("Value"));
    }

    #[test]
    fn test_normalize_long_uses_trailing_duplicate_value() {
        let df = DataFrame::new(vec![
            string_column("Country Name", vec![Some("Chile".into())]),
            string_column("Country Code", vec![Some("CHL".into())]),
            string_column("Year", vec![Some("2020".into())]),
            string_column("Value", vec![Some("1".into())]),
            string_column("Value_1", vec![Some("19116209".into())]),
        ])
        .unwrap();

        let out = normalize_long(&df, "population").unwrap();
        assert_eq!(
            column_f64(&out, "population").unwrap(),
            vec![Some(19_116_209.0)]
        );
    }

    #[test]
    fn test_named_rule_matches_measure_name() {
        let columns = names(&["Country Name", "Country Code", "Year", "Population", "Notes"]);
        let rules = value_column_rules("population");
        assert_eq!(select_value_column(&columns, &rules), Some("Population"));
    }

    #[test]
    fn test_fallback_skips_identifiers() {
        let columns = names(&["Country", "Amount", "Year", "Country Code"]);
        let rules = value_column_rules(VALUE);
        assert_eq!(select_value_column(&columns, &rules), Some("Amount"));
    }

    #[test]
    fn test_last_column_rule() {
        let columns = names(&["Country Name", "Year"]);
        let rules = value_column_rules(VALUE);
        assert_eq!(select_value_column(&columns, &rules), Some("Year"));
        assert_eq!(select_value_column(&[], &rules), None);
    }

    #[test]
    fn test_normalize_long_casts_leniently() {
        let df = DataFrame::new(vec![
            string_column("country name", vec![Some("Aland".into()), Some("Chile".into())]),
            string_column("COUNTRY CODE", vec![Some("ALA".into()), Some("CHL".into())]),
            string_column("Year", vec![Some("2020.0".into()), Some("unknown".into())]),
            string_column("Value", vec![Some("30000".into()), Some("x".into())]),
        ])
        .unwrap();

        let out = normalize_long(&df, "population").unwrap();
        assert_eq!(
            column_names(&out),
            vec![COUNTRY_NAME, COUNTRY_CODE, YEAR, "population"]
        );
        assert_eq!(column_i32(&out, YEAR).unwrap(), vec![Some(2020), None]);
        assert_eq!(
            column_f64(&out, "population").unwrap(),
            vec![Some(30_000.0), None]
        );
    }

    #[test]
    fn test_normalize_long_requires_identifiers() {
        let df = DataFrame::new(vec![
            string_column("Country Name", vec![Some("Aland".into())]),
            string_column("Year", vec![Some("2020".into())]),
            string_column("Value", vec![Some("1".into())]),
        ])
        .unwrap();

        let err = normalize_long(&df, VALUE).unwrap_err();
        match err {
            TransformError::SchemaMismatch { missing } => {
                assert_eq!(missing, vec![SOURCE_COUNTRY_CODE.to_string()]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_normalize_wide_single_id_column() {
        let long = DataFrame::new(vec![
            string_column("Economy", vec![Some("Aland".into())]),
            string_column(YEAR, vec![Some("1960".into())]),
            string_column(VALUE, vec![Some("100".into())]),
        ])
        .unwrap();

        let out = normalize_wide(&long, &names(&["Economy"]), "gdp").unwrap();
        assert_eq!(
            column_strings(&out, COUNTRY_CODE).unwrap(),
            vec![Some("Aland".to_string())]
        );
        assert_eq!(column_f64(&out, "gdp").unwrap(), vec![Some(100.0)]);
    }
}
