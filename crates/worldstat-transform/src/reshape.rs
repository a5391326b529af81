//! Wide-to-long reshaping.

use std::collections::BTreeSet;

use polars::prelude::{AnyValue, Column, DataFrame};
use tracing::debug;

use worldstat_common::any_to_string_opt;
use worldstat_model::schema::{VALUE, YEAR};

use crate::data_utils::string_column;
use crate::error::{Result, TransformError};
use crate::shape::is_year_like;

/// Picks the identifier columns of a wide table.
///
/// Columns matching `defaults` (trimmed, case-insensitive) are returned in
/// table order. Without a match the first two non-year columns are used.
pub fn select_id_columns(columns: &[String], defaults: &[String]) -> Result<Vec<String>> {
    let wanted: BTreeSet<String> = defaults.iter().map(|d| d.trim().to_lowercase()).collect();
    let matched: Vec<String> = columns
        .iter()
        .filter(|name| wanted.contains(&name.trim().to_lowercase()))
        .cloned()
        .collect();
    if !matched.is_empty() {
        return Ok(matched);
    }

    let fallback: Vec<String> = columns
        .iter()
        .filter(|name| !is_year_like(name))
        .take(2)
        .cloned()
        .collect();
    if fallback.is_empty() {
        return Err(TransformError::schema_mismatch(["identifier column"]));
    }
    debug!(id_columns = ?fallback, "no default identifier columns, using leading columns");
    Ok(fallback)
}

/// Output names of the id columns after [`wide_to_long`].
///
/// An id column literally named `year` or `value` would clash with the
/// unpivoted pair, so it gets an `_id` suffix (repeated until unique).
pub fn reshaped_id_columns(id_columns: &[String]) -> Vec<String> {
    let mut taken: BTreeSet<String> = [YEAR, VALUE].into_iter().map(String::from).collect();
    taken.extend(
        id_columns
            .iter()
            .filter(|name| name.as_str() != YEAR && name.as_str() != VALUE)
            .cloned(),
    );
    id_columns
        .iter()
        .map(|name| {
            if name != YEAR && name != VALUE {
                return name.clone();
            }
            let mut renamed = format!("{name}_id");
            while taken.contains(&renamed) {
                renamed.push_str("_id");
            }
            taken.insert(renamed.clone());
            renamed
        })
        .collect()
}

/// Unpivots year columns into `year` and `value`.
///
/// Emits one row per input row and year column, rows outer and years inner,
/// without dropping nulls. Cells keep their text form; casting happens in
/// the normalizer. Id columns are named per [`reshaped_id_columns`].
pub fn wide_to_long(
    df: &DataFrame,
    id_columns: &[String],
    year_columns: &[String],
) -> Result<DataFrame> {
    let height = df.height();
    let out_height = height * year_columns.len();

    let id_sources = id_columns
        .iter()
        .map(|name| df.column(name))
        .collect::<std::result::Result<Vec<&Column>, _>>()?;
    let year_sources = year_columns
        .iter()
        .map(|name| df.column(name))
        .collect::<std::result::Result<Vec<&Column>, _>>()?;

    let mut id_values: Vec<Vec<Option<String>>> =
        vec![Vec::with_capacity(out_height); id_columns.len()];
    let mut years = Vec::with_capacity(out_height);
    let mut values = Vec::with_capacity(out_height);

    for idx in 0..height {
        let ids: Vec<Option<String>> = id_sources
            .iter()
            .map(|column| any_to_string_opt(column.get(idx).unwrap_or(AnyValue::Null)))
            .collect();
        for (year, source) in year_columns.iter().zip(&year_sources) {
            for (slot, id) in id_values.iter_mut().zip(&ids) {
                slot.push(id.clone());
            }
            years.push(Some(year.trim().to_string()));
            values.push(any_to_string_opt(source.get(idx).unwrap_or(AnyValue::Null)));
        }
    }

    let mut columns: Vec<Column> = reshaped_id_columns(id_columns)
        .iter()
        .zip(id_values)
        .map(|(name, cells)| string_column(name, cells))
        .collect();
    columns.push(string_column(YEAR, years));
    columns.push(string_column(VALUE, values));

    debug!(
        rows = height,
        years = year_columns.len(),
        out_rows = out_height,
        "reshaped wide table"
    );
    Ok(DataFrame::new(columns)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_utils::{column_names, column_strings};

    fn names(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn wide() -> DataFrame {
        DataFrame::new(vec![
            string_column("Country Name", vec![Some("Aland".into()), Some("Chile".into())]),
            string_column("Country Code", vec![Some("ALA".into()), Some("CHL".into())]),
            string_column("1960", vec![Some("100".into()), None]),
            string_column("1961", vec![Some("110".into()), Some("7.6".into())]),
        ])
        .unwrap()
    }

    #[test]
    fn test_select_default_id_columns() {
        let columns = names(&["country code", "1960", "COUNTRY NAME"]);
        let defaults = names(&["Country Name", "Country Code"]);
        assert_eq!(
            select_id_columns(&columns, &defaults).unwrap(),
            names(&["country code", "COUNTRY NAME"])
        );
    }

    #[test]
    fn test_select_fallback_id_columns() {
        let columns = names(&["Economy", "1960", "ISO", "Series", "1961"]);
        let defaults = names(&["Country Name", "Country Code"]);
        assert_eq!(
            select_id_columns(&columns, &defaults).unwrap(),
            names(&["Economy", "ISO"])
        );
    }

    #[test]
    fn test_select_without_non_year_columns() {
        let columns = names(&["1960", "1961"]);
        let err = select_id_columns(&columns, &[]).unwrap_err();
        assert!(matches!(err, TransformError::SchemaMismatch { .. }));
    }

    #[test]
    fn test_wide_to_long() {
        let ids = names(&["Country Name", "Country Code"]);
        let years = names(&["1960", "1961"]);
        let long = wide_to_long(&wide(), &ids, &years).unwrap();

        assert_eq!(
            column_names(&long),
            vec!["Country Name", "Country Code", "year", "value"]
        );
        assert_eq!(long.height(), 4);
        assert_eq!(
            column_strings(&long, "Country Code").unwrap(),
            vec![
                Some("ALA".to_string()),
                Some("ALA".to_string()),
                Some("CHL".to_string()),
                Some("CHL".to_string())
            ]
        );
        assert_eq!(
            column_strings(&long, YEAR).unwrap(),
            vec![
                Some("1960".to_string()),
                Some("1961".to_string()),
                Some("1960".to_string()),
                Some("1961".to_string())
            ]
        );
        assert_eq!(
            column_strings(&long, VALUE).unwrap(),
            vec![
                Some("100".to_string()),
                Some("110".to_string()),
                None,
                Some("7.6".to_string())
            ]
        );
    }

    #[test]
    fn test_id_column_named_value_is_renamed() {
        let wide = DataFrame::new(vec![
            string_column("Economy", vec![Some("Aland".into())]),
            string_column("value", vec![Some("ALA".into())]),
            string_column("value_id", vec![Some("x".into())]),
            string_column("2020", vec![Some("30000".into())]),
        ])
        .unwrap();
        let ids = names(&["Economy", "value", "value_id"]);
        assert_eq!(
            reshaped_id_columns(&ids),
            names(&["Economy", "value_id_id", "value_id"])
        );

        let long = wide_to_long(&wide, &ids, &names(&["2020"])).unwrap();
        assert_eq!(
            column_names(&long),
            vec!["Economy", "value_id_id", "value_id", "year", "value"]
        );
        assert_eq!(
            column_strings(&long, VALUE).unwrap(),
            vec![Some("30000".to_string())]
        );
    }

    #[test]
    fn test_wide_to_long_empty_table() {
        let empty = wide().head(Some(0));
        let ids = names(&["Country Name", "Country Code"]);
        let long = wide_to_long(&empty, &ids, &names(&["1960", "1961"])).unwrap();
        assert_eq!(long.height(), 0);
        assert_eq!(long.width(), 4);
    }
}
