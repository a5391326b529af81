//! DataFrame value extraction and column building helpers.

use polars::prelude::{AnyValue, Column, DataFrame, DataType, IntoColumn, NamedFrom, Series};

use worldstat_common::{any_to_string_opt, lenient_f64, lenient_i32};
use worldstat_model::schema::{COUNTRY_CODE, COUNTRY_NAME, YEAR};

use crate::error::Result;

/// Column names of a DataFrame in table order.
pub fn column_names(df: &DataFrame) -> Vec<String> {
    df.get_column_names()
        .iter()
        .map(|s| s.to_string())
        .collect()
}

/// Finds a column whose trimmed name equals `name`, ignoring case.
pub fn find_column<'a>(columns: &'a [String], name: &str) -> Option<&'a str> {
    columns
        .iter()
        .find(|column| column.trim().eq_ignore_ascii_case(name.trim()))
        .map(String::as_str)
}

/// Extract a column as optional strings; null cells stay `None`.
pub fn column_strings(df: &DataFrame, name: &str) -> Result<Vec<Option<String>>> {
    let series = df.column(name)?;
    Ok((0..df.height())
        .map(|idx| any_to_string_opt(series.get(idx).unwrap_or(AnyValue::Null)))
        .collect())
}

/// Extract a column as 32-bit integers with the lenient cast.
pub fn column_i32(df: &DataFrame, name: &str) -> Result<Vec<Option<i32>>> {
    let series = df.column(name)?;
    Ok((0..df.height())
        .map(|idx| lenient_i32(series.get(idx).unwrap_or(AnyValue::Null)))
        .collect())
}

/// Extract a column as 64-bit floats with the lenient cast.
pub fn column_f64(df: &DataFrame, name: &str) -> Result<Vec<Option<f64>>> {
    let series = df.column(name)?;
    Ok((0..df.height())
        .map(|idx| lenient_f64(series.get(idx).unwrap_or(AnyValue::Null)))
        .collect())
}

pub fn string_column(name: &str, values: Vec<Option<String>>) -> Column {
    Series::new(name.into(), values).into_column()
}

pub fn i32_column(name: &str, values: Vec<Option<i32>>) -> Column {
    Series::new(name.into(), values).into_column()
}

pub fn f64_column(name: &str, values: Vec<Option<f64>>) -> Column {
    Series::new(name.into(), values).into_column()
}

/// Builds a canonical single-measure frame.
pub fn canonical_frame(
    names: Vec<Option<String>>,
    codes: Vec<Option<String>>,
    years: Vec<Option<i32>>,
    values: Vec<Option<f64>>,
    value_column: &str,
) -> Result<DataFrame> {
    Ok(DataFrame::new(vec![
        string_column(COUNTRY_NAME, names),
        string_column(COUNTRY_CODE, codes),
        i32_column(YEAR, years),
        f64_column(value_column, values),
    ])?)
}

/// Returns a copy of `df` with column `from` renamed to `to`, keeping position.
pub fn rename_column(df: &DataFrame, from: &str, to: &str) -> Result<DataFrame> {
    let columns: Vec<Column> = df
        .get_columns()
        .iter()
        .map(|column| {
            if column.name().as_str() == from {
                column.clone().with_name(to.into())
            } else {
                column.clone()
            }
        })
        .collect();
    Ok(DataFrame::new(columns)?)
}

/// Adds an all-null `country_code` column when the frame lacks one.
pub fn ensure_country_code(df: &DataFrame) -> Result<DataFrame> {
    if df.column(COUNTRY_CODE).is_ok() {
        return Ok(df.clone());
    }
    let mut out = df.clone();
    let nulls = Series::full_null(COUNTRY_CODE.into(), df.height(), &DataType::String);
    out.with_column(nulls)?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> DataFrame {
        DataFrame::new(vec![
            string_column("Country Name", vec![Some("Aland".into()), None]),
            string_column("Year", vec![Some("2020".into()), Some("n/a".into())]),
            string_column("Value", vec![Some(" 30000 ".into()), Some("1.5".into())]),
        ])
        .unwrap()
    }

    #[test]
    fn test_find_column_ignores_case() {
        let columns = column_names(&sample());
        assert_eq!(find_column(&columns, "country name"), Some("Country Name"));
        assert_eq!(find_column(&columns, "YEAR"), Some("Year"));
        assert_eq!(find_column(&columns, "Country Code"), None);
    }

    #[test]
    fn test_lenient_column_casts() {
        let df = sample();
        assert_eq!(column_i32(&df, "Year").unwrap(), vec![Some(2020), None]);
        assert_eq!(
            column_f64(&df, "Value").unwrap(),
            vec![Some(30_000.0), Some(1.5)]
        );
        assert_eq!(
            column_strings(&df, "Country Name").unwrap(),
            vec![Some("Aland".to_string()), None]
        );
    }

    #[test]
    fn test_rename_column_keeps_position() {
        let renamed = rename_column(&sample(), "Year", "year").unwrap();
        assert_eq!(column_names(&renamed), vec!["Country Name", "year", "Value"]);
    }

    #[test]
    fn test_ensure_country_code() {
        let df = ensure_country_code(&sample()).unwrap();
        assert_eq!(df.column(COUNTRY_CODE).unwrap().null_count(), 2);
        let again = ensure_country_code(&df).unwrap();
        assert_eq!(again.width(), df.width());
    }
}
