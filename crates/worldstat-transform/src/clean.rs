//! Row cleaning for normalized measure tables.

use polars::prelude::{AnyValue, BooleanChunked, DataFrame, NewChunkedArray};
use tracing::debug;

use worldstat_model::schema::{COUNTRY_CODE, COUNTRY_NAME, YEAR};

use crate::data_utils::{column_strings, string_column};
use crate::error::Result;

/// Cleans a normalized table.
///
/// Trims `country_name`, strips every whitespace character from
/// `country_code`, then drops rows whose `year` or measure value is null.
/// Row order is kept and a second pass changes nothing.
pub fn clean_measure_table(df: &DataFrame, measure_column: &str) -> Result<DataFrame> {
    let mut out = df.clone();

    if out.column(COUNTRY_NAME).is_ok() {
        let names = column_strings(&out, COUNTRY_NAME)?
            .into_iter()
            .map(|name| name.map(|n| n.trim().to_string()))
            .collect();
        out.with_column(string_column(COUNTRY_NAME, names))?;
    }

    if out.column(COUNTRY_CODE).is_ok() {
        let codes = column_strings(&out, COUNTRY_CODE)?
            .into_iter()
            .map(|code| code.map(|c| strip_whitespace(&c)))
            .collect();
        out.with_column(string_column(COUNTRY_CODE, codes))?;
    }

    let required: Vec<&str> = [YEAR, measure_column]
        .into_iter()
        .filter(|name| out.column(name).is_ok())
        .collect();
    if required.is_empty() || out.height() == 0 {
        return Ok(out);
    }

    let mut keep = Vec::with_capacity(out.height());
    for idx in 0..out.height() {
        let mut present = true;
        for name in &required {
            let column = out.column(name)?;
            if matches!(column.get(idx).unwrap_or(AnyValue::Null), AnyValue::Null) {
                present = false;
                break;
            }
        }
        keep.push(present);
    }

    let before = out.height();
    let mask = BooleanChunked::from_slice("clean".into(), &keep);
    let out = out.filter(&mask)?;
    debug!(
        measure_column,
        dropped = before - out.height(),
        kept = out.height(),
        "cleaned measure table"
    );
    Ok(out)
}

fn strip_whitespace(value: &str) -> String {
    if !value.chars().any(char::is_whitespace) {
        return value.to_string();
    }
    value.chars().filter(|ch| !ch.is_whitespace()).collect()
}
