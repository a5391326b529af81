//! Long/wide layout detection from column names.

use crate::error::{Result, TransformError};

/// Layout of a raw table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableShape {
    /// One row per country, year and value; carries a `year` column.
    Long,
    /// One column per year.
    Wide {
        /// Year-like columns in table order.
        year_columns: Vec<String>,
    },
}

/// Returns true when the trimmed name is exactly four ASCII digits.
///
/// # Examples
///
/// ```
/// use worldstat_transform::is_year_like;
///
/// assert!(is_year_like("1960"));
/// assert!(is_year_like(" 2023 "));
/// assert!(!is_year_like("1960 [YR1960]"));
/// assert!(!is_year_like("١٩٦٠"));
/// ```
pub fn is_year_like(name: &str) -> bool {
    let trimmed = name.trim();
    trimmed.len() == 4 && trimmed.bytes().all(|b| b.is_ascii_digit())
}

/// Classifies a table by its column names.
///
/// A `year` column (any case) wins over year-like columns.
pub fn detect_shape(columns: &[String]) -> Result<TableShape> {
    if columns
        .iter()
        .any(|name| name.trim().to_lowercase() == "year")
    {
        return Ok(TableShape::Long);
    }

    let year_columns: Vec<String> = columns
        .iter()
        .filter(|name| is_year_like(name))
        .cloned()
        .collect();
    if year_columns.is_empty() {
        return Err(TransformError::UnrecognizedShape {
            columns: columns.to_vec(),
        });
    }
    Ok(TableShape::Wide { year_columns })
}
