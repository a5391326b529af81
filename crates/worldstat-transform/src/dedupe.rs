//! Key-based row deduplication.

use std::collections::BTreeSet;

use polars::prelude::{AnyValue, BooleanChunked, DataFrame, NewChunkedArray};

use worldstat_common::any_to_string_opt;

use crate::error::Result;

/// Keeps the first row of every distinct key.
///
/// Nulls in key columns compare equal to each other and differ from every
/// value, including the empty string. Missing key columns are ignored.
pub fn dedupe_frame_by_keys(df: &DataFrame, keys: &[&str]) -> Result<DataFrame> {
    if df.height() == 0 {
        return Ok(df.clone());
    }
    let key_columns = keys
        .iter()
        .filter_map(|key| df.column(key).ok())
        .collect::<Vec<_>>();
    if key_columns.is_empty() {
        return Ok(df.clone());
    }

    let mut seen: BTreeSet<Vec<Option<String>>> = BTreeSet::new();
    let mut keep = Vec::with_capacity(df.height());
    for idx in 0..df.height() {
        let composite: Vec<Option<String>> = key_columns
            .iter()
            .map(|column| any_to_string_opt(column.get(idx).unwrap_or(AnyValue::Null)))
            .collect();
        keep.push(seen.insert(composite));
    }

    if keep.iter().all(|k| *k) {
        return Ok(df.clone());
    }
    let mask = BooleanChunked::from_slice("dedupe".into(), &keep);
    Ok(df.filter(&mask)?)
}
