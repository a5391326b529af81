//! Directory layout of written datasets.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};

use polars::prelude::{AnyValue, BooleanChunked, DataFrame, NewChunkedArray};

use worldstat_common::lenient_i32;

use crate::error::{OutputError, Result};

/// Prefix of partition directories, as in `year=2020`.
pub const PARTITION_PREFIX: &str = "year=";

/// Directory name for rows without a year.
pub const NULL_PARTITION: &str = "__HIVE_DEFAULT_PARTITION__";

const PART_PREFIX: &str = "part-";
const PART_SUFFIX: &str = ".parquet";

/// File name of the `number`th part file.
pub fn part_file_name(number: usize) -> String {
    format!("{PART_PREFIX}{number:05}{PART_SUFFIX}")
}

/// Parses the number out of a part file name.
pub fn part_number(file_name: &str) -> Option<usize> {
    file_name
        .strip_prefix(PART_PREFIX)?
        .strip_suffix(PART_SUFFIX)?
        .parse()
        .ok()
}

/// Directory name of a year partition.
pub fn partition_dir_name(year: Option<i32>) -> String {
    match year {
        Some(year) => format!("{PARTITION_PREFIX}{year}"),
        None => format!("{PARTITION_PREFIX}{NULL_PARTITION}"),
    }
}

/// Parses a partition directory name; the null partition maps to `Some(None)`.
pub fn parse_partition_dir(name: &str) -> Option<Option<i32>> {
    let value = name.strip_prefix(PARTITION_PREFIX)?;
    if value == NULL_PARTITION {
        return Some(None);
    }
    value.parse().ok().map(Some)
}

/// Part files in `dir`, sorted by part number.
pub fn list_part_files(dir: &Path) -> Result<Vec<(usize, PathBuf)>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }
    let entries = fs::read_dir(dir).map_err(|source| OutputError::ReadDir {
        path: dir.to_path_buf(),
        source,
    })?;
    let mut parts = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| OutputError::ReadDir {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        if let Some(number) = path
            .file_name()
            .and_then(|name| name.to_str())
            .and_then(part_number)
        {
            parts.push((number, path));
        }
    }
    parts.sort_by_key(|(number, _)| *number);
    Ok(parts)
}

/// Next unused part number in `dir`.
pub fn next_part_number(dir: &Path) -> Result<usize> {
    Ok(list_part_files(dir)?
        .last()
        .map_or(0, |(number, _)| number + 1))
}

/// Splits a frame into one frame per year, in ascending year order.
///
/// Null years sort first. The year column itself is removed from each part.
pub fn split_by_year(
    df: &DataFrame,
    year_column: &str,
) -> Result<BTreeMap<Option<i32>, DataFrame>> {
    let years = df.column(year_column)?;
    let keys: Vec<Option<i32>> = (0..df.height())
        .map(|idx| lenient_i32(years.get(idx).unwrap_or(AnyValue::Null)))
        .collect();

    let mut parts = BTreeMap::new();
    let distinct: BTreeSet<Option<i32>> = keys.iter().copied().collect();
    for year in distinct {
        let keep: Vec<bool> = keys.iter().map(|key| *key == year).collect();
        let mask = BooleanChunked::from_slice("partition".into(), &keep);
        let part = df.filter(&mask)?.drop(year_column)?;
        parts.insert(year, part);
    }
    Ok(parts)
}
