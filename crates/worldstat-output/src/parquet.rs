//! Writing and reading the merged dataset as Parquet part files.

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use polars::prelude::{
    DataFrame, IntoColumn, NamedFrom, ParquetReader, ParquetWriter, SerReader, Series,
};
use tracing::{debug, info, warn};

use worldstat_model::WriteMode;
use worldstat_model::schema::{MERGED_COLUMNS, YEAR};

use crate::error::{OutputError, Result};
use crate::layout::{
    list_part_files, next_part_number, parse_partition_dir, part_file_name, partition_dir_name,
    split_by_year,
};

/// How the merged table is laid out and how an existing target is treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteOptions {
    pub mode: WriteMode,
    /// Write one `year=YYYY` directory per year.
    pub partition_by_year: bool,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            mode: WriteMode::Overwrite,
            partition_by_year: true,
        }
    }
}

/// Result of [`write_merged`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOutcome {
    Written { files: Vec<PathBuf>, rows: usize },
    /// The target existed and the mode was [`WriteMode::Ignore`].
    Skipped,
}

impl WriteOutcome {
    pub fn is_written(&self) -> bool {
        matches!(self, WriteOutcome::Written { .. })
    }
}

/// Writes the merged table under `target`.
///
/// Partitioned output goes to `<target>/year=<YYYY>/part-<NNNNN>.parquet`
/// without the `year` column; otherwise to `<target>/part-<NNNNN>.parquet`.
/// Appending picks the next free part number in every directory it writes.
pub fn write_merged(
    df: &DataFrame,
    target: &Path,
    options: &WriteOptions,
) -> Result<WriteOutcome> {
    let exists = target.exists();
    match options.mode {
        WriteMode::ErrorIfExists if exists => {
            return Err(OutputError::TargetExists {
                path: target.to_path_buf(),
            });
        }
        WriteMode::Ignore if exists => {
            info!(target = %target.display(), "output exists, skipping write");
            return Ok(WriteOutcome::Skipped);
        }
        WriteMode::Overwrite if exists => {
            debug!(target = %target.display(), "removing previous output");
            remove_path(target)?;
        }
        _ => {}
    }
    create_dir(target)?;

    let mut files = Vec::new();
    if options.partition_by_year {
        for (year, part) in split_by_year(df, YEAR)? {
            let dir = target.join(partition_dir_name(year));
            create_dir(&dir)?;
            files.push(write_part(&part, &dir)?);
        }
    } else {
        files.push(write_part(df, target)?);
    }

    info!(
        target = %target.display(),
        mode = %options.mode,
        files = files.len(),
        rows = df.height(),
        "wrote merged table"
    );
    Ok(WriteOutcome::Written {
        files,
        rows: df.height(),
    })
}

fn write_part(df: &DataFrame, dir: &Path) -> Result<PathBuf> {
    let path = dir.join(part_file_name(next_part_number(dir)?));
    let mut file = File::create(&path).map_err(|source| OutputError::File {
        path: path.clone(),
        source,
    })?;
    ParquetWriter::new(&mut file)
        .finish(&mut df.clone())
        .map_err(|e| OutputError::Parquet {
            path: path.clone(),
            message: e.to_string(),
        })?;
    debug!(path = %path.display(), rows = df.height(), "wrote part file");
    Ok(path)
}

/// Reads a dataset written by [`write_merged`] back into one frame.
///
/// Year partitions are restored as the `year` column and the result is put
/// in merged column order. Partitions are read in ascending year order.
pub fn read_merged(target: &Path) -> Result<DataFrame> {
    let mut partitions = Vec::new();
    let entries = fs::read_dir(target).map_err(|source| OutputError::ReadDir {
        path: target.to_path_buf(),
        source,
    })?;
    for entry in entries {
        let entry = entry.map_err(|source| OutputError::ReadDir {
            path: target.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }
        match path
            .file_name()
            .and_then(|name| name.to_str())
            .and_then(parse_partition_dir)
        {
            Some(year) => partitions.push((year, path)),
            None => warn!(path = %path.display(), "ignoring non-partition directory"),
        }
    }
    partitions.sort_by_key(|(year, _)| *year);

    let mut frames = Vec::new();
    for (_, path) in list_part_files(target)? {
        frames.push(read_part(&path)?);
    }
    for (year, dir) in partitions {
        for (_, path) in list_part_files(&dir)? {
            let mut part = read_part(&path)?;
            let years = Series::new(YEAR.into(), vec![year; part.height()]);
            part.with_column(years.into_column())?;
            frames.push(part.select(MERGED_COLUMNS)?);
        }
    }

    let mut frames = frames.into_iter();
    let Some(first) = frames.next() else {
        return Ok(DataFrame::empty());
    };
    let mut combined = first;
    for frame in frames {
        combined = combined.vstack(&frame)?;
    }
    Ok(combined)
}

fn read_part(path: &Path) -> Result<DataFrame> {
    let file = File::open(path).map_err(|source| OutputError::File {
        path: path.to_path_buf(),
        source,
    })?;
    ParquetReader::new(file)
        .finish()
        .map_err(|e| OutputError::Parquet {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
}

fn create_dir(path: &Path) -> Result<()> {
    fs::create_dir_all(path).map_err(|source| OutputError::CreateDir {
        path: path.to_path_buf(),
        source,
    })
}

fn remove_path(path: &Path) -> Result<()> {
    let result = if path.is_dir() {
        fs::remove_dir_all(path)
    } else {
        fs::remove_file(path)
    };
    result.map_err(|source| OutputError::Remove {
        path: path.to_path_buf(),
        source,
    })
}
