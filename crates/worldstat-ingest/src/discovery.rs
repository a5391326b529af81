//! Input file discovery.

use std::path::{Path, PathBuf};

use worldstat_model::MeasureHint;

use crate::error::{IngestError, Result};

/// A discovered CSV file with its filename-derived measure hint.
#[derive(Debug, Clone)]
pub struct DiscoveredFile {
    /// Path to the CSV file.
    pub path: PathBuf,
    /// Measure suggested by the file name.
    pub hint: MeasureHint,
}

impl DiscoveredFile {
    pub fn new(path: PathBuf) -> Self {
        let hint = path
            .file_name()
            .and_then(|name| name.to_str())
            .map(MeasureHint::from_file_name)
            .unwrap_or(MeasureHint::Unknown);
        Self { path, hint }
    }

    /// File name for reports, falling back to the full path.
    pub fn name(&self) -> String {
        self.path
            .file_name()
            .and_then(|name| name.to_str())
            .map(str::to_string)
            .unwrap_or_else(|| self.path.display().to_string())
    }
}

/// Lists all CSV files in a directory.
///
/// Returns files sorted by filename.
pub fn list_csv_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(IngestError::DirectoryNotFound {
            path: dir.to_path_buf(),
        });
    }

    let mut files = Vec::new();

    let entries = std::fs::read_dir(dir).map_err(|e| IngestError::DirectoryRead {
        path: dir.to_path_buf(),
        source: e,
    })?;

    for entry_result in entries {
        let entry = entry_result.map_err(|e| IngestError::DirectoryRead {
            path: dir.to_path_buf(),
            source: e,
        })?;

        let path = entry.path();

        // Skip directories
        if !path.is_file() {
            continue;
        }

        // Check for .csv extension (case-insensitive)
        let is_csv = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));

        if is_csv {
            files.push(path);
        }
    }

    // Sort by filename
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

    Ok(files)
}

/// Lists CSV files and attaches a measure hint to each.
pub fn discover_files(dir: &Path) -> Result<Vec<DiscoveredFile>> {
    Ok(list_csv_files(dir)?
        .into_iter()
        .map(DiscoveredFile::new)
        .collect())
}
