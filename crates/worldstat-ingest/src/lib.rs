//! Raw table ingestion.
//!
//! This crate is the loader collaborator of the integration engine: it finds
//! input CSV files, derives a measure hint from each file name, and reads
//! each file into a raw Polars DataFrame of string columns.
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use worldstat_ingest::{discover_files, read_raw_table};
//!
//! for file in discover_files(Path::new("data/raw"))? {
//!     let raw = read_raw_table(&file.path)?;
//!     println!("{} -> {:?} ({} rows)", file.name(), file.hint, raw.height());
//! }
//! ```

mod csv_table;
mod discovery;
mod error;

// === Error Types ===
pub use error::{IngestError, Result};

// === CSV Reading ===
pub use csv_table::{normalize_header, normalize_headers, read_raw_table, validate_encoding};

// === File Discovery ===
pub use discovery::{DiscoveredFile, discover_files, list_csv_files};
