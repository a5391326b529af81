//! Parquet output for the merged country-year table.
//!
//! The writer supports Spark-style write modes and an optional
//! `year=YYYY` directory partitioning.

mod error;
pub mod layout;
mod parquet;

pub use error::{OutputError, Result};
pub use parquet::{WriteOptions, WriteOutcome, read_merged, write_merged};
