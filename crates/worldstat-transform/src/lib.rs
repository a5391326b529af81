//! Table normalization and integration for country-year statistics.
//!
//! This crate is the core of worldstat:
//!
//! - **shape**: long/wide detection from column names
//! - **reshape**: wide-to-long unpivot and identifier selection
//! - **normalize**: canonical `country_name, country_code, year, <measure>` tables
//! - **classify**: magnitude heuristic for tables without a measure hint
//! - **clean**: trimming and null-row removal
//! - **merge**: outer join of population and GDP with deduplication
//! - **pipeline**: per-file processing and run integration
//!
//! Nothing here touches the filesystem; loading and writing live in
//! `worldstat-ingest` and `worldstat-output`.

pub mod classify;
pub mod clean;
pub mod data_utils;
pub mod dedupe;
pub mod error;
pub mod frame;
pub mod merge;
pub mod normalize;
pub mod pipeline;
pub mod reshape;
pub mod shape;

pub use classify::{Classification, classify_table, classify_values};
pub use clean::clean_measure_table;
pub use error::{Result, TransformError};
pub use frame::{MeasureFrame, MeasureFrameMeta};
pub use merge::{merge_measures, merged_frame, merged_rows, outer_join};
pub use normalize::{
    ValueColumnRule, normalize_long, normalize_wide, select_value_column, value_column_rules,
};
pub use pipeline::{
    FileResult, MeasureTables, NormalizedTable, RunReport, SourceTable, integrate,
    integrate_tables, process_file, process_table,
};
pub use reshape::{select_id_columns, wide_to_long};
pub use shape::{TableShape, detect_shape, is_year_like};
