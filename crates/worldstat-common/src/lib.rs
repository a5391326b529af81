//! Shared utilities for worldstat crates.
//!
//! This crate provides common utilities used across the workspace,
//! including Polars `AnyValue` coercions and the lenient casts the
//! normalizer relies on.

pub mod value;

// Re-export commonly used functions at crate root for convenience
pub use value::{
    any_to_f64, any_to_i64, any_to_string, any_to_string_opt, format_numeric, lenient_f64,
    lenient_i32, parse_f64, parse_i64,
};
