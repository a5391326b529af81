//! CSV reading utilities.

mod header;
mod reader;

pub use header::{normalize_header, normalize_headers};
pub use reader::{read_raw_table, validate_encoding};
