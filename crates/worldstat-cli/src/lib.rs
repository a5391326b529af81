//! CLI library components for worldstat.

#![allow(missing_docs)]

pub mod logging;
pub mod pipeline;
pub mod summary;
pub mod types;
