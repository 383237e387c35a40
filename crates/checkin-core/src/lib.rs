//! Core domain layer for the check-in monitor.
//!
//! Holds the shared data model (raw rows, log entries, aggregation rows),
//! the cell normalizers that turn loosely-formatted spreadsheet values into
//! canonical dates and times, the column alias table, bucketing math, the
//! error taxonomy, and CLI settings.

pub mod buckets;
pub mod cells;
pub mod columns;
pub mod error;
pub mod models;
pub mod settings;

pub use error::{CheckinError, Result};
