use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the check-in monitor.
///
/// Per-cell normalization misses are deliberately NOT errors: a malformed
/// date or time resolves to an empty value and the row stays in the output.
#[derive(Error, Debug)]
pub enum CheckinError {
    /// A workbook file could not be opened or read from disk.
    #[error("Failed to read workbook {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The uploaded bytes could not be decoded as a spreadsheet.
    #[error("Failed to decode workbook: {0}")]
    WorkbookDecode(String),

    /// The workbook decoded fine but contains no sheets at all.
    #[error("Workbook \"{filename}\" contains no sheets")]
    EmptyWorkbook { filename: String },

    /// A sheet exists but its cells could not be read as tabular rows.
    #[error("Failed to decode sheet \"{sheet}\": {detail}")]
    SheetDecode { sheet: String, detail: String },

    /// A JSON document could not be parsed or produced.
    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Pass-through for any raw I/O error that does not carry a path.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Catch-all for errors from third-party crates via `anyhow`.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Convenience alias used throughout the workspace crates.
pub type Result<T> = std::result::Result<T, CheckinError>;
