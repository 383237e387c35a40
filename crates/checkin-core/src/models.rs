use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

// ── CellValue ─────────────────────────────────────────────────────────────────

/// The decoded content of a single spreadsheet cell.
///
/// Source spreadsheets are human-maintained: the same column may hold raw
/// date/time serials, preformatted strings, or nothing at all. The variants
/// here preserve that looseness so normalization can apply its own priority
/// rules downstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    /// An empty cell. Serializes as JSON `null`.
    Empty,
    /// A text cell, kept verbatim.
    Text(String),
    /// A numeric cell, including date and time-of-day serials.
    Number(f64),
    /// A boolean cell.
    Bool(bool),
    /// A structured date-time cell (e.g. an ISO date-time the decoder
    /// already resolved).
    Date(NaiveDateTime),
}

impl CellValue {
    /// `true` for [`CellValue::Empty`] and for whitespace-only text.
    ///
    /// Numeric `0` is NOT empty; midnight is a valid check-in time.
    pub fn is_empty(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Render the cell the way it would appear in a grid: text verbatim,
    /// numbers without a trailing `.0`, empty cells as `""`.
    pub fn display(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::Text(s) => s.clone(),
            CellValue::Number(n) => format!("{}", n),
            CellValue::Bool(b) => b.to_string(),
            CellValue::Date(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }
}

// ── RawRecord ─────────────────────────────────────────────────────────────────

/// One spreadsheet data row: an ordered `header → cell` mapping.
///
/// No schema is enforced at this level; the columns of interest are located
/// later by the alias table in [`crate::columns`]. Header matching is
/// case-insensitive.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRecord {
    cells: Vec<(String, CellValue)>,
}

impl RawRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a `header → value` pair, preserving column order.
    pub fn insert(&mut self, header: impl Into<String>, value: CellValue) {
        self.cells.push((header.into(), value));
    }

    /// Look up a cell by header, ignoring ASCII case.
    pub fn get(&self, header: &str) -> Option<&CellValue> {
        self.cells
            .iter()
            .find(|(h, _)| h.eq_ignore_ascii_case(header))
            .map(|(_, v)| v)
    }

    /// Iterate `(header, value)` pairs in column order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &CellValue)> {
        self.cells.iter().map(|(h, v)| (h.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// `true` when every cell in the row is empty (blank spreadsheet line).
    pub fn is_blank(&self) -> bool {
        self.cells.iter().all(|(_, v)| v.is_empty())
    }
}

impl FromIterator<(String, CellValue)> for RawRecord {
    fn from_iter<I: IntoIterator<Item = (String, CellValue)>>(iter: I) -> Self {
        Self {
            cells: iter.into_iter().collect(),
        }
    }
}

// ── LogEntry ──────────────────────────────────────────────────────────────────

/// A display-ready check-in log row derived from exactly one [`RawRecord`].
///
/// All fields are strings; a field that is missing or unparseable in the
/// source row renders as `""`, never as null. Field names on the wire match
/// the shape the dashboard front-end consumes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Student identifier, taken from the first non-empty of the `ID` /
    /// `Student Number` columns.
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Program")]
    pub program: String,
    /// Normalized calendar date, `YYYY-MM-DD` or `""`.
    pub date: String,
    /// Localized 12-hour display time, or the raw cell text when the time
    /// could not be parsed.
    #[serde(rename = "checkInTime")]
    pub check_in_time: String,
    #[serde(rename = "Year")]
    pub year: String,
}

// ── Aggregation rows ──────────────────────────────────────────────────────────

/// Monthly visit histogram for one program, on an academic-year axis.
///
/// `monthly_values[0]` is August, `monthly_values[11]` is July. Records with
/// unparseable dates count toward `total` but land in no month slot, so the
/// slot sum is `<= total`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgramMonthlyStat {
    pub program: String,
    pub total: u64,
    #[serde(rename = "monthlyValues")]
    pub monthly_values: [u64; 12],
}

impl ProgramMonthlyStat {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            total: 0,
            monthly_values: [0; 12],
        }
    }
}

/// Visit count for one hour-of-day bucket.
///
/// `time` is the range label `"H:00-H+1:00"` with no leading zero on the
/// hour. Downstream presentation matches on that exact format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSlotStat {
    pub time: String,
    pub total: u64,
}

// ── UploadedDataset ───────────────────────────────────────────────────────────

/// One ingested workbook: the rows of its first sheet plus upload metadata.
///
/// Owned by the dataset store; aggregators only ever borrow `rows`.
#[derive(Debug, Clone)]
pub struct UploadedDataset {
    pub filename: String,
    pub uploaded_at: DateTime<Utc>,
    pub rows: Vec<RawRecord>,
}

impl UploadedDataset {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

// ── Service payloads ──────────────────────────────────────────────────────────

/// Response payload for a successful upload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadReceipt {
    pub row_count: usize,
    /// The first five formatted rows, for an immediate sanity check in the UI.
    pub preview: Vec<LogEntry>,
}

/// Cross-cutting dashboard summary over the current dataset.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub total_logs: usize,
    /// Visit count per program, sorted by program name.
    pub by_program: BTreeMap<String, u64>,
    /// Visit count per normalized hour-of-day.
    pub by_hour: BTreeMap<u32, u64>,
    /// The last ten log rows, newest first.
    pub recent_logs: Vec<LogEntry>,
}

/// Health/status payload: distinguishes "no upload yet" from a dataset that
/// is legitimately empty.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataStatus {
    pub data_loaded: bool,
    pub row_count: usize,
}

// ── Tests ─────────────────────────────────────────────────────────────────────
