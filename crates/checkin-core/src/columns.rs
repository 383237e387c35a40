//! Declarative column-alias table for check-in spreadsheets.
//!
//! Exports are human-maintained and header spellings drift between academic
//! years, so the known columns are matched by a data table rather than by
//! string comparisons scattered through the code. Adding an accepted
//! spelling is a one-line change here.

use crate::models::{CellValue, RawRecord};

// ── Column ────────────────────────────────────────────────────────────────────

/// The canonical columns the pipeline cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    /// Student identifier.
    Id,
    Name,
    Program,
    /// Visit date.
    Date,
    /// Check-in time of day.
    TimeIn,
    /// Year level.
    Year,
}

/// Accepted header spellings per canonical column, in priority order.
/// Matching is ASCII case-insensitive.
pub const COLUMN_ALIASES: &[(Column, &[&str])] = &[
    (Column::Id, &["ID", "Student Number"]),
    (Column::Name, &["Name"]),
    (Column::Program, &["Program"]),
    (Column::Date, &["Date"]),
    (Column::TimeIn, &["Time In"]),
    (Column::Year, &["Year"]),
];

impl Column {
    /// The accepted header spellings for this column, in priority order.
    pub fn aliases(self) -> &'static [&'static str] {
        COLUMN_ALIASES
            .iter()
            .find(|(c, _)| *c == self)
            .map(|(_, names)| *names)
            .unwrap_or(&[])
    }
}

// ── Record access ─────────────────────────────────────────────────────────────

impl RawRecord {
    /// Resolve a canonical column against this row: the first alias whose
    /// cell exists and is non-empty wins (so a blank `ID` cell falls through
    /// to `Student Number`).
    pub fn field(&self, column: Column) -> Option<&CellValue> {
        column
            .aliases()
            .iter()
            .filter_map(|header| self.get(header))
            .find(|cell| !cell.is_empty())
    }

    /// Display form of a column, `""` when missing or empty.
    pub fn field_display(&self, column: Column) -> String {
        self.field(column).map(CellValue::display).unwrap_or_default()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
