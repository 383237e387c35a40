//! Cross-cutting dashboard summary: totals, per-program and per-hour
//! counts, and the most recent log rows.

use std::collections::BTreeMap;

use checkin_core::cells::TimeNormalizer;
use checkin_core::columns::Column;
use checkin_core::models::{CellValue, DashboardSummary, RawRecord};

use crate::formatter::format_row;

/// How many of the newest rows the summary carries.
const RECENT_LOG_COUNT: usize = 10;

/// Fold the full record set into a [`DashboardSummary`].
///
/// Hour counts use the same normalization as the time-usage buckets, so the
/// two views never disagree. An empty slice yields an all-empty summary.
pub fn dashboard_summary(rows: &[RawRecord]) -> DashboardSummary {
    let mut by_program: BTreeMap<String, u64> = BTreeMap::new();
    let mut by_hour: BTreeMap<u32, u64> = BTreeMap::new();

    for record in rows {
        let program = record.field_display(Column::Program);
        if !program.is_empty() {
            *by_program.entry(program).or_default() += 1;
        }

        let cell = record.field(Column::TimeIn).unwrap_or(&CellValue::Empty);
        if let Some(hour) = TimeNormalizer::normalize(cell).hour {
            *by_hour.entry(hour).or_default() += 1;
        }
    }

    // Newest rows sit at the bottom of the sheet; show them first.
    let recent_logs = rows
        .iter()
        .rev()
        .take(RECENT_LOG_COUNT)
        .map(format_row)
        .collect();

    DashboardSummary {
        total_logs: rows.len(),
        by_program,
        by_hour,
        recent_logs,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
