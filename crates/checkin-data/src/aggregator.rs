//! Visit aggregation over the current dataset: per-program monthly
//! histograms on the academic-year axis, and hour-of-day usage buckets.

use std::collections::{BTreeMap, HashMap};

use chrono::Datelike;

use checkin_core::buckets::{academic_month, hour_range_label};
use checkin_core::cells::{DateNormalizer, TimeNormalizer};
use checkin_core::columns::Column;
use checkin_core::models::{CellValue, ProgramMonthlyStat, RawRecord, TimeSlotStat};

/// Label for records whose `Program` column is missing or blank.
const UNKNOWN_PROGRAM: &str = "Unknown";

/// Name of the synthetic all-programs row, always emitted last.
const TOTAL_ROW: &str = "Total";

// ── VisitAggregator ───────────────────────────────────────────────────────────

/// Stateless folds over a record slice. Aggregation never fails: malformed
/// cells simply contribute less (a record with an unparseable date counts
/// toward its program total but lands in no month slot).
pub struct VisitAggregator;

impl VisitAggregator {
    /// Per-program monthly visit histograms plus the `"Total"` row.
    ///
    /// Program rows appear in first-seen order; `"Total"` holds the full
    /// record count and the elementwise sum of every program's months.
    pub fn program_monthly(rows: &[RawRecord]) -> Vec<ProgramMonthlyStat> {
        let mut order: Vec<String> = Vec::new();
        let mut stats: HashMap<String, ProgramMonthlyStat> = HashMap::new();

        for record in rows {
            let program = match record.field_display(Column::Program) {
                p if p.is_empty() => UNKNOWN_PROGRAM.to_string(),
                p => p,
            };

            let stat = stats.entry(program.clone()).or_insert_with(|| {
                order.push(program.clone());
                ProgramMonthlyStat::new(program)
            });
            stat.total += 1;

            let date = record
                .field(Column::Date)
                .and_then(DateNormalizer::normalize);
            if let Some(date) = date {
                stat.monthly_values[academic_month(date.month0())] += 1;
            }
        }

        let mut total = ProgramMonthlyStat::new(TOTAL_ROW);
        total.total = rows.len() as u64;
        for stat in stats.values() {
            for (slot, value) in total.monthly_values.iter_mut().zip(stat.monthly_values) {
                *slot += value;
            }
        }

        order
            .into_iter()
            .filter_map(|program| stats.remove(&program))
            .chain(std::iter::once(total))
            .collect()
    }

    /// Sparse hour-of-day visit buckets, ascending by hour.
    ///
    /// A `BTreeMap` keyed by the numeric hour keeps the order numeric, not
    /// lexical; `"10:00-11:00"` must sort after `"9:00-10:00"`.
    pub fn time_usage(rows: &[RawRecord]) -> Vec<TimeSlotStat> {
        let mut buckets: BTreeMap<u32, u64> = BTreeMap::new();

        for record in rows {
            let cell = record.field(Column::TimeIn).unwrap_or(&CellValue::Empty);
            if let Some(hour) = TimeNormalizer::normalize(cell).hour {
                *buckets.entry(hour).or_default() += 1;
            }
        }

        buckets
            .into_iter()
            .filter_map(|(hour, total)| {
                hour_range_label(hour).map(|time| TimeSlotStat { time, total })
            })
            .collect()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
