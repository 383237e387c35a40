//! Bucketing math shared by the aggregators and the presentation layer:
//! academic-year month remapping, hour-of-day range labels, and the static
//! day-period lookup.

use serde::{Deserialize, Serialize};

// ── Academic months ───────────────────────────────────────────────────────────

/// Month labels on the academic-year axis, August first.
pub const ACADEMIC_MONTH_LABELS: [&str; 12] = [
    "Aug", "Sep", "Oct", "Nov", "Dec", "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul",
];

/// Remap a 0-indexed calendar month (January = 0) onto the academic-year
/// axis: August = 0 through July = 11.
pub fn academic_month(month0: u32) -> usize {
    let m = month0 as usize % 12;
    if m >= 7 {
        m - 7
    } else {
        m + 5
    }
}

// ── Hour ranges ───────────────────────────────────────────────────────────────

/// Range label for one hour bucket: `"H:00-H+1:00"`, no leading zero.
///
/// The exact format is a stability contract: downstream grouping matches
/// these labels as strings. Hours outside `0..=23` have no bucket.
pub fn hour_range_label(hour: u32) -> Option<String> {
    (hour <= 23).then(|| format!("{}:00-{}:00", hour, hour + 1))
}

// ── Day periods ───────────────────────────────────────────────────────────────

/// Coarse named periods the dashboard groups hour buckets into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DayPeriod {
    Morning,
    Midday,
    Afternoon,
    Evening,
}

impl std::fmt::Display for DayPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            DayPeriod::Morning => "Morning",
            DayPeriod::Midday => "Midday",
            DayPeriod::Afternoon => "Afternoon",
            DayPeriod::Evening => "Evening",
        };
        f.write_str(s)
    }
}

/// Hour-range labels per named period. Labels outside the table (early
/// morning, late night) belong to no period.
pub const DAY_PERIOD_TABLE: &[(DayPeriod, &[&str])] = &[
    (
        DayPeriod::Morning,
        &["7:00-8:00", "8:00-9:00", "9:00-10:00", "10:00-11:00"],
    ),
    (
        DayPeriod::Midday,
        &["11:00-12:00", "12:00-13:00", "13:00-14:00"],
    ),
    (
        DayPeriod::Afternoon,
        &["14:00-15:00", "15:00-16:00", "16:00-17:00", "17:00-18:00"],
    ),
    (
        DayPeriod::Evening,
        &["18:00-19:00", "19:00-20:00", "20:00-21:00", "21:00-22:00"],
    ),
];

/// Look up the named period a range label belongs to.
pub fn period_for_label(label: &str) -> Option<DayPeriod> {
    DAY_PERIOD_TABLE
        .iter()
        .find(|(_, labels)| labels.contains(&label))
        .map(|(period, _)| *period)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
