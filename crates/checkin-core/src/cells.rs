//! Cell normalization: mixed spreadsheet representations → canonical values.
//!
//! Check-in exports arrive with dates as 1900-epoch serials, ISO-ish strings
//! or structured date cells, and times as fractional-day serials, 24-hour
//! strings or preformatted 12-hour strings. The normalizers here resolve all
//! of those into a canonical calendar date and a `(display, hour)` pair.
//! A value that matches no rule is a miss, never an error.

use chrono::{NaiveDate, NaiveDateTime, Timelike};
use regex::Regex;
use tracing::debug;

use crate::models::CellValue;

/// Serial value of 1970-01-01 under the 1900-epoch spreadsheet convention
/// (includes the 2-day leap-year correction).
const UNIX_EPOCH_SERIAL: f64 = 25569.0;

// ── DateNormalizer ────────────────────────────────────────────────────────────

/// Resolves a raw cell into a calendar date.
pub struct DateNormalizer;

impl DateNormalizer {
    /// Normalize a cell to a calendar date, trying in priority order:
    ///
    /// 1. Numeric spreadsheet serial (1900 epoch, 25569-offset rule).
    /// 2. A structured date cell, used directly.
    /// 3. Generic string parsing over common date formats.
    ///
    /// Anything else, and any parse failure, is `None`.
    pub fn normalize(value: &CellValue) -> Option<NaiveDate> {
        match value {
            CellValue::Number(serial) => Self::from_serial(*serial),
            CellValue::Date(dt) => Some(dt.date()),
            CellValue::Text(s) => Self::parse_str(s),
            _ => None,
        }
    }

    /// Render a normalized date as zero-padded `YYYY-MM-DD`, or `""` for a
    /// miss. Display output must always be a string, never an error.
    pub fn format(date: Option<NaiveDate>) -> String {
        date.map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_default()
    }

    /// Convert a 1900-epoch date serial to a calendar date at UTC midnight.
    ///
    /// Serial 25569 corresponds to 1970-01-01.
    fn from_serial(serial: f64) -> Option<NaiveDate> {
        if !serial.is_finite() {
            return None;
        }
        let days = (serial - UNIX_EPOCH_SERIAL).floor() as i64;
        let offset = chrono::Duration::try_days(days)?;
        NaiveDate::from_ymd_opt(1970, 1, 1)?.checked_add_signed(offset)
    }

    fn parse_str(s: &str) -> Option<NaiveDate> {
        let s = s.trim();
        if s.is_empty() {
            return None;
        }

        // RFC 3339 / ISO 8601 with offset.
        if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(s) {
            return Some(dt.date_naive());
        }

        // Date-time patterns first, then date-only patterns.
        const DATETIME_FORMATS: &[&str] = &[
            "%Y-%m-%dT%H:%M:%S%.f",
            "%Y-%m-%dT%H:%M:%S",
            "%Y-%m-%d %H:%M:%S",
        ];
        for fmt in DATETIME_FORMATS {
            if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
                return Some(dt.date());
            }
        }

        const DATE_FORMATS: &[&str] = &[
            "%Y-%m-%d",
            "%Y/%m/%d",
            "%m/%d/%Y",
            "%d/%m/%Y",
            "%B %d, %Y",
        ];
        for fmt in DATE_FORMATS {
            if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
                return Some(date);
            }
        }

        debug!("DateNormalizer: could not parse date string \"{}\"", s);
        None
    }
}

// ── NormalizedTime ────────────────────────────────────────────────────────────

/// The two faces of a normalized time-of-day cell.
///
/// `display` always carries *something* when the original cell was non-empty
/// (falling back to the raw text for unparseable values); `hour` is only
/// `Some` when the value resolved to a bucketable hour in `0..=23`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NormalizedTime {
    pub display: String,
    pub hour: Option<u32>,
}

// ── TimeNormalizer ────────────────────────────────────────────────────────────

/// Resolves a raw cell into a 12-hour display string and an hour-of-day.
pub struct TimeNormalizer;

impl TimeNormalizer {
    /// Normalize a time cell, trying in priority order:
    ///
    /// 1. Numeric fractional-day serial: bucket hour is `floor(v * 24)`,
    ///    display comes from the serial rounded to whole minutes.
    /// 2. A string already carrying `AM`/`PM`: display passes through
    ///    unchanged; the hour is read from the leading `H:MM` plus period.
    /// 3. A 24-hour `H:MM` string: hour taken literally, display converted
    ///    to 12-hour form.
    /// 4. Anything else keeps its raw string form for display with no hour.
    ///
    /// Numeric `0` is midnight, not a missing value. A resolved hour outside
    /// `0..=23` is excluded from bucketing but still produces a display.
    pub fn normalize(value: &CellValue) -> NormalizedTime {
        match value {
            CellValue::Empty => NormalizedTime::default(),
            CellValue::Number(v) => Self::from_serial(*v),
            CellValue::Date(dt) => NormalizedTime {
                display: twelve_hour_display(dt.hour(), dt.minute()),
                hour: Some(dt.hour()),
            },
            CellValue::Text(s) => Self::from_str(s),
            other => NormalizedTime {
                display: other.display(),
                hour: None,
            },
        }
    }

    /// Fractional-day serial → display + bucket hour.
    fn from_serial(v: f64) -> NormalizedTime {
        if !v.is_finite() || v < 0.0 {
            return NormalizedTime {
                display: CellValue::Number(v).display(),
                hour: None,
            };
        }

        let bucket = (v * 24.0).floor();
        let hour = if (0.0..=23.0).contains(&bucket) {
            Some(bucket as u32)
        } else {
            debug!("TimeNormalizer: serial {} is outside the day range", v);
            None
        };

        // Display derives from the serial rounded to whole minutes, so
        // 0.499999 still shows as 12:00 PM.
        let total_minutes = (v * 24.0 * 60.0).round() as u64;
        let hours = (total_minutes / 60) as u32;
        let minutes = (total_minutes % 60) as u32;

        NormalizedTime {
            display: twelve_hour_display(hours, minutes),
            hour,
        }
    }

    fn from_str(s: &str) -> NormalizedTime {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return NormalizedTime::default();
        }

        // Rule 2: already formatted with an AM/PM marker.
        if trimmed.to_ascii_uppercase().contains("AM")
            || trimmed.to_ascii_uppercase().contains("PM")
        {
            return NormalizedTime {
                display: s.to_string(),
                hour: Self::hour_from_twelve_hour(trimmed),
            };
        }

        // Rule 3: bare 24-hour H:MM.
        let re = Regex::new(r"^(\d{1,2}):(\d{2})").expect("regex is valid");
        if let Some(caps) = re.captures(trimmed) {
            let hour: u32 = caps[1].parse().unwrap_or(0);
            let minute: u32 = caps[2].parse().unwrap_or(0);
            if hour <= 23 {
                return NormalizedTime {
                    display: twelve_hour_display(hour, minute),
                    hour: Some(hour),
                };
            }
            debug!("TimeNormalizer: hour {} out of range in \"{}\"", hour, s);
            return NormalizedTime {
                display: s.to_string(),
                hour: None,
            };
        }

        // Rule 4: unparseable, keep the raw text for display.
        debug!("TimeNormalizer: could not parse time string \"{}\"", s);
        NormalizedTime {
            display: s.to_string(),
            hour: None,
        }
    }

    /// Extract the hour-of-day from a `H:MM AM/PM` string.
    ///
    /// PM adds 12 unless the hour is already 12; 12 AM maps to 0. A result
    /// outside `0..=23` is a miss.
    fn hour_from_twelve_hour(s: &str) -> Option<u32> {
        let re = Regex::new(r"(?i)^(\d{1,2}):(\d{2})\s*(AM|PM)").expect("regex is valid");
        let caps = re.captures(s)?;
        let mut hour: u32 = caps[1].parse().ok()?;
        let period = caps[3].to_ascii_uppercase();

        if period == "PM" && hour != 12 {
            hour += 12;
        }
        if period == "AM" && hour == 12 {
            hour = 0;
        }

        (hour <= 23).then_some(hour)
    }
}

// ── 12-hour rendering ─────────────────────────────────────────────────────────

/// Render an hour/minute pair as `H:MM AM/PM`.
///
/// Noon and midnight render as 12, never 0.
fn twelve_hour_display(hours: u32, minutes: u32) -> String {
    let period = if hours >= 12 { "PM" } else { "AM" };
    let display_hours = if hours > 12 {
        hours - 12
    } else if hours == 0 {
        12
    } else {
        hours
    };
    format!("{}:{:02} {}", display_hours, minutes, period)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    // ── Date serials ──────────────────────────────────────────────────────────

    #[test]
    fn test_serial_epoch_anchor() {
        assert_eq!(
            DateNormalizer::normalize(&CellValue::Number(25569.0)),
            Some(date(1970, 1, 1))
        );
    }

    #[test]
    fn test_serial_round_trips_against_reference_dates() {
        // Reference conversions per the 25569-offset rule.
        let cases = [
            (45200.0, date(2023, 10, 1)),
            (45536.0, date(2024, 9, 1)),
            (44927.0, date(2023, 1, 1)),
            (25570.0, date(1970, 1, 2)),
        ];
        for (serial, expected) in cases {
            assert_eq!(
                DateNormalizer::normalize(&CellValue::Number(serial)),
                Some(expected),
                "serial {}",
                serial
            );
        }
    }

    #[test]
    fn test_serial_fractional_part_is_floored() {
        // A date-time serial keeps its calendar day.
        assert_eq!(
            DateNormalizer::normalize(&CellValue::Number(45200.75)),
            Some(date(2023, 10, 1))
        );
    }

    #[test]
    fn test_serial_non_finite_is_a_miss() {
        assert_eq!(DateNormalizer::normalize(&CellValue::Number(f64::NAN)), None);
        assert_eq!(
            DateNormalizer::normalize(&CellValue::Number(f64::INFINITY)),
            None
        );
    }

    // ── Date strings and structured dates ─────────────────────────────────────

    #[test]
    fn test_structured_date_used_directly() {
        let dt = date(2024, 8, 15).and_hms_opt(9, 30, 0).expect("valid time");
        assert_eq!(
            DateNormalizer::normalize(&CellValue::Date(dt)),
            Some(date(2024, 8, 15))
        );
    }

    #[test]
    fn test_date_string_formats() {
        for s in ["2024-08-15", "2024/08/15", "08/15/2024", "August 15, 2024"] {
            assert_eq!(
                DateNormalizer::normalize(&CellValue::Text(s.to_string())),
                Some(date(2024, 8, 15)),
                "input {:?}",
                s
            );
        }
    }

    #[test]
    fn test_unparseable_date_is_a_miss_not_an_error() {
        assert_eq!(
            DateNormalizer::normalize(&CellValue::Text("N/A".to_string())),
            None
        );
        assert_eq!(DateNormalizer::normalize(&CellValue::Empty), None);
        assert_eq!(DateNormalizer::format(None), "");
    }

    #[test]
    fn test_format_zero_pads() {
        assert_eq!(DateNormalizer::format(Some(date(2024, 1, 5))), "2024-01-05");
    }

    // ── Time serials ──────────────────────────────────────────────────────────

    #[test]
    fn test_noon_serial() {
        let t = TimeNormalizer::normalize(&CellValue::Number(0.5));
        assert_eq!(t.display, "12:00 PM");
        assert_eq!(t.hour, Some(12));
    }

    #[test]
    fn test_midnight_serial_is_valid_not_missing() {
        let t = TimeNormalizer::normalize(&CellValue::Number(0.0));
        assert_eq!(t.display, "12:00 AM");
        assert_eq!(t.hour, Some(0));
    }

    #[test]
    fn test_morning_serial() {
        // 0.38541666.. = 9:15
        let t = TimeNormalizer::normalize(&CellValue::Number(9.25 / 24.0));
        assert_eq!(t.display, "9:15 AM");
        assert_eq!(t.hour, Some(9));
    }

    #[test]
    fn test_serial_just_below_noon_buckets_at_eleven() {
        let t = TimeNormalizer::normalize(&CellValue::Number(0.4999));
        assert_eq!(t.hour, Some(11));
        // Display rounds to whole minutes.
        assert_eq!(t.display, "12:00 PM");
    }

    #[test]
    fn test_serial_out_of_day_range_is_excluded_from_bucketing() {
        let t = TimeNormalizer::normalize(&CellValue::Number(2.0));
        assert_eq!(t.hour, None);
        let t = TimeNormalizer::normalize(&CellValue::Number(-0.25));
        assert_eq!(t.hour, None);
    }

    // ── Time strings ──────────────────────────────────────────────────────────

    #[test]
    fn test_twenty_four_hour_string() {
        let t = TimeNormalizer::normalize(&CellValue::Text("14:35".to_string()));
        assert_eq!(t.display, "2:35 PM");
        assert_eq!(t.hour, Some(14));
    }

    #[test]
    fn test_twenty_four_hour_midnight_and_noon() {
        let t = TimeNormalizer::normalize(&CellValue::Text("0:05".to_string()));
        assert_eq!(t.display, "12:05 AM");
        assert_eq!(t.hour, Some(0));

        let t = TimeNormalizer::normalize(&CellValue::Text("12:00".to_string()));
        assert_eq!(t.display, "12:00 PM");
        assert_eq!(t.hour, Some(12));
    }

    #[test]
    fn test_preformatted_twelve_hour_string_passes_through() {
        let t = TimeNormalizer::normalize(&CellValue::Text("2:35 PM".to_string()));
        assert_eq!(t.display, "2:35 PM");
        assert_eq!(t.hour, Some(14));

        let t = TimeNormalizer::normalize(&CellValue::Text("9:42 am".to_string()));
        assert_eq!(t.display, "9:42 am");
        assert_eq!(t.hour, Some(9));
    }

    #[test]
    fn test_twelve_noon_and_midnight_markers() {
        let t = TimeNormalizer::normalize(&CellValue::Text("12:00 PM".to_string()));
        assert_eq!(t.hour, Some(12));
        let t = TimeNormalizer::normalize(&CellValue::Text("12:00 AM".to_string()));
        assert_eq!(t.hour, Some(0));
    }

    #[test]
    fn test_out_of_range_24h_hour_keeps_raw_display() {
        let t = TimeNormalizer::normalize(&CellValue::Text("25:10".to_string()));
        assert_eq!(t.display, "25:10");
        assert_eq!(t.hour, None);
    }

    #[test]
    fn test_unparseable_time_falls_back_to_raw_display() {
        let t = TimeNormalizer::normalize(&CellValue::Text("morning".to_string()));
        assert_eq!(t.display, "morning");
        assert_eq!(t.hour, None);
    }

    #[test]
    fn test_empty_time_is_fully_empty() {
        let t = TimeNormalizer::normalize(&CellValue::Empty);
        assert_eq!(t.display, "");
        assert_eq!(t.hour, None);
    }

    #[test]
    fn test_structured_datetime_contributes_its_hour() {
        let dt = NaiveDate::from_ymd_opt(2024, 8, 15)
            .unwrap()
            .and_hms_opt(16, 16, 0)
            .unwrap();
        let t = TimeNormalizer::normalize(&CellValue::Date(dt));
        assert_eq!(t.display, "4:16 PM");
        assert_eq!(t.hour, Some(16));
    }
}
