//! Row formatting: one [`RawRecord`] in, one display-ready [`LogEntry`] out.

use checkin_core::cells::{DateNormalizer, TimeNormalizer};
use checkin_core::columns::Column;
use checkin_core::models::{CellValue, LogEntry, RawRecord};

/// Format a single row for display.
///
/// Every field degrades to `""` rather than failing: a row with an
/// unparseable date or time still appears in the log table.
pub fn format_row(record: &RawRecord) -> LogEntry {
    let date_cell = record.field(Column::Date).unwrap_or(&CellValue::Empty);
    let time_cell = record.field(Column::TimeIn).unwrap_or(&CellValue::Empty);

    LogEntry {
        id: record.field_display(Column::Id),
        name: record.field_display(Column::Name),
        program: record.field_display(Column::Program),
        date: DateNormalizer::format(DateNormalizer::normalize(date_cell)),
        check_in_time: TimeNormalizer::normalize(time_cell).display,
        year: record.field_display(Column::Year),
    }
}

/// Lazily format a full record sequence, order-preserving and 1:1. No
/// filtering happens at this stage.
pub fn format_rows(rows: &[RawRecord]) -> impl Iterator<Item = LogEntry> + '_ {
    rows.iter().map(format_row)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn record(pairs: &[(&str, CellValue)]) -> RawRecord {
        pairs
            .iter()
            .map(|(h, v)| (h.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_full_row_formats() {
        let r = record(&[
            ("ID", CellValue::Text("2023-00001".to_string())),
            ("Name", CellValue::Text("Ada Lovelace".to_string())),
            ("Program", CellValue::Text("CS".to_string())),
            ("Date", CellValue::Number(45536.0)),
            ("Time In", CellValue::Number(0.5)),
            ("Year", CellValue::Number(3.0)),
        ]);
        let entry = format_row(&r);
        assert_eq!(entry.id, "2023-00001");
        assert_eq!(entry.name, "Ada Lovelace");
        assert_eq!(entry.date, "2024-09-01");
        assert_eq!(entry.check_in_time, "12:00 PM");
        assert_eq!(entry.year, "3");
    }

    #[test]
    fn test_student_number_fallback_for_id() {
        let r = record(&[
            ("Student Number", CellValue::Text("2023-00042".to_string())),
            ("Name", CellValue::Text("Grace".to_string())),
        ]);
        assert_eq!(format_row(&r).id, "2023-00042");
    }

    #[test]
    fn test_unparseable_date_renders_empty_but_row_survives() {
        let r = record(&[
            ("Name", CellValue::Text("Grace".to_string())),
            ("Date", CellValue::Text("N/A".to_string())),
            ("Time In", CellValue::Text("whenever".to_string())),
        ]);
        let entry = format_row(&r);
        assert_eq!(entry.date, "");
        // Display still shows *something* for a non-empty unparseable time.
        assert_eq!(entry.check_in_time, "whenever");
    }

    #[test]
    fn test_missing_fields_are_empty_strings() {
        let entry = format_row(&RawRecord::new());
        assert_eq!(entry, LogEntry::default());
    }

    #[test]
    fn test_sequence_is_one_to_one_and_ordered() {
        let rows = vec![
            record(&[("Name", CellValue::Text("a".to_string()))]),
            record(&[("Name", CellValue::Text("b".to_string()))]),
            record(&[("Date", CellValue::Text("N/A".to_string()))]),
        ];
        let names: Vec<String> = format_rows(&rows).map(|e| e.name).collect();
        assert_eq!(names, vec!["a", "b", ""]);
    }
}
