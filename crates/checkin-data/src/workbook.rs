//! Workbook decoding for the check-in monitor.
//!
//! Turns uploaded `.xlsx` bytes (or a file on disk) into ordered sheets of
//! [`RawRecord`]s. The first row of each sheet is treated as the header row;
//! columns with blank headers and rows whose cells are all empty are
//! dropped. Cell contents are preserved loosely; normalization happens
//! downstream, not here.

use std::io::Cursor;
use std::path::Path;

use calamine::{Data, Reader, Xlsx};
use chrono::NaiveDateTime;
use tracing::debug;

use checkin_core::models::{CellValue, RawRecord};
use checkin_core::{CheckinError, Result};

// ── Decoded workbook ──────────────────────────────────────────────────────────

/// A decoded workbook: ordered sheets, each an ordered sequence of rows.
#[derive(Debug, Clone, Default)]
pub struct Workbook {
    pub sheets: Vec<Sheet>,
}

/// One decoded sheet.
#[derive(Debug, Clone)]
pub struct Sheet {
    pub name: String,
    pub rows: Vec<RawRecord>,
}

impl Workbook {
    pub fn first_sheet(&self) -> Option<&Sheet> {
        self.sheets.first()
    }

    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(|s| s.name.as_str()).collect()
    }
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Decode raw `.xlsx` bytes into a [`Workbook`].
pub fn decode_workbook(bytes: &[u8]) -> Result<Workbook> {
    let mut xlsx: Xlsx<_> = Xlsx::new(Cursor::new(bytes))
        .map_err(|e| CheckinError::WorkbookDecode(e.to_string()))?;
    decode_sheets(&mut xlsx)
}

/// Read and decode a workbook file from disk.
pub fn read_workbook_file(path: &Path) -> Result<Workbook> {
    let bytes = std::fs::read(path).map_err(|source| CheckinError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    decode_workbook(&bytes)
}

// ── Internal helpers ──────────────────────────────────────────────────────────

fn decode_sheets<R: std::io::Read + std::io::Seek>(xlsx: &mut Xlsx<R>) -> Result<Workbook> {
    let sheet_names: Vec<String> = xlsx.sheet_names().to_vec();
    let mut sheets = Vec::with_capacity(sheet_names.len());

    for name in sheet_names {
        let range = xlsx
            .worksheet_range(&name)
            .map_err(|e| CheckinError::SheetDecode {
                sheet: name.clone(),
                detail: e.to_string(),
            })?;

        let rows = rows_from_range(range.rows());
        debug!("decoded sheet \"{}\" with {} data rows", name, rows.len());
        sheets.push(Sheet { name, rows });
    }

    Ok(Workbook { sheets })
}

/// Build records from a sheet's cell rows: first row is the header row,
/// every following row becomes one [`RawRecord`].
fn rows_from_range<'a>(mut rows: impl Iterator<Item = &'a [Data]>) -> Vec<RawRecord> {
    let Some(header_row) = rows.next() else {
        return Vec::new();
    };

    let headers: Vec<String> = header_row.iter().map(header_text).collect();

    rows.filter_map(|row| {
        let record: RawRecord = headers
            .iter()
            .zip(row.iter())
            .filter(|(header, _)| !header.is_empty())
            .map(|(header, cell)| (header.clone(), cell_value(cell)))
            .collect();

        // Fully blank spreadsheet lines carry no data row.
        (!record.is_blank()).then_some(record)
    })
    .collect()
}

fn header_text(cell: &Data) -> String {
    match cell {
        Data::String(s) => s.trim().to_string(),
        Data::Empty => String::new(),
        other => cell_value(other).display(),
    }
}

/// Convert a calamine cell to the loose [`CellValue`] model.
///
/// Date-time cells keep their raw serial so the normalizer sees the same
/// representation the source export carries; ISO date-time cells become
/// structured dates.
fn cell_value(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::Empty,
        Data::String(s) if s.trim().is_empty() => CellValue::Empty,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Float(f) => CellValue::Number(*f),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(dt) => CellValue::Number(dt.as_f64()),
        Data::DateTimeIso(s) => parse_iso_datetime(s)
            .map(CellValue::Date)
            .unwrap_or_else(|| CellValue::Text(s.clone())),
        Data::DurationIso(s) => CellValue::Text(s.clone()),
        Data::Error(_) => CellValue::Empty,
    }
}

fn parse_iso_datetime(s: &str) -> Option<NaiveDateTime> {
    const FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S"];
    for fmt in FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }
    chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
