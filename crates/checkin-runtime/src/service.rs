//! The dashboard service facade.
//!
//! Owns the dataset store and exposes every read the dashboard needs as
//! plain serde-serializable data: log tables, per-program monthly
//! analytics, time-of-day usage, the summary, and a status probe. Each read
//! is a pure synchronous fold over a snapshot of the current dataset.

use std::path::Path;
use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use checkin_core::models::{
    DashboardSummary, DataStatus, LogEntry, ProgramMonthlyStat, TimeSlotStat, UploadReceipt,
    UploadedDataset,
};
use checkin_core::{CheckinError, Result};
use checkin_data::aggregator::VisitAggregator;
use checkin_data::formatter::format_rows;
use checkin_data::ingest::build_dataset;
use checkin_data::summary::dashboard_summary;
use checkin_data::workbook::{decode_workbook, read_workbook_file, Workbook};

use crate::store::{DatasetStore, StoreMode};

/// How many formatted rows an upload receipt previews.
const PREVIEW_ROWS: usize = 5;

// ── DashboardService ──────────────────────────────────────────────────────────

/// Single entry point for the upload path and every dashboard read.
///
/// # Example
/// ```no_run
/// use checkin_runtime::{DashboardService, StoreMode};
///
/// let mut service = DashboardService::new(StoreMode::SingleSlot);
/// let bytes = std::fs::read("CurrentLogDatasheet.xlsx")?;
/// let receipt = service.upload("CurrentLogDatasheet.xlsx", &bytes)?;
/// println!("ingested {} rows", receipt.row_count);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct DashboardService {
    store: DatasetStore,
}

impl DashboardService {
    pub fn new(mode: StoreMode) -> Self {
        Self {
            store: DatasetStore::new(mode),
        }
    }

    pub fn store(&self) -> &DatasetStore {
        &self.store
    }

    // ── Upload path ───────────────────────────────────────────────────────

    /// Ingest raw workbook bytes under the given filename.
    ///
    /// On any failure the previously stored dataset is left untouched.
    pub fn upload(&mut self, filename: &str, bytes: &[u8]) -> Result<UploadReceipt> {
        let workbook = decode_workbook(bytes)?;
        self.upload_workbook(filename, workbook)
    }

    /// Ingest a workbook file from disk, using its file name as the dataset
    /// name.
    pub fn upload_file(&mut self, path: &Path) -> Result<UploadReceipt> {
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .ok_or_else(|| {
                CheckinError::Config(format!("not a workbook path: {}", path.display()))
            })?;
        let workbook = read_workbook_file(path)?;
        self.upload_workbook(&filename, workbook)
    }

    /// Ingest an already-decoded workbook.
    pub fn upload_workbook(&mut self, filename: &str, workbook: Workbook) -> Result<UploadReceipt> {
        let dataset = build_dataset(filename, workbook, Utc::now())?;
        let dataset = self.store.put(dataset);

        info!(
            "ingested \"{}\": {} rows",
            dataset.filename,
            dataset.row_count()
        );

        Ok(UploadReceipt {
            row_count: dataset.row_count(),
            preview: format_rows(&dataset.rows).take(PREVIEW_ROWS).collect(),
        })
    }

    // ── Dashboard reads ───────────────────────────────────────────────────

    /// The full formatted log table, in sheet order.
    pub fn logs(&self) -> Vec<LogEntry> {
        match self.snapshot() {
            Some(dataset) => format_rows(&dataset.rows).collect(),
            None => Vec::new(),
        }
    }

    /// Per-program monthly histograms, `"Total"` row last. Empty before the
    /// first ingestion.
    pub fn analytics(&self) -> Vec<ProgramMonthlyStat> {
        match self.snapshot() {
            Some(dataset) => VisitAggregator::program_monthly(&dataset.rows),
            None => Vec::new(),
        }
    }

    /// Hour-of-day usage buckets, ascending. Empty before the first
    /// ingestion.
    pub fn time_usage(&self) -> Vec<TimeSlotStat> {
        match self.snapshot() {
            Some(dataset) => VisitAggregator::time_usage(&dataset.rows),
            None => Vec::new(),
        }
    }

    /// The dashboard summary over the current dataset.
    pub fn summary(&self) -> DashboardSummary {
        match self.snapshot() {
            Some(dataset) => dashboard_summary(&dataset.rows),
            None => DashboardSummary::default(),
        }
    }

    /// Distinguishes "no upload yet" (`data_loaded: false`) from an
    /// ingested-but-empty dataset.
    pub fn status(&self) -> DataStatus {
        match self.snapshot() {
            Some(dataset) => DataStatus {
                data_loaded: true,
                row_count: dataset.row_count(),
            },
            None => DataStatus::default(),
        }
    }

    /// One consistent snapshot per read; aggregations never see a dataset
    /// change mid-fold.
    fn snapshot(&self) -> Option<Arc<UploadedDataset>> {
        self.store.current()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use rust_xlsxwriter::Workbook as WorkbookWriter;

    /// Author check-in workbook bytes with the given `(name, program, date,
    /// time)` rows.
    fn workbook_bytes(rows: &[(&str, &str, &str, &str)]) -> Vec<u8> {
        let mut writer = WorkbookWriter::new();
        let sheet = writer.add_worksheet();

        for (col, header) in ["ID", "Name", "Program", "Date", "Time In"]
            .iter()
            .enumerate()
        {
            sheet.write_string(0, col as u16, *header).unwrap();
        }

        for (i, (name, program, date, time)) in rows.iter().enumerate() {
            let row = (i + 1) as u32;
            sheet.write_string(row, 0, format!("2023-{:05}", i)).unwrap();
            sheet.write_string(row, 1, *name).unwrap();
            sheet.write_string(row, 2, *program).unwrap();
            sheet.write_string(row, 3, *date).unwrap();
            sheet.write_string(row, 4, *time).unwrap();
        }

        writer.save_to_buffer().expect("workbook bytes")
    }

    fn service_with_sample() -> DashboardService {
        let mut service = DashboardService::new(StoreMode::SingleSlot);
        let bytes = workbook_bytes(&[
            ("Ada", "CS", "2024-08-15", "09:15"),
            ("Grace", "CS", "2024-12-01", "09:50"),
            ("Edsger", "IT", "2024-08-20", "2:05 PM"),
            ("Alan", "CS", "N/A", "late"),
        ]);
        service.upload("logs.xlsx", &bytes).expect("upload");
        service
    }

    // ── Upload ────────────────────────────────────────────────────────────

    #[test]
    fn test_upload_receipt_counts_and_previews() {
        let mut service = DashboardService::new(StoreMode::SingleSlot);
        let bytes = workbook_bytes(&[
            ("Ada", "CS", "2024-08-15", "09:15"),
            ("Grace", "IT", "2024-08-16", "10:15"),
        ]);
        let receipt = service.upload("logs.xlsx", &bytes).expect("upload");

        assert_eq!(receipt.row_count, 2);
        assert_eq!(receipt.preview.len(), 2);
        assert_eq!(receipt.preview[0].name, "Ada");
        assert_eq!(receipt.preview[0].check_in_time, "9:15 AM");
    }

    #[test]
    fn test_preview_caps_at_five_rows() {
        let mut service = DashboardService::new(StoreMode::SingleSlot);
        let rows: Vec<(String, &str, &str, &str)> = (0..8)
            .map(|i| (format!("s{}", i), "CS", "2024-08-15", "09:15"))
            .collect();
        let borrowed: Vec<(&str, &str, &str, &str)> = rows
            .iter()
            .map(|(n, p, d, t)| (n.as_str(), *p, *d, *t))
            .collect();
        let receipt = service
            .upload("logs.xlsx", &workbook_bytes(&borrowed))
            .expect("upload");

        assert_eq!(receipt.row_count, 8);
        assert_eq!(receipt.preview.len(), 5);
    }

    #[test]
    fn test_failed_upload_keeps_previous_dataset() {
        let mut service = service_with_sample();
        let err = service.upload("broken.xlsx", b"not a workbook").unwrap_err();
        assert!(matches!(err, CheckinError::WorkbookDecode(_)));

        // The earlier dataset still serves reads.
        assert_eq!(service.status().row_count, 4);
        assert_eq!(service.snapshot().expect("dataset").filename, "logs.xlsx");
    }

    // ── Reads ─────────────────────────────────────────────────────────────

    #[test]
    fn test_reads_before_first_upload_are_empty() {
        let service = DashboardService::new(StoreMode::SingleSlot);
        assert!(service.logs().is_empty());
        assert!(service.analytics().is_empty());
        assert!(service.time_usage().is_empty());
        assert_eq!(service.summary().total_logs, 0);

        let status = service.status();
        assert!(!status.data_loaded);
        assert_eq!(status.row_count, 0);
    }

    #[test]
    fn test_logs_format_every_row_in_order() {
        let service = service_with_sample();
        let logs = service.logs();

        assert_eq!(logs.len(), 4);
        assert_eq!(logs[0].date, "2024-08-15");
        assert_eq!(logs[1].check_in_time, "9:50 AM");
        // The malformed row survives with empty date and raw time text.
        assert_eq!(logs[3].date, "");
        assert_eq!(logs[3].check_in_time, "late");
    }

    #[test]
    fn test_analytics_totals_and_months() {
        let service = service_with_sample();
        let stats = service.analytics();

        assert_eq!(stats.len(), 3); // CS, IT, Total
        let cs = &stats[0];
        assert_eq!(cs.program, "CS");
        assert_eq!(cs.total, 3);
        assert_eq!(cs.monthly_values[0], 1); // August
        assert_eq!(cs.monthly_values[4], 1); // December

        let total = stats.last().expect("total");
        assert_eq!(total.program, "Total");
        assert_eq!(total.total, 4);
    }

    #[test]
    fn test_time_usage_ascending_sparse() {
        let service = service_with_sample();
        let slots = service.time_usage();
        let labels: Vec<&str> = slots
            .iter()
            .map(|s| s.time.as_str())
            .collect();
        assert_eq!(labels, vec!["9:00-10:00", "14:00-15:00"]);
    }

    #[test]
    fn test_ingested_empty_dataset_differs_from_first_run() {
        let mut service = DashboardService::new(StoreMode::SingleSlot);
        service
            .upload("logs.xlsx", &workbook_bytes(&[]))
            .expect("upload");

        let status = service.status();
        assert!(status.data_loaded);
        assert_eq!(status.row_count, 0);
    }

    // ── Store modes ───────────────────────────────────────────────────────

    #[test]
    fn test_single_slot_serves_the_replacement() {
        let mut service = service_with_sample();
        let bytes = workbook_bytes(&[("Barbara", "IT", "2025-01-10", "10:00")]);
        service.upload("newer.xlsx", &bytes).expect("upload");

        assert_eq!(service.store().len(), 1);
        assert_eq!(service.logs().len(), 1);
        assert_eq!(service.logs()[0].name, "Barbara");
    }

    #[test]
    fn test_history_mode_serves_newest_and_keeps_all() {
        let mut service = DashboardService::new(StoreMode::History);
        service
            .upload(
                "logs.xlsx",
                &workbook_bytes(&[("Ada", "CS", "2024-08-15", "09:15")]),
            )
            .expect("upload");
        service
            .upload(
                "logs.xlsx",
                &workbook_bytes(&[
                    ("Ada", "CS", "2024-08-15", "09:15"),
                    ("Grace", "IT", "2024-08-16", "10:15"),
                ]),
            )
            .expect("upload");

        assert_eq!(service.store().len(), 2);
        assert_eq!(service.logs().len(), 2);
        assert!(service.store().current_named("logs.xlsx").is_some());
    }
}
