//! Ingestion: one decoded workbook becomes the current dataset.
//!
//! Only the first sheet carries log rows, matching how the library's
//! exports are produced. A workbook with no sheets at all is rejected and
//! leaves any previously stored dataset untouched (the caller only swaps
//! datasets on success).

use chrono::{DateTime, Utc};
use tracing::debug;

use checkin_core::models::UploadedDataset;
use checkin_core::{CheckinError, Result};

use crate::workbook::Workbook;

/// Build an [`UploadedDataset`] from a decoded workbook.
///
/// Fails with [`CheckinError::EmptyWorkbook`] when there are zero sheets.
pub fn build_dataset(
    filename: &str,
    workbook: Workbook,
    uploaded_at: DateTime<Utc>,
) -> Result<UploadedDataset> {
    let Some(sheet) = workbook.sheets.into_iter().next() else {
        return Err(CheckinError::EmptyWorkbook {
            filename: filename.to_string(),
        });
    };

    debug!(
        "ingesting \"{}\": sheet \"{}\" with {} rows",
        filename,
        sheet.name,
        sheet.rows.len()
    );

    Ok(UploadedDataset {
        filename: filename.to_string(),
        uploaded_at,
        rows: sheet.rows,
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
