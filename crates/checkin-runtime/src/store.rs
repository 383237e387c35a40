//! The owned dataset store.
//!
//! One store instance is constructed at process start and injected into the
//! service; there is no hidden global slot. The contract is single-writer /
//! multi-reader: writers replace or append whole datasets, and every dataset
//! is handed out behind an `Arc`, so replacement is one reference swap and a
//! reader holding a snapshot can never observe a torn dataset.

use std::str::FromStr;
use std::sync::Arc;

use tracing::debug;

use checkin_core::models::UploadedDataset;
use checkin_core::CheckinError;

// ── StoreMode ─────────────────────────────────────────────────────────────────

/// How much upload history the store retains.
///
/// The exports corpus is inconsistent about this, so it is a configuration
/// choice rather than hard-wired behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StoreMode {
    /// Keep only the latest dataset; each ingestion replaces it.
    #[default]
    SingleSlot,
    /// Append every dataset; reads pick the most recent.
    History,
}

impl FromStr for StoreMode {
    type Err = CheckinError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "single" => Ok(StoreMode::SingleSlot),
            "history" => Ok(StoreMode::History),
            other => Err(CheckinError::Config(format!(
                "unknown store mode \"{}\" (expected \"single\" or \"history\")",
                other
            ))),
        }
    }
}

// ── DatasetStore ──────────────────────────────────────────────────────────────

/// Holds the ingested dataset(s) according to the configured [`StoreMode`].
#[derive(Debug, Default)]
pub struct DatasetStore {
    mode: StoreMode,
    datasets: Vec<Arc<UploadedDataset>>,
}

impl DatasetStore {
    pub fn new(mode: StoreMode) -> Self {
        Self {
            mode,
            datasets: Vec::new(),
        }
    }

    pub fn mode(&self) -> StoreMode {
        self.mode
    }

    /// Store a freshly ingested dataset and return its shared handle.
    ///
    /// In single-slot mode the previous dataset is dropped; readers that
    /// already hold its `Arc` keep a consistent snapshot.
    pub fn put(&mut self, dataset: UploadedDataset) -> Arc<UploadedDataset> {
        let dataset = Arc::new(dataset);
        if self.mode == StoreMode::SingleSlot {
            self.datasets.clear();
        }
        debug!(
            "stored dataset \"{}\" ({} rows), {} retained",
            dataset.filename,
            dataset.row_count(),
            self.datasets.len() + 1
        );
        self.datasets.push(Arc::clone(&dataset));
        dataset
    }

    /// The dataset reads should see: the only one (single-slot) or the most
    /// recently uploaded one (history). `None` before the first ingestion.
    pub fn current(&self) -> Option<Arc<UploadedDataset>> {
        self.datasets
            .iter()
            .max_by_key(|d| d.uploaded_at)
            .cloned()
    }

    /// Most recent dataset uploaded under the given filename (history mode's
    /// per-export lookup). Matches nothing before the first ingestion.
    pub fn current_named(&self, filename: &str) -> Option<Arc<UploadedDataset>> {
        self.datasets
            .iter()
            .filter(|d| d.filename == filename)
            .max_by_key(|d| d.uploaded_at)
            .cloned()
    }

    /// Number of retained datasets (1 at most in single-slot mode).
    pub fn len(&self) -> usize {
        self.datasets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.datasets.is_empty()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
