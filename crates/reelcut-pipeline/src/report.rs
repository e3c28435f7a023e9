//! Run report: the per-run summary of successes and itemized failures.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use reelcut_models::RowError;

/// A row that failed validation and was skipped entirely.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowRejection {
    /// 1-based data row number in the input table.
    pub row_index: usize,
    pub error: RowError,
}

/// A validated row whose clip extraction failed.
#[derive(Debug, Clone, Serialize)]
pub struct ExtractFailure {
    pub clip_id: String,
    pub error: String,
}

/// Summary of one pipeline run. Always produced unless the run hit a fatal
/// error, in which case no manifest exists either.
#[derive(Debug, Serialize)]
pub struct RunReport {
    /// Correlates log lines across the run.
    pub run_id: Uuid,
    pub game_title: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    /// Rows in the input table.
    pub total_rows: usize,
    /// Rows that passed validation.
    pub validated: usize,
    /// Rows whose clip was extracted successfully.
    pub extracted: usize,
    pub extraction_failures: Vec<ExtractFailure>,
    pub rejections: Vec<RowRejection>,
    /// Entries written to the manifest.
    pub manifest_entries: usize,
    pub manifest_path: PathBuf,
}

impl RunReport {
    /// True when every row validated and every extraction succeeded.
    pub fn is_clean(&self) -> bool {
        self.rejections.is_empty() && self.extraction_failures.is_empty()
    }

    /// Log a human-readable summary.
    pub fn log_summary(&self) {
        info!(
            run_id = %self.run_id,
            total_rows = self.total_rows,
            validated = self.validated,
            extracted = self.extracted,
            failed = self.extraction_failures.len(),
            rejected = self.rejections.len(),
            manifest_entries = self.manifest_entries,
            manifest = %self.manifest_path.display(),
            "Run complete"
        );

        for rejection in &self.rejections {
            warn!(
                run_id = %self.run_id,
                row_index = rejection.row_index,
                "Row rejected: {}",
                rejection.error
            );
        }
        for failure in &self.extraction_failures {
            warn!(
                run_id = %self.run_id,
                clip_id = %failure.clip_id,
                "Extraction failed: {}",
                failure.error
            );
        }
    }
}
