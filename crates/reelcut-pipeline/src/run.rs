//! Pipeline orchestration.
//!
//! State machine per row: parse -> validated | rejected; validated rows are
//! extracted (possibly in parallel) and recorded. One row's failure never
//! aborts the rest; only a missing source, an unusable output directory, an
//! unreadable table, or a manifest write failure is fatal.

use std::sync::Arc;

use chrono::Utc;
use futures::future::join_all;
use tokio::sync::Semaphore;
use tracing::{debug, info};
use uuid::Uuid;

use reelcut_media::{ExtractError, Extractor};
use reelcut_models::{parse_row, HighlightRow, ManifestBuilder, ManifestEntry};

use crate::config::PipelineConfig;
use crate::error::{PipelineError, PipelineResult};
use crate::report::{ExtractFailure, RowRejection, RunReport};
use crate::table::load_table;

/// Manifest filename inside the output directory.
pub const MANIFEST_FILENAME: &str = "manifest.json";

/// Execute one pipeline run: load the table, cut a clip per validated row,
/// write the manifest, and return the report.
pub async fn run<E>(config: &PipelineConfig, extractor: &E) -> PipelineResult<RunReport>
where
    E: Extractor + ?Sized,
{
    let run_id = Uuid::new_v4();
    let started_at = Utc::now();

    info!(
        run_id = %run_id,
        table = %config.table.display(),
        source = %config.source.display(),
        output_dir = %config.output_dir.display(),
        max_parallel = config.max_parallel,
        "Starting highlight run"
    );

    if tokio::fs::metadata(&config.source).await.is_err() {
        return Err(PipelineError::SourceMissing(config.source.clone()));
    }

    tokio::fs::create_dir_all(&config.output_dir)
        .await
        .map_err(|source| PipelineError::OutputDir {
            path: config.output_dir.clone(),
            source,
        })?;

    let raw_rows = load_table(&config.table)?;
    let total_rows = raw_rows.len();

    // Validate every row first, in table order.
    let mut validated: Vec<HighlightRow> = Vec::new();
    let mut rejections: Vec<RowRejection> = Vec::new();
    for raw in &raw_rows {
        match parse_row(&raw.columns) {
            Ok(row) => {
                debug!(run_id = %run_id, row_index = raw.index, clip_id = %row.clip_id, "Row validated");
                validated.push(row);
            }
            Err(error) => {
                rejections.push(RowRejection {
                    row_index: raw.index,
                    error,
                });
            }
        }
    }

    // Extract, bounded by the concurrency limit. Each row owns its own
    // output path so concurrent extractions never contend on a file.
    // join_all preserves input order, which keeps manifest assembly
    // deterministic regardless of completion order.
    let semaphore = Arc::new(Semaphore::new(config.max_parallel.max(1)));
    let outcomes = join_all(validated.iter().map(|row| {
        let semaphore = Arc::clone(&semaphore);
        async move {
            let _permit = match semaphore.acquire().await {
                Ok(permit) => permit,
                Err(_) => return Err(ExtractError::Cancelled),
            };
            extractor
                .extract(&config.source, row, &config.output_dir)
                .await
        }
    }))
    .await;

    let mut extracted = 0usize;
    let mut extraction_failures: Vec<ExtractFailure> = Vec::new();
    let mut builder = ManifestBuilder::new();

    for (row, outcome) in validated.iter().zip(&outcomes) {
        match outcome {
            Ok(path) => {
                extracted += 1;
                debug!(run_id = %run_id, clip_id = %row.clip_id, path = %path.display(), "Clip recorded");
                builder.add(ManifestEntry::from(row));
            }
            Err(error) => {
                extraction_failures.push(ExtractFailure {
                    clip_id: row.clip_id.clone(),
                    error: error.to_string(),
                });
                if config.emit_on_extract_failure() {
                    builder.add(ManifestEntry::from(row));
                }
            }
        }
    }

    let manifest_entries = builder.len();
    let manifest = builder.build(config.game_title.clone());
    let manifest_path = config.output_dir.join(MANIFEST_FILENAME);
    let bytes = manifest.to_json()?;
    tokio::fs::write(&manifest_path, bytes)
        .await
        .map_err(|source| PipelineError::ManifestWrite {
            path: manifest_path.clone(),
            source,
        })?;

    let report = RunReport {
        run_id,
        game_title: config.game_title.clone(),
        started_at,
        finished_at: Utc::now(),
        total_rows,
        validated: validated.len(),
        extracted,
        extraction_failures,
        rejections,
        manifest_entries,
        manifest_path,
    };
    report.log_summary();

    Ok(report)
}
