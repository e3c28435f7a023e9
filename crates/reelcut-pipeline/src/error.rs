//! Pipeline error types.
//!
//! Only conditions that make the whole run meaningless live here. Row
//! validation failures and extraction failures are captured in the
//! `RunReport` and never escalate past the row boundary.

use std::path::PathBuf;
use thiserror::Error;

pub type PipelineResult<T> = Result<T, PipelineError>;

/// Fatal pipeline errors. Any of these aborts the run with no manifest.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("highlight table '{path}' could not be read: {source}")]
    TableRead {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("source video not found: {0}")]
    SourceMissing(PathBuf),

    #[error("output directory '{path}' is not accessible: {source}")]
    OutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write manifest '{path}': {source}")]
    ManifestWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize manifest: {0}")]
    ManifestSerialize(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
