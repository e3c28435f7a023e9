//! Error types for clip extraction.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for extraction operations.
pub type ExtractResult<T> = Result<T, ExtractError>;

/// Errors that can occur while extracting a clip. All of these are local to
/// one row of the batch and non-fatal to a pipeline run.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("ffmpeg not found in PATH")]
    FfmpegNotFound,

    #[error("source video not found: {0}")]
    SourceNotFound(PathBuf),

    #[error("ffmpeg command failed: {message}")]
    FfmpegFailed {
        message: String,
        stderr: Option<String>,
        exit_code: Option<i32>,
    },

    #[error("extraction timed out after {0} seconds")]
    Timeout(u64),

    #[error("extraction cancelled")]
    Cancelled,

    #[error("ffmpeg produced no output at {0}")]
    EmptyOutput(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ExtractError {
    /// Create an ffmpeg failure error.
    pub fn ffmpeg_failed(
        message: impl Into<String>,
        stderr: Option<String>,
        exit_code: Option<i32>,
    ) -> Self {
        Self::FfmpegFailed {
            message: message.into(),
            stderr,
            exit_code,
        }
    }
}
