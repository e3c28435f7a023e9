//! Clip extraction for validated highlight rows.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::watch;
use tracing::{debug, info};

use reelcut_models::HighlightRow;

use crate::command::{FfmpegCommand, FfmpegRunner};
use crate::error::{ExtractError, ExtractResult};

/// Output path contract: `{output_dir}/{clip_id}_clip.mp4`, computed up
/// front and handed to ffmpeg. There is no post-hoc directory scan to find
/// what the tool produced.
pub fn clip_output_path(output_dir: &Path, clip_id: &str) -> PathBuf {
    output_dir.join(format!("{clip_id}_clip.mp4"))
}

/// Something that can turn one highlight row into a clip file on disk.
///
/// The pipeline is written against this seam so its tests do not need an
/// ffmpeg binary on PATH.
#[async_trait]
pub trait Extractor: Send + Sync {
    /// Produce the clip for `row`, returning the path of the written file.
    async fn extract(
        &self,
        source: &Path,
        row: &HighlightRow,
        output_dir: &Path,
    ) -> ExtractResult<PathBuf>;
}

/// Production extractor: seek-and-stream-copy through an ffmpeg child
/// process.
#[derive(Debug, Clone, Default)]
pub struct FfmpegExtractor {
    timeout_secs: Option<u64>,
    cancel_rx: Option<watch::Receiver<bool>>,
}

impl FfmpegExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bound each extraction by a timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }

    /// Kill in-flight ffmpeg processes when the flag flips.
    pub fn with_cancel(mut self, cancel_rx: watch::Receiver<bool>) -> Self {
        self.cancel_rx = Some(cancel_rx);
        self
    }

    fn runner(&self) -> FfmpegRunner {
        let mut runner = FfmpegRunner::new();
        if let Some(secs) = self.timeout_secs {
            runner = runner.with_timeout(secs);
        }
        if let Some(rx) = &self.cancel_rx {
            runner = runner.with_cancel(rx.clone());
        }
        runner
    }
}

#[async_trait]
impl Extractor for FfmpegExtractor {
    async fn extract(
        &self,
        source: &Path,
        row: &HighlightRow,
        output_dir: &Path,
    ) -> ExtractResult<PathBuf> {
        if tokio::fs::metadata(source).await.is_err() {
            return Err(ExtractError::SourceNotFound(source.to_path_buf()));
        }

        let output = clip_output_path(output_dir, &row.clip_id);

        info!(
            clip_id = %row.clip_id,
            start_secs = row.start_secs,
            duration_secs = row.duration_secs,
            output = %output.display(),
            "Extracting clip"
        );

        let cmd = FfmpegCommand::new(source, &output)
            .seek(row.start_secs)
            .duration(row.duration_secs)
            .codec_copy()
            .avoid_negative_ts();

        let clip_id = row.clip_id.clone();
        let result = self
            .runner()
            .run_with_progress(&cmd, move |p| {
                debug!(
                    clip_id = %clip_id,
                    out_time = %p.out_time,
                    speed = p.speed,
                    "ffmpeg progress"
                );
            })
            .await;

        match result {
            Ok(()) => {
                // A zero-byte file means ffmpeg wrote a header and bailed,
                // e.g. when the seek lands past the end of the source.
                match tokio::fs::metadata(&output).await {
                    Ok(meta) if meta.len() > 0 => {
                        info!(clip_id = %row.clip_id, "Clip extracted: {}", output.display());
                        Ok(output)
                    }
                    _ => {
                        remove_partial(&output).await;
                        Err(ExtractError::EmptyOutput(output))
                    }
                }
            }
            Err(e) => {
                // Never leave a half-written artifact at the contract path.
                remove_partial(&output).await;
                Err(e)
            }
        }
    }
}

async fn remove_partial(path: &Path) {
    if tokio::fs::remove_file(path).await.is_ok() {
        debug!("Removed partial output {}", path.display());
    }
}
