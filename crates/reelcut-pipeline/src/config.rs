//! Pipeline configuration.
//!
//! Everything a run needs arrives through this struct. There is no ambient
//! global state, so concurrent runs with different configurations are safe.

use std::path::PathBuf;

use clap::Parser;

/// Configuration for one pipeline run.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "reelcut",
    about = "Cut per-highlight clips from a source video and emit a batch manifest"
)]
pub struct PipelineConfig {
    /// Path to the highlight table (CSV with a header row, UTF-8)
    #[arg(long, env = "REELCUT_TABLE")]
    pub table: PathBuf,

    /// Path to the source video
    #[arg(long, env = "REELCUT_SOURCE")]
    pub source: PathBuf,

    /// Directory for output clips and the manifest (created if absent)
    #[arg(long, env = "REELCUT_OUTPUT_DIR", default_value = "./highlights")]
    pub output_dir: PathBuf,

    /// Batch title recorded in the manifest
    #[arg(long, env = "REELCUT_GAME_TITLE")]
    pub game_title: String,

    /// Maximum concurrent ffmpeg processes
    #[arg(long, env = "REELCUT_MAX_PARALLEL", default_value_t = 1)]
    pub max_parallel: usize,

    /// Per-clip extraction timeout in seconds (unbounded if omitted)
    #[arg(long, env = "REELCUT_CLIP_TIMEOUT_SECS")]
    pub clip_timeout_secs: Option<u64>,

    /// Drop rows whose extraction failed from the manifest instead of
    /// cataloguing the intended highlight anyway
    #[arg(long, env = "REELCUT_SKIP_FAILED_IN_MANIFEST")]
    pub skip_failed_in_manifest: bool,

    /// Print the run report as JSON on stdout
    #[arg(long)]
    pub report_json: bool,
}

impl PipelineConfig {
    /// Whether a manifest entry is still emitted when extraction fails.
    /// Defaults to true: the manifest describes the intended highlight
    /// catalogue, not the set of files that happened to encode.
    pub fn emit_on_extract_failure(&self) -> bool {
        !self.skip_failed_in_manifest
    }
}
