//! FFmpeg process boundary for the reelcut highlight pipeline.
//!
//! This crate provides:
//! - Type-safe FFmpeg command building (never shell-interpolated)
//! - Progress parsing from `-progress pipe:2`
//! - Timeout and cancellation support via tokio
//! - The stream-copy clip extractor and its trait seam

pub mod command;
pub mod error;
pub mod extract;
pub mod progress;

pub use command::{check_ffmpeg, FfmpegCommand, FfmpegRunner};
pub use error::{ExtractError, ExtractResult};
pub use extract::{clip_output_path, Extractor, FfmpegExtractor};
pub use progress::FfmpegProgress;
