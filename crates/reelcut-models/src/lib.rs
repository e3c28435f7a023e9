//! Shared data models for the reelcut highlight pipeline.
//!
//! This crate provides Serde-serializable types for:
//! - Highlight rows parsed from the input table
//! - The output manifest consumed by downstream catalog/playback systems
//! - Timestamp parsing shared by row validation and the media layer
//!
//! Everything here is pure data: no IO, no async.

pub mod manifest;
pub mod row;
pub mod timestamp;

// Re-export common types
pub use manifest::{Manifest, ManifestBuilder, ManifestEntry};
pub use row::{parse_row, HighlightRow, RowError};
pub use timestamp::{format_seconds, parse_timestamp, TimestampError};
