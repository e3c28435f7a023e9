//! Highlight row model and validation.
//!
//! One `HighlightRow` is one record of the input table, validated and typed.
//! Parsing is strict: unparseable numbers and timecodes are errors, never
//! silently coerced to defaults.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::timestamp::parse_timestamp;

/// Columns that must be present and non-empty in every row.
pub const REQUIRED_COLUMNS: &[&str] = &[
    "clip_id",
    "title",
    "period",
    "clock",
    "start_time",
    "duration",
    "scoreA",
    "scoreB",
];

/// Row validation error. Row-local and non-fatal to a pipeline run.
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
pub enum RowError {
    #[error("missing required column '{0}'")]
    MissingField(String),

    #[error("column '{column}' is not a valid number: '{raw}'")]
    InvalidNumber { column: String, raw: String },

    #[error("invalid start_time '{0}'")]
    InvalidTimecode(String),

    #[error("duration must be positive, got {0}")]
    NonPositiveDuration(f64),

    #[error("clip_id '{0}' is not filesystem-safe")]
    UnsafeClipId(String),
}

/// One validated highlight record. Immutable after construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighlightRow {
    /// Normalized identifier, used as the output filename stem.
    pub clip_id: String,
    pub title: String,
    pub subtitle: String,
    /// Game-context strings, opaque to the pipeline.
    pub period: String,
    pub clock: String,
    /// Offset into the source video, in seconds.
    pub start_secs: f64,
    /// Clip length in seconds, always > 0.
    pub duration_secs: f64,
    /// Ordered, trimmed, empties dropped. Not deduplicated.
    pub tags: Vec<String>,
    pub score_a: i64,
    pub score_b: i64,
    pub context: String,
}

/// Parse one raw table row (column name -> raw text) into a `HighlightRow`.
///
/// Pure and deterministic: the same input map always yields the same result.
pub fn parse_row(raw: &HashMap<String, String>) -> Result<HighlightRow, RowError> {
    let clip_id = normalize_clip_id(required(raw, "clip_id")?)?;
    let title = required(raw, "title")?.to_string();
    let period = required(raw, "period")?.to_string();
    let clock = required(raw, "clock")?.to_string();

    let start_raw = required(raw, "start_time")?;
    let start_secs =
        parse_timestamp(start_raw).map_err(|_| RowError::InvalidTimecode(start_raw.to_string()))?;

    let duration_raw = required(raw, "duration")?;
    let duration_secs: f64 = duration_raw
        .parse()
        .map_err(|_| RowError::InvalidNumber {
            column: "duration".to_string(),
            raw: duration_raw.to_string(),
        })?;
    // f64::from_str accepts "NaN" and "inf"; neither is a usable clip
    // length, and NaN would serialize as JSON null in the manifest.
    if !duration_secs.is_finite() {
        return Err(RowError::InvalidNumber {
            column: "duration".to_string(),
            raw: duration_raw.to_string(),
        });
    }
    if duration_secs <= 0.0 {
        return Err(RowError::NonPositiveDuration(duration_secs));
    }

    let score_a = parse_score(raw, "scoreA")?;
    let score_b = parse_score(raw, "scoreB")?;

    let tags = parse_tags(optional(raw, "tags"));
    let subtitle = optional(raw, "subtitle").to_string();
    let context = optional(raw, "context").to_string();

    Ok(HighlightRow {
        clip_id,
        title,
        subtitle,
        period,
        clock,
        start_secs,
        duration_secs,
        tags,
        score_a,
        score_b,
        context,
    })
}

/// Split a delimited tag string on commas, trimming whitespace and dropping
/// empty segments. Order is preserved and duplicates are kept.
pub fn parse_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Normalize a clip identifier into a filesystem-safe filename stem.
///
/// Whitespace runs become single underscores. Anything outside
/// `[A-Za-z0-9._-]` after that, a leading dot, or an empty result is
/// rejected: the identifier names an output file and may originate from
/// uncontrolled data.
pub fn normalize_clip_id(raw: &str) -> Result<String, RowError> {
    let normalized: String = raw
        .trim()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_");

    let safe = !normalized.is_empty()
        && !normalized.starts_with('.')
        && normalized
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'));

    if safe {
        Ok(normalized)
    } else {
        Err(RowError::UnsafeClipId(raw.to_string()))
    }
}

fn required<'a>(raw: &'a HashMap<String, String>, column: &str) -> Result<&'a str, RowError> {
    match raw.get(column).map(|v| v.trim()) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(RowError::MissingField(column.to_string())),
    }
}

fn optional<'a>(raw: &'a HashMap<String, String>, column: &str) -> &'a str {
    raw.get(column).map(|v| v.trim()).unwrap_or("")
}

fn parse_score(raw: &HashMap<String, String>, column: &str) -> Result<i64, RowError> {
    let value = required(raw, column)?;
    value.parse().map_err(|_| RowError::InvalidNumber {
        column: column.to_string(),
        raw: value.to_string(),
    })
}
