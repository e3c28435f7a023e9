//! Batch manifest models.
//!
//! The manifest is the output contract of a pipeline run: one document
//! listing every validated highlight in input order, consumed by downstream
//! playback/catalog systems. Field order and key spelling are fixed.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::row::HighlightRow;

/// The externally visible projection of one highlight row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ManifestEntry {
    pub clip_id: String,
    pub title: String,
    pub subtitle: String,
    pub period: String,
    pub clock: String,
    /// Clip length in seconds.
    pub duration: f64,
    pub tags: Vec<String>,
    #[serde(rename = "scoreA")]
    pub score_a: i64,
    #[serde(rename = "scoreB")]
    pub score_b: i64,
    pub context: String,
}

impl From<&HighlightRow> for ManifestEntry {
    fn from(row: &HighlightRow) -> Self {
        Self {
            clip_id: row.clip_id.clone(),
            title: row.title.clone(),
            subtitle: row.subtitle.clone(),
            period: row.period.clone(),
            clock: row.clock.clone(),
            duration: row.duration_secs,
            tags: row.tags.clone(),
            score_a: row.score_a,
            score_b: row.score_b,
            context: row.context.clone(),
        }
    }
}

/// The manifest document for a whole batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Manifest {
    /// Batch title, supplied by caller configuration.
    pub game_title: String,
    /// Entries in input-table order. Consumers rely on this ordering for
    /// clip sequencing.
    pub highlights: Vec<ManifestEntry>,
}

impl Manifest {
    /// Serialize to pretty-printed JSON (two-space indent).
    pub fn to_json(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec_pretty(self)
    }

    /// Deserialize from JSON bytes.
    pub fn from_json(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }
}

/// Append-only manifest accumulator.
#[derive(Debug, Default)]
pub struct ManifestBuilder {
    entries: Vec<ManifestEntry>,
}

impl ManifestBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry, preserving call order. Never fails.
    pub fn add(&mut self, entry: ManifestEntry) {
        self.entries.push(entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn build(self, game_title: impl Into<String>) -> Manifest {
        Manifest {
            game_title: game_title.into(),
            highlights: self.entries,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(clip_id: &str) -> ManifestEntry {
        ManifestEntry {
            clip_id: clip_id.to_string(),
            title: "Breakaway save".to_string(),
            subtitle: String::new(),
            period: "2nd".to_string(),
            clock: "08:15".to_string(),
            duration: 9.0,
            tags: vec!["save".to_string(), "breakaway".to_string()],
            score_a: 2,
            score_b: 1,
            context: String::new(),
        }
    }

    #[test]
    fn test_builder_preserves_order() {
        let mut builder = ManifestBuilder::new();
        builder.add(entry("c"));
        builder.add(entry("a"));
        builder.add(entry("b"));
        let manifest = builder.build("Semifinal");

        assert_eq!(manifest.game_title, "Semifinal");
        let ids: Vec<&str> = manifest
            .highlights
            .iter()
            .map(|e| e.clip_id.as_str())
            .collect();
        assert_eq!(ids, vec!["c", "a", "b"]);
    }

    #[test]
    fn test_json_round_trip() {
        let mut builder = ManifestBuilder::new();
        builder.add(entry("one"));
        builder.add(entry("two"));
        let manifest = builder.build("Final");

        let bytes = manifest.to_json().unwrap();
        let parsed = Manifest::from_json(&bytes).unwrap();
        assert_eq!(parsed, manifest);
    }

    #[test]
    fn test_score_keys_and_numeric_fields() {
        let manifest = Manifest {
            game_title: "g".to_string(),
            highlights: vec![entry("x")],
        };
        let value: serde_json::Value =
            serde_json::from_slice(&manifest.to_json().unwrap()).unwrap();
        let e = &value["highlights"][0];

        assert_eq!(e["scoreA"], 2);
        assert_eq!(e["scoreB"], 1);
        assert!(e["duration"].is_number());
        assert!(e["tags"].is_array());
        assert_eq!(e["tags"][0], "save");
    }
}
