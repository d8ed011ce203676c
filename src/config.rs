use crate::error::{ExtractError, Result};
use crate::strategy::Strategy;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Definition used when the source glyphs are unrecoverable.
pub const DEFAULT_PLACEHOLDER: &str = "(definition unavailable)";

/// Alignment tolerance for whitespace-inferred table columns.
pub const DEFAULT_SNAP_TOLERANCE: f64 = 5.0;

/// How repeated words across a document are merged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DedupPolicy {
    /// Keep every occurrence; repeated rows may carry different years.
    #[default]
    KeepAll,
    /// Keep the first occurrence of each word (case-sensitive).
    FirstSeen,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    pub anchor_markers: Vec<String>,
    pub noise_patterns: Vec<String>,
    pub frequency_labels: Vec<String>,
    pub strategies: Vec<Strategy>,
    pub stream_snap_tolerance: f64,
    pub placeholder_definition: String,
    pub dedup: DedupPolicy,
    pub normalize_width: bool,
}

impl Default for ParserConfig {
    fn default() -> Self {
        let anchors = [
            "v.", "n.", "adj.", "adv.", "prep.", "conj.", "pron.", "aux.", "art.", "num.",
            "int.", "pl.", "缩写", "縮寫",
        ];
        let noise = [
            // section / level labels
            r"Level",
            r"^\s*第\s*[一二三四五六七八九十\d]+\s*[章節回級]",
            // pagination
            r"(?i)^\s*page\s*\d+(\s*(/|of)\s*\d+)?\s*$",
            r"^\s*第\s*\d+\s*頁",
            r"^\s*-\s*\d+\s*-\s*$",
            // copyright
            r"(?i)copyright",
            r"©",
            r"版權所有",
            // title banners and page header
            r"學測.*單字",
            r"大考中心",
            r"出現次數",
        ];
        Self {
            anchor_markers: anchors.iter().map(|s| s.to_string()).collect(),
            noise_patterns: noise.iter().map(|s| s.to_string()).collect(),
            frequency_labels: vec!["出現次數".to_string(), "Occurrences".to_string()],
            strategies: Strategy::ALL.to_vec(),
            stream_snap_tolerance: DEFAULT_SNAP_TOLERANCE,
            placeholder_definition: DEFAULT_PLACEHOLDER.to_string(),
            dedup: DedupPolicy::KeepAll,
            normalize_width: true,
        }
    }
}

impl ParserConfig {
    /// Parse a TOML document; missing keys keep their defaults.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ExtractError::MissingInput {
                path: path.to_path_buf(),
            });
        }
        let text = fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }
}
