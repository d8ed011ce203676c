// Structural noise gate.

use crate::config::ParserConfig;
use crate::error::{ExtractError, Result};
use crate::patterns::{has_cjk, is_numeric_only};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref DEFAULT_CLASSIFIER: NoiseClassifier =
        NoiseClassifier::new(&ParserConfig::default().noise_patterns).unwrap();
}

/// Line noise under the built-in markers.
pub fn is_noise(text: &str) -> bool {
    DEFAULT_CLASSIFIER.is_noise(text)
}

pub struct NoiseClassifier {
    markers: Vec<Regex>,
}

impl NoiseClassifier {
    pub fn new(patterns: &[String]) -> Result<Self> {
        let markers = patterns
            .iter()
            .map(|pattern| {
                Regex::new(pattern).map_err(|source| ExtractError::InvalidPattern {
                    pattern: pattern.clone(),
                    source,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { markers })
    }

    /// Line contains a boilerplate marker (title, pagination, copyright...).
    pub fn has_marker(&self, text: &str) -> bool {
        self.markers.iter().any(|marker| marker.is_match(text))
    }

    /// Noise for a single line or cell: numeric/`~` only, or a marker hit.
    ///
    /// Blank text is not noise, it is simply empty.
    pub fn is_noise(&self, text: &str) -> bool {
        let text = text.trim();
        if text.is_empty() {
            return false;
        }
        is_numeric_only(text) || self.has_marker(text)
    }

    /// Noise for a whole table row: every non-empty cell is numeric-only.
    /// Marker cells are skipped one by one during word search instead.
    pub fn is_noise_row(&self, cells: &[String]) -> bool {
        let filled: Vec<&str> = cells
            .iter()
            .map(|c| c.trim())
            .filter(|c| !c.is_empty())
            .collect();
        if filled.is_empty() {
            return false;
        }
        filled.iter().all(|c| is_numeric_only(c))
    }

    /// Noise for a cell that is about to be tried as an English word.
    /// Adds the CJK check: a word candidate never carries ideographs.
    pub fn is_word_noise(&self, text: &str) -> bool {
        self.is_noise(text) || has_cjk(text)
    }
}
