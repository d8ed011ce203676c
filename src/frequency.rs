// Per-page occurrence count ("出現次數：8")

use crate::config::ParserConfig;
use crate::error::{ExtractError, Result};
use lazy_static::lazy_static;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;

lazy_static! {
    // Built-in labels are fixed literals
    static ref DEFAULT_EXTRACTOR: FrequencyExtractor =
        FrequencyExtractor::new(&ParserConfig::default().frequency_labels).unwrap();
}

/// Count on a raw page under the built-in labels; folds full-width digits first.
pub fn extract_frequency(page_text: &str) -> u32 {
    DEFAULT_EXTRACTOR.extract(&page_text.nfkc().collect::<String>())
}

pub struct FrequencyExtractor {
    pattern: Regex,
}

impl FrequencyExtractor {
    /// Build a matcher for `<label> : <digits>` over any of `labels`,
    /// accepting both the half-width and the full-width colon.
    pub fn new(labels: &[String]) -> Result<Self> {
        let alternation = labels
            .iter()
            .map(|label| regex::escape(label))
            .collect::<Vec<_>>()
            .join("|");
        let source = format!(r"(?:{alternation})\s*[:：]\s*([0-9]+)");
        let pattern = Regex::new(&source).map_err(|source_err| ExtractError::InvalidPattern {
            pattern: source.clone(),
            source: source_err,
        })?;
        Ok(Self { pattern })
    }

    /// First count on the page, or 0 when the page states none.
    /// Expects width-folded text: only ASCII digits are read.
    pub fn extract(&self, page_text: &str) -> u32 {
        self.pattern
            .captures(page_text)
            .and_then(|caps| caps.get(1))
            .and_then(|m| m.as_str().parse().ok())
            .unwrap_or(0)
    }
}
