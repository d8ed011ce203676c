//! Row/line record builder.
//!
//! Turns one unit (a table row, or a text line with the lines around it) into
//! at most one [`VocabularyRecord`]. A word that shows up without a definition
//! is parked in [`PageContext`] and picked up by the next unit that has a
//! definition but no word of its own.

use crate::config::ParserConfig;
use crate::error::{ExtractError, Result};
use crate::noise::NoiseClassifier;
use crate::patterns::{
    LEADING_WORD, LOOKBACK_WORD, STRICT_WORD, is_numeric_only, split_stream_line, trimmed_len,
};
use crate::record::VocabularyRecord;
use crate::years::extract_years;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;

/// Minimum leading offset (in chars) for an anchor to split its cell.
const SPLIT_OFFSET: usize = 2;

/// Per-page scan state. Built fresh for every page and dropped with it, so a
/// pending word can never attach to a definition on the next page.
#[derive(Debug, Default)]
pub struct PageContext {
    frequency: u32,
    pending: Option<String>,
}

impl PageContext {
    pub fn new(frequency: u32) -> Self {
        Self {
            frequency,
            pending: None,
        }
    }

    pub fn frequency(&self) -> u32 {
        self.frequency
    }

    pub fn pending(&self) -> Option<&str> {
        self.pending.as_deref()
    }
}

/// Where the definition sits in a unit.
#[derive(Debug)]
struct DefinitionHit {
    index: usize,
    word: Option<String>,
    definition: String,
}

/// Anchors, noise markers and placeholder compiled from [`ParserConfig`].
pub struct RecordBuilder {
    anchor: Regex,
    noise: NoiseClassifier,
    placeholder: String,
    normalize_width: bool,
}

impl RecordBuilder {
    pub fn new(config: &ParserConfig) -> Result<Self> {
        let mut markers: Vec<&str> = config.anchor_markers.iter().map(String::as_str).collect();
        // Longest first so a short marker never shadows a longer one
        markers.sort_by_key(|m| std::cmp::Reverse(m.chars().count()));
        let alternation = markers
            .iter()
            .map(|m| regex::escape(m))
            .collect::<Vec<_>>()
            .join("|");
        let source = format!(r"(?i)\[\s*(?:{alternation})");
        let anchor = Regex::new(&source).map_err(|err| ExtractError::InvalidPattern {
            pattern: source.clone(),
            source: err,
        })?;

        Ok(Self {
            anchor,
            noise: NoiseClassifier::new(&config.noise_patterns)?,
            placeholder: config.placeholder_definition.clone(),
            normalize_width: config.normalize_width,
        })
    }

    /// Clean one raw cell or line: newlines folded, trimmed, NFKC if enabled.
    pub fn clean(&self, raw: &str) -> String {
        let flat = raw.replace(['\n', '\r'], " ");
        if self.normalize_width {
            flat.nfkc().collect::<String>().trim().to_string()
        } else {
            flat.trim().to_string()
        }
    }

    pub fn has_anchor(&self, text: &str) -> bool {
        self.anchor.is_match(text)
    }

    /// Row mode: one table row, years taken from the whole row.
    pub fn build_row(&self, cells: &[String], ctx: &mut PageContext) -> Option<VocabularyRecord> {
        let content: usize = cells.iter().map(|c| trimmed_len(c)).sum();
        if content < 2 || self.noise.is_noise_row(cells) {
            return None;
        }

        let (word, definition) = self.resolve(cells, ctx, || None)?;
        Some(self.emit(word, definition, &cells.join(" "), ctx))
    }

    /// Line mode: `lines[index]` split into pseudo-cells, with up to two
    /// lines of lookback for the word and a ±1 line window for years.
    pub fn build_line(
        &self,
        lines: &[String],
        index: usize,
        ctx: &mut PageContext,
    ) -> Option<VocabularyRecord> {
        let line = lines.get(index)?;
        if line.trim().is_empty() || self.noise.is_noise(line) {
            return None;
        }

        let cells = split_stream_line(line);
        let (word, definition) = self.resolve(&cells, ctx, || self.word_above(lines, index))?;
        Some(self.emit(word, definition, &context_window(lines, index), ctx))
    }

    /// Degraded-glyph harvest: the definition text is gone, so any line that
    /// starts with a letter token becomes a word with the placeholder.
    pub fn harvest_line(
        &self,
        lines: &[String],
        index: usize,
        ctx: &mut PageContext,
    ) -> Option<VocabularyRecord> {
        let line = lines.get(index)?.trim();
        if line.is_empty() || self.noise.is_noise(line) {
            return None;
        }

        let token = LEADING_WORD.find(line)?.as_str();
        if token.chars().count() < 2 {
            return None;
        }
        let placeholder = self.placeholder.clone();
        Some(self.emit(
            token.to_string(),
            placeholder,
            &context_window(lines, index),
            ctx,
        ))
    }

    /// Shared state machine: find the definition, then the word from the
    /// unit itself, the lookback, and finally the pending slot.
    fn resolve(
        &self,
        cells: &[String],
        ctx: &mut PageContext,
        lookback: impl FnOnce() -> Option<String>,
    ) -> Option<(String, String)> {
        let Some(hit) = self.find_definition(cells) else {
            if let Some(candidate) = self.pending_candidate(cells) {
                log::trace!("pending word: {candidate}");
                ctx.pending = Some(candidate);
            }
            return None;
        };

        let word = hit
            .word
            .or_else(|| self.word_left_of(cells, hit.index))
            .or_else(lookback)
            .or_else(|| ctx.pending.take())?;
        Some((word, hit.definition))
    }

    fn emit(
        &self,
        word: String,
        definition: String,
        year_text: &str,
        ctx: &mut PageContext,
    ) -> VocabularyRecord {
        ctx.pending = None;
        VocabularyRecord {
            word,
            definition,
            frequency: ctx.frequency,
            years: extract_years(year_text),
        }
    }

    /// First cell carrying an anchor; splits `"apple [n.] 蘋果"` in place.
    /// Banner and legend cells are never definitions.
    fn find_definition(&self, cells: &[String]) -> Option<DefinitionHit> {
        cells.iter().enumerate().find_map(|(index, cell)| {
            if self.noise.has_marker(cell) {
                return None;
            }
            let found = self.anchor.find(cell)?;
            let offset = cell[..found.start()].chars().count();
            if offset > SPLIT_OFFSET {
                let left = cell[..found.start()].trim();
                if STRICT_WORD.is_match(left) {
                    if let Some(word) = clean_word(left) {
                        return Some(DefinitionHit {
                            index,
                            word: Some(word),
                            definition: cell[found.start()..].trim().to_string(),
                        });
                    }
                }
            }
            Some(DefinitionHit {
                index,
                word: None,
                definition: cell.trim().to_string(),
            })
        })
    }

    /// Nearest usable word cell strictly left of the definition.
    fn word_left_of(&self, cells: &[String], index: usize) -> Option<String> {
        cells[..index]
            .iter()
            .rev()
            .find_map(|cell| self.lookback_word(cell))
    }

    /// Line i-1, or i-2 when i-1 is itself noise.
    fn word_above(&self, lines: &[String], index: usize) -> Option<String> {
        let mut cursor = index;
        for _ in 0..2 {
            cursor = cursor.checked_sub(1)?;
            let line = lines[cursor].trim();
            if self.noise.is_noise(line) {
                continue;
            }
            return self.lookback_word(line);
        }
        None
    }

    fn lookback_word(&self, text: &str) -> Option<String> {
        let text = text.trim();
        if text.is_empty() || self.noise.is_word_noise(text) || is_numeric_only(text) {
            return None;
        }
        if !LOOKBACK_WORD.is_match(text) {
            return None;
        }
        clean_word(text)
    }

    /// A cell that looks like a bare English word, for a unit with no anchor.
    fn pending_candidate(&self, cells: &[String]) -> Option<String> {
        cells.iter().find_map(|cell| {
            let cell = cell.trim();
            if cell.is_empty() || self.noise.is_word_noise(cell) {
                return None;
            }
            if !STRICT_WORD.is_match(cell) {
                return None;
            }
            clean_word(cell)
        })
    }
}

/// Normalize a word candidate: collapse spaces, drop trailing count/year
/// columns that stream extraction glued on, require two chars, a letter and
/// no digits.
fn clean_word(candidate: &str) -> Option<String> {
    let mut tokens: Vec<&str> = candidate.split_whitespace().collect();
    while tokens.last().is_some_and(|t| is_numeric_only(t)) {
        tokens.pop();
    }
    let word = tokens.join(" ");
    if word.chars().any(|c| c.is_ascii_digit())
        || !word.chars().any(|c| c.is_ascii_alphabetic())
        || word.chars().count() < 2
    {
        return None;
    }
    Some(word)
}

/// Lines `index - 1 ..= index + 1` joined with spaces.
fn context_window(lines: &[String], index: usize) -> String {
    let start = index.saturating_sub(1);
    let end = (index + 2).min(lines.len());
    lines[start..end].join(" ")
}
