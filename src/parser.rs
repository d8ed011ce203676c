// Document-level driver: pages in order, sticky frequency, merge policy and
// the diagnostic trace.

use crate::builder::RecordBuilder;
use crate::config::{DedupPolicy, ParserConfig};
use crate::error::Result;
use crate::frequency::FrequencyExtractor;
use crate::record::{VocabularyRecord, dedup_first_seen};
use crate::source::{DocumentSource, MemoryDocument};
use crate::strategy::{Strategy, StrategySelector};
use rayon::prelude::*;
use serde::Serialize;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageReport {
    /// 1-based page number.
    pub page: usize,
    pub strategy: Option<Strategy>,
    pub records: usize,
}

/// Advisory diagnostics; never feeds back into parsing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParseTrace {
    pub page_count: usize,
    pub pages: Vec<PageReport>,
    pub messages: Vec<String>,
}

impl ParseTrace {
    fn failed(message: String) -> Self {
        Self {
            messages: vec![message],
            ..Self::default()
        }
    }

    /// Human-readable lines: page count, one line per page, then messages.
    pub fn lines(&self) -> Vec<String> {
        let mut lines = vec![format!("document has {} pages", self.page_count)];
        for report in &self.pages {
            lines.push(match report.strategy {
                Some(strategy) => format!(
                    "page {}: {} records via {}",
                    report.page, report.records, strategy
                ),
                None => format!("page {}: no usable structure", report.page),
            });
        }
        lines.extend(self.messages.iter().cloned());
        lines
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ParseOutcome {
    pub records: Vec<VocabularyRecord>,
    pub trace: ParseTrace,
}

impl ParseOutcome {
    fn failed(message: String) -> Self {
        Self {
            records: Vec::new(),
            trace: ParseTrace::failed(message),
        }
    }
}

pub struct DocumentParser {
    config: ParserConfig,
    builder: RecordBuilder,
    frequency: FrequencyExtractor,
}

impl DocumentParser {
    pub fn new(config: ParserConfig) -> Result<Self> {
        let builder = RecordBuilder::new(&config)?;
        let frequency = FrequencyExtractor::new(&config.frequency_labels)?;
        Ok(Self {
            config,
            builder,
            frequency,
        })
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Parse a document. Never fails: extractor errors become an empty
    /// outcome with the error in the trace.
    pub fn parse<D: DocumentSource + ?Sized>(&self, doc: &D) -> ParseOutcome {
        match self.try_parse(doc) {
            Ok(outcome) => outcome,
            Err(e) => {
                log::warn!("document parse failed: {e}");
                ParseOutcome::failed(format!("unexpected extraction failure: {e}"))
            }
        }
    }

    /// Open a JSON document from disk and parse it.
    pub fn parse_path(&self, path: impl AsRef<Path>) -> ParseOutcome {
        match MemoryDocument::open(path) {
            Ok(doc) => self.parse(&doc),
            Err(e) => {
                log::warn!("cannot open document: {e}");
                ParseOutcome::failed(e.to_string())
            }
        }
    }

    /// Parse independent documents in parallel; each one stays sequential.
    pub fn parse_batch<D: DocumentSource + Sync>(&self, docs: &[D]) -> Vec<ParseOutcome> {
        docs.par_iter().map(|doc| self.parse(doc)).collect()
    }

    pub fn parse_paths_batch<P: AsRef<Path> + Sync>(&self, paths: &[P]) -> Vec<ParseOutcome> {
        paths.par_iter().map(|path| self.parse_path(path)).collect()
    }

    fn try_parse<D: DocumentSource + ?Sized>(&self, doc: &D) -> Result<ParseOutcome> {
        let selector = StrategySelector::new(
            &self.builder,
            &self.config.strategies,
            self.config.stream_snap_tolerance,
        );
        let page_count = doc.page_count();
        let mut trace = ParseTrace {
            page_count,
            ..ParseTrace::default()
        };
        let mut records = Vec::new();

        for index in 0..page_count {
            let text = doc.page_text(index)?.unwrap_or_default();
            if text.trim().is_empty() {
                log::debug!("page {}: no extractable text", index + 1);
                trace.pages.push(PageReport {
                    page: index + 1,
                    strategy: None,
                    records: 0,
                });
                continue;
            }

            // Same width folding as the rows, so "出現次數：８" reads as 8
            let frequency = self.frequency.extract(&self.builder.clean(&text));
            let run = selector.run_page(doc, index, &text, frequency)?;
            trace.pages.push(PageReport {
                page: index + 1,
                strategy: run.strategy,
                records: run.records.len(),
            });
            records.extend(run.records);
        }

        if self.config.dedup == DedupPolicy::FirstSeen {
            let before = records.len();
            records = dedup_first_seen(records);
            log::debug!("dedup removed {} repeated words", before - records.len());
        }

        if records.is_empty() {
            trace
                .messages
                .push("no vocabulary records found in any page".to_string());
        }
        trace
            .messages
            .push(format!("extracted {} records", records.len()));
        log::info!(
            "parsed {} pages into {} records",
            page_count,
            records.len()
        );

        Ok(ParseOutcome { records, trace })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ExtractError;
    use crate::source::{MemoryPage, Table, TableSettings};

    fn parser() -> DocumentParser {
        DocumentParser::new(ParserConfig::default()).unwrap()
    }

    fn table(rows: &[&[&str]]) -> Table {
        rows.iter()
            .map(|row| row.iter().map(|c| Some(c.to_string())).collect())
            .collect()
    }

    fn sample_document() -> MemoryDocument {
        MemoryDocument::new(vec![
            MemoryPage::text("學測英文高頻單字 Level 1\n出現次數：8\naccess\n[n.] 通道").with_stream(
                table(&[
                    &["Level 1", ""],
                    &["access", "[n.] 通道", "05 06"],
                    &["accident", ""],
                ]),
            ),
            MemoryPage::text("出現次數: 4\nachieve  [v.] 達成  10\nabsorb").with_grid(table(&[
                &["[v.] 吸收", ""],
                &["achieve", "[v.] 達成", "10"],
                &["absorb", ""],
            ])),
            MemoryPage::default(),
            MemoryPage::text("access ○○\n13"),
        ])
    }

    #[test]
    fn test_full_document() {
        let parser = parser();
        let outcome = parser.parse(&sample_document());

        let words: Vec<_> = outcome.records.iter().map(|r| r.word.as_str()).collect();
        assert_eq!(words, vec!["access", "achieve", "access"]);

        assert_eq!(outcome.records[0].frequency, 8);
        assert_eq!(outcome.records[1].frequency, 4);
        assert_eq!(outcome.records[2].frequency, 0);
        assert_eq!(outcome.records[2].definition, crate::config::DEFAULT_PLACEHOLDER);

        let strategies: Vec<_> = outcome.trace.pages.iter().map(|p| p.strategy).collect();
        assert_eq!(
            strategies,
            vec![
                Some(Strategy::StreamTable),
                Some(Strategy::GridTable),
                None,
                Some(Strategy::DegradedHarvest),
            ]
        );
        assert_eq!(outcome.trace.page_count, 4);
    }

    #[test]
    fn test_pending_does_not_cross_pages() {
        // "accident" is pending at the end of page 1; page 2 opens with a
        // definition that has no word of its own and must stay unmatched.
        let outcome = parser().parse(&sample_document());
        assert!(outcome.records.iter().all(|r| r.word != "accident"));
        assert!(outcome.records.iter().all(|r| r.definition != "[v.] 吸收"));
    }

    #[test]
    fn test_first_seen_policy() {
        let config = ParserConfig {
            dedup: DedupPolicy::FirstSeen,
            ..ParserConfig::default()
        };
        let outcome = DocumentParser::new(config).unwrap().parse(&sample_document());
        let words: Vec<_> = outcome.records.iter().map(|r| r.word.as_str()).collect();
        assert_eq!(words, vec!["access", "achieve"]);
        assert_eq!(outcome.records[0].definition, "[n.] 通道");
    }

    #[test]
    fn test_idempotent() {
        let parser = parser();
        let doc = sample_document();
        assert_eq!(parser.parse(&doc), parser.parse(&doc));
    }

    #[test]
    fn test_frequency_sticks_across_fallbacks() {
        let doc = MemoryDocument::new(vec![MemoryPage::text(
            "出現次數：8\nability\n[n.] 能力\npassage",
        )]);
        let outcome = parser().parse(&doc);
        assert_eq!(outcome.records.len(), 1);
        assert!(outcome.records.iter().all(|r| r.frequency == 8));
    }

    #[test]
    fn test_full_width_frequency_header() {
        let doc = MemoryDocument::new(vec![MemoryPage::text(
            "出現次數：８\nabandon [v.] 放棄 05",
        )]);
        let outcome = parser().parse(&doc);
        assert_eq!(outcome.records.len(), 1);
        assert_eq!(outcome.records[0].word, "abandon");
        assert_eq!(outcome.records[0].frequency, 8);
    }

    struct BrokenDocument;

    impl DocumentSource for BrokenDocument {
        fn page_count(&self) -> usize {
            2
        }

        fn page_text(&self, index: usize) -> Result<Option<String>> {
            match index {
                0 => Ok(Some("access [n.] 通道".to_string())),
                _ => Err(ExtractError::Extraction("corrupt xref".to_string())),
            }
        }

        fn page_tables(&self, _index: usize, _settings: &TableSettings) -> Result<Vec<Table>> {
            Ok(Vec::new())
        }
    }

    #[test]
    fn test_extraction_failure_is_recovered() {
        let outcome = parser().parse(&BrokenDocument);
        assert!(outcome.records.is_empty());
        assert!(outcome.trace.messages[0].contains("corrupt xref"));
    }

    #[test]
    fn test_missing_input() {
        let outcome = parser().parse_path("/nonexistent/vocabulary.json");
        assert!(outcome.records.is_empty());
        assert!(outcome.trace.messages[0].contains("document not found"));
    }

    #[test]
    fn test_unparseable_document_reports_empty() {
        let doc = MemoryDocument::new(vec![MemoryPage::text("08 09\n10 11")]);
        let outcome = parser().parse(&doc);
        assert!(outcome.records.is_empty());
        let lines = outcome.trace.lines();
        assert_eq!(lines[0], "document has 1 pages");
        assert_eq!(lines[1], "page 1: no usable structure");
        assert!(lines.iter().any(|l| l.contains("no vocabulary records")));
    }

    #[test]
    fn test_batch_matches_sequential() {
        let parser = parser();
        let docs = vec![sample_document(), MemoryDocument::default()];
        let batch = parser.parse_batch(&docs);
        assert_eq!(batch[0], parser.parse(&docs[0]));
        assert!(batch[1].records.is_empty());
    }
}
