//! Vocabulary record extraction from exam word-list documents.
//!
//! Pages come in as text plus whatever tables the host extractor found.
//! Each page is run through a fallback chain of strategies (grid table,
//! stream table, line scan, degraded-glyph harvest) and every strategy feeds
//! the same row/line record builder.

pub mod builder;
pub mod config;
pub mod error;
pub mod frequency;
pub mod noise;
pub mod parser;
pub mod patterns;
pub mod record;
pub mod selection;
pub mod source;
pub mod strategy;
pub mod years;

#[cfg(feature = "python")]
mod python;

pub use builder::{PageContext, RecordBuilder};
pub use config::{DedupPolicy, ParserConfig};
pub use error::{ExtractError, Result};
pub use parser::{DocumentParser, PageReport, ParseOutcome, ParseTrace};
pub use record::{VocabularyRecord, dedup_first_seen};
pub use selection::{FrequencyBand, Selection};
pub use source::{DocumentSource, MemoryDocument, MemoryPage, Table, TableSettings, TableStrategy};
pub use strategy::Strategy;
pub use years::extract_years;

/// Parse with the built-in configuration.
pub fn parse_document<D: DocumentSource + ?Sized>(doc: &D) -> Result<ParseOutcome> {
    Ok(DocumentParser::new(ParserConfig::default())?.parse(doc))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_document_from_json() {
        let doc = MemoryDocument::from_json_str(
            r#"{"pages": [{"text": "出現次數：6\nabandon [v.] 放棄 05 09\nLevel 2"}]}"#,
        )
        .unwrap();
        let outcome = parse_document(&doc).unwrap();

        assert_eq!(outcome.records.len(), 1);
        let record = &outcome.records[0];
        assert_eq!(record.word, "abandon");
        assert_eq!(record.definition, "[v.] 放棄 05 09");
        assert_eq!(record.frequency, 6);
        assert_eq!(record.year_label(), "105, 109");
        assert_eq!(outcome.trace.pages[0].strategy, Some(Strategy::LineScan));
    }
}
