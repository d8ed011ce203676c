use crate::error::{ExtractError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// One extracted table: rows of optional cell strings.
pub type Table = Vec<Vec<Option<String>>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableStrategy {
    /// Cells from visible or inferred ruling lines.
    Lines,
    /// Columns inferred from whitespace alignment.
    Text,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TableSettings {
    pub strategy: TableStrategy,
    pub snap_tolerance: f64,
}

impl TableSettings {
    pub fn grid() -> Self {
        Self {
            strategy: TableStrategy::Lines,
            snap_tolerance: 3.0,
        }
    }

    pub fn stream(snap_tolerance: f64) -> Self {
        Self {
            strategy: TableStrategy::Text,
            snap_tolerance,
        }
    }
}

pub trait DocumentSource {
    fn page_count(&self) -> usize;

    /// Plain text of a page; `None` when the page has no text layer.
    fn page_text(&self, index: usize) -> Result<Option<String>>;

    fn page_tables(&self, index: usize, settings: &TableSettings) -> Result<Vec<Table>>;
}

/// A page whose text and tables were extracted ahead of time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryPage {
    pub text: Option<String>,
    pub grid_tables: Vec<Table>,
    pub stream_tables: Vec<Table>,
}

impl MemoryPage {
    pub fn text(text: &str) -> Self {
        Self {
            text: Some(text.to_string()),
            ..Self::default()
        }
    }

    pub fn with_grid(mut self, table: Table) -> Self {
        self.grid_tables.push(table);
        self
    }

    pub fn with_stream(mut self, table: Table) -> Self {
        self.stream_tables.push(table);
        self
    }
}

/// In-memory document, usually deserialized from the JSON a host extractor
/// writes: `{"pages": [{"text": ..., "grid_tables": [...], "stream_tables": [...]}]}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MemoryDocument {
    pub pages: Vec<MemoryPage>,
}

impl MemoryDocument {
    pub fn new(pages: Vec<MemoryPage>) -> Self {
        Self { pages }
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ExtractError::MissingInput {
                path: path.to_path_buf(),
            });
        }
        let json = fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    fn page(&self, index: usize) -> Result<&MemoryPage> {
        self.pages
            .get(index)
            .ok_or_else(|| ExtractError::Extraction(format!("page {} out of range", index + 1)))
    }
}

impl DocumentSource for MemoryDocument {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn page_text(&self, index: usize) -> Result<Option<String>> {
        Ok(self.page(index)?.text.clone())
    }

    fn page_tables(&self, index: usize, settings: &TableSettings) -> Result<Vec<Table>> {
        let page = self.page(index)?;
        Ok(match settings.strategy {
            TableStrategy::Lines => page.grid_tables.clone(),
            TableStrategy::Text => page.stream_tables.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_document() {
        let doc = MemoryDocument::from_json_str(
            r#"{"pages": [
                {"text": "出現次數：8", "stream_tables": [[["access", null, "[n.] 通道"]]]},
                {}
            ]}"#,
        )
        .unwrap();

        assert_eq!(doc.page_count(), 2);
        assert_eq!(doc.page_text(0).unwrap().as_deref(), Some("出現次數：8"));
        assert!(doc.page_tables(0, &TableSettings::grid()).unwrap().is_empty());
        let stream = doc.page_tables(0, &TableSettings::stream(5.0)).unwrap();
        assert_eq!(stream[0][0][1], None);
        assert_eq!(doc.page_text(1).unwrap(), None);
    }

    #[test]
    fn test_out_of_range_page() {
        let doc = MemoryDocument::default();
        assert!(matches!(doc.page_text(0), Err(ExtractError::Extraction(_))));
    }

    #[test]
    fn test_open_missing_file() {
        let err = MemoryDocument::open("/nonexistent/vocabulary.json").unwrap_err();
        assert!(matches!(err, ExtractError::MissingInput { .. }));
    }
}
