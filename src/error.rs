use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading a document or building a parser.
///
/// Parsing itself never fails: [`crate::DocumentParser`] turns each of these
/// into an empty outcome with a diagnostic message.
#[derive(Error, Debug)]
pub enum ExtractError {
    /// The document handle could not be opened.
    #[error("document not found: {}", .path.display())]
    MissingInput { path: PathBuf },

    /// The host extractor failed on a page.
    #[error("extraction failed: {0}")]
    Extraction(String),

    /// A configured anchor, noise or label pattern did not compile.
    #[error("invalid pattern `{pattern}`: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("invalid configuration: {0}")]
    Config(#[from] toml::de::Error),

    #[error("invalid document: {0}")]
    Document(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ExtractError>;
