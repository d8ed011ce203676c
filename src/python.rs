use pyo3::prelude::*;

use crate::config::ParserConfig;
use crate::parser::{DocumentParser, ParseOutcome};
use crate::record::VocabularyRecord;
use crate::source::MemoryDocument;

/// Vocabulary record returned to Python
#[pyclass]
#[derive(Clone)]
struct VocabRecord {
    #[pyo3(get)]
    word: String,
    #[pyo3(get)]
    definition: String,
    #[pyo3(get)]
    frequency: u32,
    #[pyo3(get)]
    years: Vec<u32>,
    #[pyo3(get)]
    year_str: String,
}

impl From<VocabularyRecord> for VocabRecord {
    fn from(record: VocabularyRecord) -> Self {
        let year_str = record.year_label();
        Self {
            word: record.word,
            definition: record.definition,
            frequency: record.frequency,
            years: record.years.into_iter().collect(),
            year_str,
        }
    }
}

fn build_parser(config_toml: Option<String>) -> PyResult<DocumentParser> {
    let config = match config_toml {
        Some(text) => ParserConfig::from_toml_str(&text)
            .map_err(|e| pyo3::exceptions::PyValueError::new_err(e.to_string()))?,
        None => ParserConfig::default(),
    };
    DocumentParser::new(config).map_err(|e| pyo3::exceptions::PyValueError::new_err(e.to_string()))
}

fn into_python(outcome: ParseOutcome) -> (Vec<VocabRecord>, Vec<String>) {
    let logs = outcome.trace.lines();
    let records = outcome.records.into_iter().map(VocabRecord::from).collect();
    (records, logs)
}

/// Parse a document serialized as JSON by the host extractor
/// Returns: (records, debug_logs)
#[pyfunction]
#[pyo3(signature = (document_json, config_toml=None))]
fn parse_document_json(
    document_json: String,
    config_toml: Option<String>,
) -> PyResult<(Vec<VocabRecord>, Vec<String>)> {
    let parser = build_parser(config_toml)?;
    let outcome = match MemoryDocument::from_json_str(&document_json) {
        Ok(doc) => parser.parse(&doc),
        Err(e) => return Ok((Vec::new(), vec![e.to_string()])),
    };
    Ok(into_python(outcome))
}

/// Parse a JSON document file
/// Returns: (records, debug_logs)
#[pyfunction]
#[pyo3(signature = (file_path, config_toml=None))]
fn parse_document_file(
    file_path: String,
    config_toml: Option<String>,
) -> PyResult<(Vec<VocabRecord>, Vec<String>)> {
    let parser = build_parser(config_toml)?;
    Ok(into_python(parser.parse_path(&file_path)))
}

/// Parse several JSON document files in parallel
#[pyfunction]
#[pyo3(signature = (file_paths, config_toml=None))]
fn parse_document_files_batch(
    file_paths: Vec<String>,
    config_toml: Option<String>,
) -> PyResult<Vec<(Vec<VocabRecord>, Vec<String>)>> {
    let parser = build_parser(config_toml)?;
    Ok(parser
        .parse_paths_batch(&file_paths)
        .into_iter()
        .map(into_python)
        .collect())
}

#[pyfunction]
fn extract_years(text: String) -> Vec<u32> {
    crate::years::extract_years(&text).into_iter().collect()
}

#[pyfunction]
fn extract_frequency(page_text: String) -> u32 {
    crate::frequency::extract_frequency(&page_text)
}

/// Check whether a line is structural noise under the default markers
#[pyfunction]
fn is_noise(text: String) -> bool {
    crate::noise::is_noise(&text)
}

#[pymodule]
fn rust_vocab_extract(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(parse_document_json, m)?)?;
    m.add_function(wrap_pyfunction!(parse_document_file, m)?)?;
    m.add_function(wrap_pyfunction!(parse_document_files_batch, m)?)?;
    m.add_function(wrap_pyfunction!(extract_years, m)?)?;
    m.add_function(wrap_pyfunction!(extract_frequency, m)?)?;
    m.add_function(wrap_pyfunction!(is_noise, m)?)?;
    m.add_class::<VocabRecord>()?;
    Ok(())
}
