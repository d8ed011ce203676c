//! Page strategy selection.
//!
//! Strategies are tried in configured order. A table strategy wins as soon as
//! the extractor returns a table with rows for the page, even if no row in it
//! becomes a record. A line strategy wins only when it emits a record, so the
//! degraded harvest still gets its turn after an empty line scan.

use crate::builder::{PageContext, RecordBuilder};
use crate::error::Result;
use crate::record::VocabularyRecord;
use crate::source::{DocumentSource, Table, TableSettings};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    GridTable,
    StreamTable,
    LineScan,
    DegradedHarvest,
}

impl Strategy {
    pub const ALL: [Strategy; 4] = [
        Strategy::GridTable,
        Strategy::StreamTable,
        Strategy::LineScan,
        Strategy::DegradedHarvest,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::GridTable => "grid_table",
            Strategy::StreamTable => "stream_table",
            Strategy::LineScan => "line_scan",
            Strategy::DegradedHarvest => "degraded_harvest",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of one page: the strategy that won (if any) and its records.
#[derive(Debug, Default)]
pub struct PageRun {
    pub strategy: Option<Strategy>,
    pub records: Vec<VocabularyRecord>,
}

pub struct StrategySelector<'a> {
    builder: &'a RecordBuilder,
    order: &'a [Strategy],
    stream_tolerance: f64,
}

impl<'a> StrategySelector<'a> {
    pub fn new(builder: &'a RecordBuilder, order: &'a [Strategy], stream_tolerance: f64) -> Self {
        Self {
            builder,
            order,
            stream_tolerance,
        }
    }

    /// Run the fallback chain over page `index` whose text is `text`.
    pub fn run_page<D: DocumentSource + ?Sized>(
        &self,
        doc: &D,
        index: usize,
        text: &str,
        frequency: u32,
    ) -> Result<PageRun> {
        for &strategy in self.order {
            let records = match strategy {
                Strategy::GridTable | Strategy::StreamTable => {
                    let settings = match strategy {
                        Strategy::GridTable => TableSettings::grid(),
                        _ => TableSettings::stream(self.stream_tolerance),
                    };
                    let tables = doc.page_tables(index, &settings)?;
                    if tables.iter().all(Vec::is_empty) {
                        log::debug!("page {}: {strategy} found no table rows", index + 1);
                        continue;
                    }
                    self.scan_tables(&tables, frequency)
                }
                Strategy::LineScan | Strategy::DegradedHarvest => {
                    let records = self.scan_lines(strategy, text, frequency);
                    if records.is_empty() {
                        log::debug!("page {}: {strategy} produced nothing", index + 1);
                        continue;
                    }
                    records
                }
            };

            log::debug!(
                "page {}: {strategy} produced {} records",
                index + 1,
                records.len()
            );
            return Ok(PageRun {
                strategy: Some(strategy),
                records,
            });
        }

        Ok(PageRun::default())
    }

    /// Row mode over every table on the page; the pending word may carry
    /// from the last row of one table into the next table of the same page.
    fn scan_tables(&self, tables: &[Table], frequency: u32) -> Vec<VocabularyRecord> {
        let mut ctx = PageContext::new(frequency);
        let mut records = Vec::new();
        for table in tables {
            for raw_row in table {
                let cells: Vec<String> = raw_row
                    .iter()
                    .map(|cell| cell.as_deref().map(|c| self.builder.clean(c)).unwrap_or_default())
                    .collect();
                if let Some(record) = self.builder.build_row(&cells, &mut ctx) {
                    records.push(record);
                }
            }
        }
        records
    }

    fn scan_lines(&self, strategy: Strategy, text: &str, frequency: u32) -> Vec<VocabularyRecord> {
        let lines: Vec<String> = text
            .lines()
            .map(|line| self.builder.clean(line))
            .filter(|line| !line.is_empty())
            .collect();

        let mut ctx = PageContext::new(frequency);
        (0..lines.len())
            .filter_map(|i| match strategy {
                Strategy::DegradedHarvest => self.builder.harvest_line(&lines, i, &mut ctx),
                _ => self.builder.build_line(&lines, i, &mut ctx),
            })
            .collect()
    }
}
