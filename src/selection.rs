use crate::record::VocabularyRecord;
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::ops::RangeInclusive;

pub const DEFAULT_PAGE_SIZE: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FrequencyBand {
    High,
    Medium,
    Low,
}

impl FrequencyBand {
    pub fn range(&self) -> RangeInclusive<u32> {
        match self {
            FrequencyBand::High => 8..=10,
            FrequencyBand::Medium => 4..=7,
            FrequencyBand::Low => 1..=3,
        }
    }

    pub fn contains(&self, frequency: u32) -> bool {
        self.range().contains(&frequency)
    }
}

/// Filter over a record set. Empty fields filter nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Selection {
    pub bands: Vec<FrequencyBand>,
    pub initial: Option<char>,
    pub year: Option<u32>,
}

impl Selection {
    /// Apply the filters in order. Frequency bands are ignored when no
    /// record carries a count, since every frequency is then "unknown".
    pub fn apply<'a>(&self, records: &'a [VocabularyRecord]) -> Vec<&'a VocabularyRecord> {
        let has_counts = records.iter().any(|r| r.frequency > 0);
        let initial = self.initial.and_then(|c| c.to_uppercase().next());

        records
            .iter()
            .filter(|r| {
                !has_counts
                    || self.bands.is_empty()
                    || self.bands.iter().any(|band| band.contains(r.frequency))
            })
            .filter(|r| initial.is_none_or(|c| r.initial() == Some(c)))
            .filter(|r| self.year.is_none_or(|y| r.years.contains(&y)))
            .collect()
    }
}

/// Sorted distinct uppercase initials.
pub fn initial_letters(records: &[VocabularyRecord]) -> Vec<char> {
    records
        .iter()
        .filter_map(VocabularyRecord::initial)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

pub fn all_years(records: &[VocabularyRecord]) -> Vec<u32> {
    records
        .iter()
        .flat_map(|r| r.years.iter().copied())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Number of selectable pages; always at least one.
pub fn page_count(total: usize, page_size: usize) -> usize {
    total / page_size.max(1) + 1
}

/// 1-based page of `records`; out-of-range pages are empty.
pub fn page<T>(records: &[T], page_number: usize, page_size: usize) -> &[T] {
    let page_size = page_size.max(1);
    let start = page_number.saturating_sub(1).saturating_mul(page_size);
    if start >= records.len() {
        return &[];
    }
    let end = (start + page_size).min(records.len());
    &records[start..end]
}

/// At most `n` records in random order; everything when there are fewer.
pub fn sample<'a, R: Rng + ?Sized>(
    records: &[&'a VocabularyRecord],
    n: usize,
    rng: &mut R,
) -> Vec<&'a VocabularyRecord> {
    if records.len() <= n {
        return records.to_vec();
    }
    records.choose_multiple(rng, n).copied().collect()
}
