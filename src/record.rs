use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct VocabularyRecord {
    pub word: String,
    pub definition: String,
    /// Occurrence count from the page header; 0 means unknown.
    pub frequency: u32,
    pub years: BTreeSet<u32>,
}

impl VocabularyRecord {
    /// Years for display, e.g. `"105, 110"`, or `"-"` when none.
    pub fn year_label(&self) -> String {
        if self.years.is_empty() {
            return "-".to_string();
        }
        self.years
            .iter()
            .map(u32::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Uppercased first character of the word.
    pub fn initial(&self) -> Option<char> {
        self.word.chars().next().and_then(|c| c.to_uppercase().next())
    }
}

/// Keep the first record of each word (case-sensitive), preserving order.
pub fn dedup_first_seen(records: Vec<VocabularyRecord>) -> Vec<VocabularyRecord> {
    let mut seen: HashSet<String> = HashSet::new();
    records
        .into_iter()
        .filter(|record| seen.insert(record.word.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(word: &str, definition: &str, years: &[u32]) -> VocabularyRecord {
        VocabularyRecord {
            word: word.to_string(),
            definition: definition.to_string(),
            frequency: 0,
            years: years.iter().copied().collect(),
        }
    }

    #[test]
    fn test_year_label() {
        assert_eq!(record("access", "[n.] 通道", &[110, 105]).year_label(), "105, 110");
        assert_eq!(record("access", "[n.] 通道", &[]).year_label(), "-");
    }

    #[test]
    fn test_dedup_first_seen() {
        let records = vec![
            record("access", "first", &[105]),
            record("Access", "capitalized", &[]),
            record("access", "second", &[110]),
            record("apple", "fruit", &[]),
        ];
        let kept = dedup_first_seen(records);
        let words: Vec<_> = kept.iter().map(|r| r.definition.as_str()).collect();
        assert_eq!(words, vec!["first", "capitalized", "fruit"]);
    }

    #[test]
    fn test_serialized_keys() {
        let json = serde_json::to_value(record("access", "[n.] 通道", &[105])).unwrap();
        assert_eq!(json["Word"], "access");
        assert_eq!(json["Definition"], "[n.] 通道");
        assert_eq!(json["Frequency"], 0);
        assert_eq!(json["Years"], serde_json::json!([105]));
    }
}
