// Fixed parts of the row grammar.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Pure English word: letters plus space, hyphen, period and both apostrophes
    pub static ref STRICT_WORD: Regex = Regex::new(r"^[A-Za-z\s\-.'’]+$").unwrap();

    // Looser form used when looking left of / above a definition
    pub static ref LOOKBACK_WORD: Regex = Regex::new(r"^[A-Za-z\s\-.'’0-9]+$").unwrap();

    // "08 09", "10~7", "12"
    pub static ref NUMERIC_ONLY: Regex = Regex::new(r"^[\d\s~]+$").unwrap();

    pub static ref CJK: Regex = Regex::new(r"[\x{4e00}-\x{9fff}]").unwrap();

    // Two-digit exam years 05-14
    pub static ref YEAR_TOKEN: Regex = Regex::new(r"\b(0[5-9]|1[0-4])\b").unwrap();

    pub static ref LEADING_WORD: Regex = Regex::new(r"^[A-Za-z][A-Za-z'’\-]*").unwrap();

    // Column gap in a text-stream line
    pub static ref CELL_GAP: Regex = Regex::new(r"\t+|\s{2,}").unwrap();
}

/// True for text made only of digits, whitespace and `~`.
pub fn is_numeric_only(text: &str) -> bool {
    NUMERIC_ONLY.is_match(text)
}

pub fn has_cjk(text: &str) -> bool {
    CJK.is_match(text)
}

/// Character length after trimming, which is what the word rules count.
pub fn trimmed_len(text: &str) -> usize {
    text.trim().chars().count()
}

/// Split a plain text line into pseudo-cells at column gaps.
pub fn split_stream_line(line: &str) -> Vec<String> {
    CELL_GAP
        .split(line.trim())
        .map(str::trim)
        .filter(|cell| !cell.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_word_patterns() {
        assert!(STRICT_WORD.is_match("access"));
        assert!(STRICT_WORD.is_match("a.m."));
        assert!(STRICT_WORD.is_match("o’clock"));
        assert!(STRICT_WORD.is_match("give up"));
        assert!(!STRICT_WORD.is_match("access 05"));
        assert!(!STRICT_WORD.is_match("通道"));

        assert!(LOOKBACK_WORD.is_match("access 05"));
        assert!(is_numeric_only("08 09 10"));
        assert!(is_numeric_only("10~7"));
        assert!(!is_numeric_only("access"));
    }

    #[test]
    fn test_cjk_detection() {
        assert!(has_cjk("[n.] 通道"));
        assert!(!has_cjk("[n.] access"));
    }

    #[test]
    fn test_split_stream_line() {
        assert_eq!(
            split_stream_line("  access    [n.] 通道\t05 06 "),
            vec!["access", "[n.] 通道", "05 06"]
        );
        assert_eq!(split_stream_line("apple [n.] 蘋果"), vec!["apple [n.] 蘋果"]);
        assert!(split_stream_line("   ").is_empty());
    }
}
