use crate::patterns::YEAR_TOKEN;
use std::collections::BTreeSet;

/// Offset from the two-digit token to the displayed era year.
pub const ERA_OFFSET: u32 = 100;

pub fn extract_years(text: &str) -> BTreeSet<u32> {
    YEAR_TOKEN
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .filter_map(|m| m.as_str().parse::<u32>().ok())
        .map(|y| y + ERA_OFFSET)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_years_in_window() {
        let years = extract_years("05 06 10 access");
        assert_eq!(years.into_iter().collect::<Vec<_>>(), vec![105, 106, 110]);
    }

    #[test]
    fn test_out_of_window() {
        assert!(extract_years("100 200").is_empty());
        assert!(extract_years("04 15 99").is_empty());
        assert!(extract_years("2010").is_empty());
    }

    #[test]
    fn test_duplicates_collapse() {
        let years = extract_years("14, 09, 14 [v.] 存取 09");
        assert_eq!(years.into_iter().collect::<Vec<_>>(), vec![109, 114]);
    }
}
