//! Small shared helpers.

/// Parse a page range string like "1", "1-5", "1,3,5-10" into a list of page numbers.
pub fn parse_page_range(range_str: &str, max_pages: u32) -> Vec<u32> {
    let mut pages = Vec::new();

    for part in range_str.split(',') {
        let part = part.trim();
        if part.contains('-') {
            // Range like "1-5"
            let mut iter = part.split('-');
            let start: u32 = iter.next().and_then(|s| s.trim().parse().ok()).unwrap_or(1);
            let end: u32 = iter
                .next()
                .and_then(|s| s.trim().parse().ok())
                .unwrap_or(max_pages);
            for p in start..=end.min(max_pages) {
                if p >= 1 && !pages.contains(&p) {
                    pages.push(p);
                }
            }
        } else if let Ok(p) = part.parse::<u32>() {
            if p >= 1 && p <= max_pages && !pages.contains(&p) {
                pages.push(p);
            }
        }
    }

    pages.sort();
    pages
}

/// Truncate a string for display, appending an ellipsis when shortened.
pub fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        return s.to_string();
    }
    let truncated: String = s.chars().take(max_chars.saturating_sub(1)).collect();
    format!("{}…", truncated)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_single_page() {
        assert_eq!(parse_page_range("3", 10), vec![3]);
    }

    #[test]
    fn test_parse_range() {
        assert_eq!(parse_page_range("1-4", 10), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_parse_mixed() {
        assert_eq!(parse_page_range("1,3,5-7", 10), vec![1, 3, 5, 6, 7]);
    }

    #[test]
    fn test_parse_clamps_to_max() {
        assert_eq!(parse_page_range("8-20", 10), vec![8, 9, 10]);
        assert_eq!(parse_page_range("15", 10), Vec::<u32>::new());
    }

    #[test]
    fn test_parse_deduplicates() {
        assert_eq!(parse_page_range("2,2,1-3", 10), vec![1, 2, 3]);
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a longer string", 8), "a longe…");
    }
}
