//! Fuzzy title matching on top of the SQL substring search.
//!
//! The database narrows candidates with `LIKE %q%`. A hit is then kept only
//! when the query covers enough of the title, so that one-letter queries do
//! not return the whole catalog.

/// Query length as a percentage of title length, in characters.
///
/// Returns `None` for an empty title.
#[must_use]
pub fn match_ratio(query: &str, title: &str) -> Option<f64> {
    let title_len = title.chars().count();
    if title_len == 0 {
        return None;
    }
    #[allow(clippy::cast_precision_loss)]
    let ratio = query.chars().count() as f64 / title_len as f64 * 100.0;
    Some(ratio)
}

/// An empty query matches every title.
#[must_use]
pub fn passes_ratio(query: &str, title: &str, min_ratio: f64) -> bool {
    if query.is_empty() {
        return true;
    }
    match_ratio(query, title).is_some_and(|ratio| ratio >= min_ratio)
}

/// Keeps the items whose title passes [`passes_ratio`], preserving order.
pub fn filter_matches<T>(
    items: Vec<T>,
    query: &str,
    min_ratio: f64,
    title: impl Fn(&T) -> &str,
) -> Vec<T> {
    if query.is_empty() {
        return items;
    }
    items
        .into_iter()
        .filter(|item| passes_ratio(query, title(item), min_ratio))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ratio_threshold() {
        assert!(passes_ratio("Bat", "Batman", 40.0));
        assert!(!passes_ratio("B", "Batman", 40.0));
        assert!(passes_ratio("Batman", "Batman", 40.0));
    }

    #[test]
    fn test_ratio_counts_characters() {
        // 2 of 5 characters, not bytes
        let ratio = match_ratio("日本", "日本映画祭").unwrap();
        assert!((ratio - 40.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_title_never_matches() {
        assert_eq!(match_ratio("a", ""), None);
        assert!(!passes_ratio("a", "", 0.0));
    }

    #[test]
    fn test_empty_query_keeps_everything() {
        let titles = vec!["Up", "", "The Long Night"];
        assert_eq!(filter_matches(titles.clone(), "", 40.0, |t| t), titles);
    }

    #[test]
    fn test_filter_preserves_order() {
        let titles = vec!["Bats", "Batman Begins", "Bat", "Combat"];
        let kept = filter_matches(titles, "Bat", 40.0, |t| t);
        assert_eq!(kept, vec!["Bats", "Bat", "Combat"]);
    }
}
