//! Planet name search.

/// Names containing `query`, case-insensitively, after trimming both sides.
///
/// Matches are ordered by name length in characters, shortest first, with ties kept in
/// their original order. An empty query returns every name unchanged.
pub fn search_planets<'a, S: AsRef<str>>(names: &'a [S], query: &str) -> Vec<&'a str> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return names.iter().map(AsRef::as_ref).collect();
    }

    let mut matches: Vec<&str> = names
        .iter()
        .map(AsRef::as_ref)
        .filter(|name| name.trim().to_lowercase().contains(&needle))
        .collect();
    matches.sort_by_key(|name| name.chars().count());
    matches
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names() -> Vec<String> {
        ["Kepler-1649 c", "Kepler-22 b", "TRAPPIST-1 e", "kepler-7 b", "HD 209458 b"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    #[test]
    fn test_case_insensitive_sorted_by_length() {
        let names = names();
        assert_eq!(
            search_planets(&names, "  KEPLER "),
            vec!["kepler-7 b", "Kepler-22 b", "Kepler-1649 c"]
        );
    }

    #[test]
    fn test_ties_keep_original_order() {
        let names = ["bb x", "aa x", "c x"];
        assert_eq!(search_planets(&names, "x"), vec!["c x", "bb x", "aa x"]);
    }

    #[test]
    fn test_length_counts_characters() {
        // "Gliese-é b" is 11 bytes but 10 characters
        let names = ["Gliese-1 bc", "Gliese-é b"];
        assert_eq!(
            search_planets(&names, "gliese"),
            vec!["Gliese-é b", "Gliese-1 bc"]
        );
    }

    #[test]
    fn test_empty_query_returns_all() {
        let names = names();
        assert_eq!(search_planets(&names, "   ").len(), names.len());
        assert_eq!(search_planets(&names, "")[0], "Kepler-1649 c");
    }

    #[test]
    fn test_no_match() {
        assert!(search_planets(&names(), "Tatooine").is_empty());
    }
}
