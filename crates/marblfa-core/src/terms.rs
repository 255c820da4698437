//! Free-text search term normalization

use std::sync::OnceLock;

use regex::Regex;

fn whitespace_re() -> &'static Regex {
    static WHITESPACE_RE: OnceLock<Regex> = OnceLock::new();
    WHITESPACE_RE.get_or_init(|| Regex::new(r"\s+").unwrap())
}

/// Collapse whitespace runs to a single space and trim both ends
pub fn normalize(input: &str) -> String {
    whitespace_re().replace_all(input, " ").trim().to_string()
}

/// Split a free-text query into terms
///
/// Never yields empty terms; an all-whitespace input yields none.
pub fn split_terms(input: &str) -> Vec<String> {
    let normalized = normalize(input);
    if normalized.is_empty() {
        return Vec::new();
    }
    normalized.split(' ').map(str::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapse_and_trim() {
        assert_eq!(normalize("  irish \t drama\n\n theatre "), "irish drama theatre");
        assert_eq!(
            split_terms("  irish \t drama\n\n theatre "),
            vec!["irish", "drama", "theatre"]
        );
    }

    #[test]
    fn test_blank_input_has_no_terms() {
        assert!(split_terms("").is_empty());
        assert!(split_terms(" \t\n ").is_empty());
    }

    #[test]
    fn test_normalize_is_idempotent() {
        for input in ["", " a ", "a  b", "\ta\u{a0}b \r\n c", "already normal"] {
            let once = normalize(input);
            assert_eq!(normalize(&once), once);
            assert!(split_terms(&once).iter().all(|t| !t.is_empty()));
            assert_eq!(split_terms(&once), split_terms(input));
        }
    }
}
