//! Filename sanitization for working-area artifacts and download headers

/// Substitute for any character unsafe in a path or header filename
pub const SAFE_SUBSTITUTE: char = '_';

/// Name used when nothing usable is left after sanitizing
pub const FALLBACK_NAME: &str = "document";

/// Longest sanitized name, in characters
pub const MAX_NAME_CHARS: usize = 128;

/// Make an identifier safe to use as a file name and in a
/// `Content-Disposition` filename
///
/// ASCII letters, digits, `-`, `_` and `.` are kept; everything else
/// (whitespace, path separators, quotes, non-ASCII) becomes `_`. Leading dots
/// are stripped so the result is never hidden or a relative path component.
/// The mapping is a pure function of the input.
pub fn sanitize_filename(input: &str) -> String {
    let mapped: String = input
        .chars()
        .take(MAX_NAME_CHARS)
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') {
                c
            } else {
                SAFE_SUBSTITUTE
            }
        })
        .collect();
    let trimmed = mapped.trim_start_matches('.');
    if trimmed.is_empty() {
        FALLBACK_NAME.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Derive the download base name from an EAD identifier
///
/// Mirrors how identifiers are stored: a trailing `.xml` is dropped, as is
/// any directory part.
pub fn download_name(identifier: &str) -> String {
    let base = identifier
        .trim()
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(identifier);
    let base = base.strip_suffix(".xml").unwrap_or(base);
    sanitize_filename(base)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spaces_replaced() {
        assert_eq!(sanitize_filename("coll 42"), "coll_42");
        assert_eq!(sanitize_filename("a\tb\nc"), "a_b_c");
    }

    #[test]
    fn test_unsafe_characters_replaced() {
        let out = sanitize_filename("../etc/pass\"wd;x=y\u{e9}");
        assert_eq!(out, "_etc_pass_wd_x_y_");
        assert!(!out.contains(['/', '"', ';', ' ']));
    }

    #[test]
    fn test_deterministic_and_fallback() {
        assert_eq!(sanitize_filename("coll 42"), sanitize_filename("coll 42"));
        assert_eq!(sanitize_filename(""), FALLBACK_NAME);
        assert_eq!(sanitize_filename("..."), FALLBACK_NAME);
        assert_eq!(sanitize_filename(".hidden"), "hidden");
    }

    #[test]
    fn test_length_capped() {
        assert_eq!(sanitize_filename(&"x".repeat(500)).len(), MAX_NAME_CHARS);
    }

    #[test]
    fn test_download_name() {
        assert_eq!(download_name("leverette135.xml"), "leverette135");
        assert_eq!(download_name("coll 42"), "coll_42");
        assert_eq!(download_name("/data/ead/abbey244.xml"), "abbey244");
    }
}
