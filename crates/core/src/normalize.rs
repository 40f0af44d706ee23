//! Whitespace normalization for text pulled out of HTML.
//!
//! Markup text runs carry the source file's indentation and line breaks.
//! Slides want a single line per block, so every run of whitespace is
//! collapsed to one space and the ends are trimmed.

use regex::Regex;
use std::sync::LazyLock;

/// Regex matching any run of whitespace, line breaks included.
static WHITESPACE_RUN_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Text normalizer for extracted markup text.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextNormalizer;

impl TextNormalizer {
    /// Create a new text normalizer.
    pub fn new() -> Self {
        Self
    }

    /// Collapse whitespace runs to single spaces and trim both ends.
    ///
    /// Empty or whitespace-only input yields an empty string.
    pub fn normalize(&self, text: &str) -> String {
        WHITESPACE_RUN_REGEX
            .replace_all(text, " ")
            .trim()
            .to_string()
    }

    /// Normalize and drop the result if nothing is left.
    pub fn normalize_non_empty(&self, text: &str) -> Option<String> {
        let normalized = self.normalize(text);
        if normalized.is_empty() {
            None
        } else {
            Some(normalized)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapse_whitespace() {
        let normalizer = TextNormalizer::new();

        assert_eq!(normalizer.normalize("Hello    world"), "Hello world");
        assert_eq!(normalizer.normalize("  Hello  "), "Hello");
        assert_eq!(normalizer.normalize("\t\tHello\t\t"), "Hello");
    }

    #[test]
    fn test_line_breaks_become_spaces() {
        let normalizer = TextNormalizer::new();

        assert_eq!(
            normalizer.normalize("Line one\nLine two\r\n  Line three"),
            "Line one Line two Line three"
        );
    }

    #[test]
    fn test_empty_and_blank_input() {
        let normalizer = TextNormalizer::new();

        assert_eq!(normalizer.normalize(""), "");
        assert_eq!(normalizer.normalize(" \n\t "), "");
        assert_eq!(normalizer.normalize_non_empty(" \n "), None);
        assert_eq!(
            normalizer.normalize_non_empty(" x "),
            Some("x".to_string())
        );
    }

    #[test]
    fn test_no_double_spaces_or_edge_whitespace() {
        let normalizer = TextNormalizer::new();
        let inputs = [
            "a\t\tb\n\nc",
            "\n  leading and trailing \t",
            "mixed \u{a0}\u{a0} non-breaking",
            "  many     spaces   here  ",
            "\r\n\r\nwindows\r\nbreaks\r\n",
        ];

        for input in inputs {
            let out = normalizer.normalize(input);
            assert!(!out.contains("  "), "double space in {:?}", out);
            assert_eq!(out, out.trim(), "untrimmed output {:?}", out);
            assert!(!out.contains('\n') && !out.contains('\t'));
        }
    }

    #[test]
    fn test_text_content_passes_through() {
        let normalizer = TextNormalizer::new();

        assert_eq!(normalizer.normalize("  精度 は 92% です "), "精度 は 92% です");
        assert_eq!(normalizer.normalize("Don't — stop!"), "Don't — stop!");
    }
}
