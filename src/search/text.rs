// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Text normalization for extracted titles and snippets
//!
//! All functions are pure and total. Lengths are counted in characters.

use regex::Regex;
use std::sync::OnceLock;

/// Snippet used when a result has no usable description
pub const FALLBACK_SNIPPET: &str = "No description available.";

/// Marker appended by [`truncate_text`]
pub const TRUNCATION_SUFFIX: &str = "...";

/// Longest snippet kept per result
pub const MAX_SNIPPET_CHARS: usize = 500;

/// Trailing boilerplate the engine appends to snippets
const SNIPPET_ARTIFACT_PATTERNS: &[&str] = &[
    // "... Jump to Installation" style in-page navigation
    r"\s*Jump to\b.*$",
    // "... | Site Name | Docs" trailing navigation fragments
    r"\s*\|.*$",
];

fn snippet_artifacts() -> &'static [Regex] {
    static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        SNIPPET_ARTIFACT_PATTERNS
            .iter()
            .filter_map(|p| Regex::new(p).ok())
            .collect()
    })
}

/// Collapse runs of whitespace into single spaces and trim
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Remove `<...>` tag markup, leaving an unterminated `<` untouched
pub fn strip_html_tags(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(open) = rest.find('<') {
        match rest[open..].find('>') {
            Some(close) => {
                out.push_str(&rest[..open]);
                rest = &rest[open + close + 1..];
            }
            None => break,
        }
    }
    out.push_str(rest);
    out
}

/// Drop control characters other than tab, newline and carriage return, then trim
pub fn sanitize_text(text: &str) -> String {
    text.chars()
        .filter(|&c| !is_stripped_control(c))
        .collect::<String>()
        .trim()
        .to_string()
}

fn is_stripped_control(c: char) -> bool {
    matches!(c, '\u{00}'..='\u{08}' | '\u{0B}' | '\u{0C}' | '\u{0E}'..='\u{1F}' | '\u{7F}')
}

/// Truncate to `max_chars`, replacing the tail with `suffix` when cut
///
/// When `max_chars` is too small to hold the suffix the text is cut hard
/// without one.
pub fn truncate_text(text: &str, max_chars: usize, suffix: &str) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }

    let suffix_len = suffix.chars().count();
    if max_chars <= suffix_len {
        return text.chars().take(max_chars).collect();
    }

    let kept: String = text.chars().take(max_chars - suffix_len).collect();
    format!("{}{}", kept.trim_end(), suffix)
}

/// Normalize snippet text and strip trailing engine artifacts
pub fn clean_snippet(snippet: &str) -> String {
    let mut cleaned = normalize_whitespace(&sanitize_text(snippet));
    for pattern in snippet_artifacts() {
        cleaned = pattern.replace(&cleaned, "").into_owned();
    }
    cleaned.trim().to_string()
}

/// Clean a snippet and bound its length
pub fn prepare_snippet(snippet: &str) -> String {
    truncate_text(&clean_snippet(snippet), MAX_SNIPPET_CHARS, TRUNCATION_SUFFIX)
}

/// Normalize a title or other single-line field
pub fn normalize_field(text: &str) -> String {
    normalize_whitespace(&sanitize_text(text))
}

pub fn is_empty_text(text: &str) -> bool {
    text.trim().is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_normalize_whitespace() {
        assert_eq!(normalize_whitespace("  hello \n\t  world  "), "hello world");
        assert_eq!(normalize_whitespace(""), "");
        assert_eq!(normalize_whitespace("\u{a0}nbsp\u{a0}"), "nbsp");
    }

    #[test]
    fn test_strip_html_tags() {
        assert_eq!(strip_html_tags("<b>bold</b> text"), "bold text");
        assert_eq!(strip_html_tags("a < b"), "a < b");
        assert_eq!(strip_html_tags("x<br/>y<"), "xy<");
    }

    #[test]
    fn test_sanitize_text() {
        assert_eq!(sanitize_text("\u{0}abc\u{7}\u{7f}  "), "abc");
        assert_eq!(sanitize_text("line\nbreak\ttab"), "line\nbreak\ttab");
    }

    #[test]
    fn test_truncate_text() {
        assert_eq!(truncate_text("short", 10, "..."), "short");
        assert_eq!(truncate_text("hello world", 8, "..."), "hello...");
        assert_eq!(truncate_text("hello world", 2, "..."), "he");
        // multi-byte characters are counted, not bytes
        assert_eq!(truncate_text("ééééé", 4, "…"), "ééé…");
    }

    #[test]
    fn test_clean_snippet_strips_artifacts() {
        assert_eq!(
            clean_snippet("Install Rust today.   Jump to Downloads"),
            "Install Rust today."
        );
        assert_eq!(
            clean_snippet("The Rust book | rust-lang.org | Docs"),
            "The Rust book"
        );
        assert_eq!(clean_snippet("  plain\n snippet "), "plain snippet");
        assert_eq!(clean_snippet("| only navigation"), "");
    }

    #[test]
    fn test_clean_snippet_keeps_lowercase_jump_to() {
        let prose = "Learn how to jump to definition in your editor, with examples.";
        assert_eq!(clean_snippet(prose), prose);
        assert_eq!(
            clean_snippet("Learn how to jump to definition. Jump to Examples"),
            "Learn how to jump to definition."
        );
    }

    #[test]
    fn test_prepare_snippet_bounds_length() {
        let long = "word ".repeat(400);
        let prepared = prepare_snippet(&long);
        assert!(prepared.chars().count() <= MAX_SNIPPET_CHARS);
        assert!(prepared.ends_with(TRUNCATION_SUFFIX));
    }

    #[test]
    fn test_is_empty_text() {
        assert!(is_empty_text(""));
        assert!(is_empty_text(" \n\t"));
        assert!(!is_empty_text(" a "));
    }

    proptest! {
        #[test]
        fn prop_normalized_text_has_no_runs(input in "\\PC{0,80}") {
            let out = normalize_whitespace(&input);
            prop_assert!(!out.contains("  "));
            prop_assert_eq!(out.trim(), out.as_str());
        }

        #[test]
        fn prop_truncate_respects_limit(input in "\\PC{0,120}", max in 3usize..60) {
            let out = truncate_text(&input, max, TRUNCATION_SUFFIX);
            prop_assert!(out.chars().count() <= max);
        }
    }
}
