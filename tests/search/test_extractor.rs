// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
// Extraction against a full result page

use super::fixtures::{NO_RESULTS_PAGE, RESULTS_PAGE};
use web_search_mcp::search::text::FALLBACK_SNIPPET;
use web_search_mcp::search::HtmlExtractor;

#[test]
fn test_ads_are_skipped_and_order_is_kept() {
    let results = HtmlExtractor::extract(RESULTS_PAGE, 10);

    let urls: Vec<&str> = results.iter().map(|r| r.url.as_str()).collect();
    assert_eq!(
        urls,
        vec![
            "https://doc.rust-lang.org/book/ch04-01-what-is-ownership.html",
            "https://en.wikipedia.org/wiki/Rust_(programming_language)",
            "https://blog.example.org/borrowing",
        ]
    );
    assert!(results.iter().all(|r| !r.url.contains("duckduckgo.com")));
}

#[test]
fn test_fields_are_cleaned() {
    let results = HtmlExtractor::extract(RESULTS_PAGE, 10);

    assert_eq!(
        results[0].title,
        "What is Ownership? - The Rust Programming Language"
    );
    assert_eq!(
        results[0].snippet,
        "Ownership is a set of rules that govern how a Rust program manages memory."
    );
    assert_eq!(
        results[1].snippet,
        "Rust is a general-purpose programming language."
    );
    assert_eq!(results[2].snippet, FALLBACK_SNIPPET);
}

#[test]
fn test_max_results_bounds_output() {
    let results = HtmlExtractor::extract(RESULTS_PAGE, 2);
    assert_eq!(results.len(), 2);
    assert_eq!(results[1].title, "Rust (programming language) - Wikipedia");

    assert!(HtmlExtractor::extract(RESULTS_PAGE, 0).is_empty());
}

#[test]
fn test_no_results_page() {
    assert!(HtmlExtractor::extract(NO_RESULTS_PAGE, 10).is_empty());
}

#[test]
fn test_malformed_html_does_not_panic() {
    let html = r#"<div class="web-result"><a class="result__a" href="https://ok.example/">Unclosed <b>tags"#;
    let results = HtmlExtractor::extract(html, 10);
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].url, "https://ok.example/");
}

#[test]
fn test_foreign_redirect_path_is_not_unwrapped() {
    let html = r#"<div class="result"><a class="result__a" href="https://tracker.example/l/?uddg=https%3A%2F%2Fbank.example%2F">Tracker page</a></div>"#;
    let results = HtmlExtractor::extract(html, 10);
    assert_eq!(results.len(), 1);
    assert_eq!(
        results[0].url,
        "https://tracker.example/l/?uddg=https%3A%2F%2Fbank.example%2F"
    );
}
