// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! CSS selector candidates for result page parsing
//!
//! Each field lists its candidates in priority order. The result page markup
//! changes without notice, so new layouts are handled by adding candidates
//! here rather than branching in the extractor.

/// Ordered selector candidates for every extracted field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectorSet {
    /// Result containers; the first candidate with any match is used
    pub containers: &'static [&'static str],
    pub title: &'static [&'static str],
    /// Anchors whose `href` carries the result link
    pub url: &'static [&'static str],
    pub snippet: &'static [&'static str],
}

/// Selectors for DuckDuckGo's HTML endpoint
pub const DUCKDUCKGO_SELECTORS: SelectorSet = SelectorSet {
    containers: &[
        ".web-result",
        ".result",
        // news layout
        ".web-result.result--news",
    ],
    title: &["a.result__a", "h2 a", "h3 a", "a"],
    url: &["a.result__a", "h2 a", "h3 a", "a"],
    snippet: &[".result__snippet", ".snippet", "p"],
};
