// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Selector-based result extraction
//!
//! Turns a result page into an ordered list of [`SearchResult`]s by walking
//! the [`SelectorSet`] candidates for each field. Extraction is a single
//! synchronous pass; the parsed document never outlives the call.

use scraper::{ElementRef, Html, Selector};
use tracing::{debug, warn};

use super::selectors::{SelectorSet, DUCKDUCKGO_SELECTORS};
use super::text::{normalize_field, prepare_snippet, FALLBACK_SNIPPET};
use super::types::SearchResult;
use super::url::{decode_redirect, is_valid_result_url, ENGINE_DOMAIN};

/// Stateless HTML result extractor
pub struct HtmlExtractor;

impl HtmlExtractor {
    /// Extract up to `max_results` results from a DuckDuckGo result page
    pub fn extract(html: &str, max_results: usize) -> Vec<SearchResult> {
        Self::extract_with(html, max_results, &DUCKDUCKGO_SELECTORS, ENGINE_DOMAIN)
    }

    /// Extract with an explicit selector set and engine domain
    ///
    /// Returns an empty list when no container selector matches or no
    /// container yields both a title and a valid URL.
    pub fn extract_with(
        html: &str,
        max_results: usize,
        selectors: &SelectorSet,
        engine_domain: &str,
    ) -> Vec<SearchResult> {
        let document = Html::parse_document(html);
        let fields = CompiledFields::compile(selectors);

        debug!(html_len = html.len(), max_results, "Parsing result page");

        let Some((selector, containers)) = find_containers(&document, selectors.containers) else {
            warn!(html_len = html.len(), "No result containers found");
            return Vec::new();
        };

        let mut results = Vec::new();
        for container in &containers {
            if results.len() >= max_results {
                break;
            }
            if let Some(result) = fields.extract(container, engine_domain) {
                results.push(result);
            }
        }

        debug!(
            selector,
            containers = containers.len(),
            results = results.len(),
            "Extracted search results"
        );

        results
    }
}

/// Apply container candidates in order; the first one with any match wins
fn find_containers<'a>(
    document: &'a Html,
    candidates: &[&'static str],
) -> Option<(&'static str, Vec<ElementRef<'a>>)> {
    candidates.iter().find_map(|&candidate| {
        let selector = parse_selector(candidate)?;
        let matched: Vec<ElementRef<'a>> = document.select(&selector).collect();
        (!matched.is_empty()).then_some((candidate, matched))
    })
}

fn parse_selector(candidate: &str) -> Option<Selector> {
    match Selector::parse(candidate) {
        Ok(selector) => Some(selector),
        Err(e) => {
            warn!(selector = candidate, error = %e, "Skipping invalid selector");
            None
        }
    }
}

fn compile(candidates: &[&str]) -> Vec<Selector> {
    candidates.iter().filter_map(|c| parse_selector(c)).collect()
}

struct CompiledFields {
    title: Vec<Selector>,
    url: Vec<Selector>,
    snippet: Vec<Selector>,
}

impl CompiledFields {
    fn compile(set: &SelectorSet) -> Self {
        Self {
            title: compile(set.title),
            url: compile(set.url),
            snippet: compile(set.snippet),
        }
    }

    /// Title and URL are required; a container missing either is skipped
    fn extract(&self, container: &ElementRef<'_>, engine_domain: &str) -> Option<SearchResult> {
        let Some(title) = self.title(container) else {
            debug!("Skipping container without title");
            return None;
        };
        let Some(url) = self.url(container, engine_domain) else {
            debug!("Skipping container without valid URL");
            return None;
        };
        let snippet = self
            .snippet(container)
            .unwrap_or_else(|| FALLBACK_SNIPPET.to_string());

        Some(SearchResult {
            title,
            url,
            snippet,
        })
    }

    fn title(&self, container: &ElementRef<'_>) -> Option<String> {
        self.title.iter().find_map(|selector| {
            let element = container.select(selector).next()?;
            let text = normalize_field(&element_text(&element));
            (!text.is_empty()).then_some(text)
        })
    }

    fn url(&self, container: &ElementRef<'_>, engine_domain: &str) -> Option<String> {
        self.url.iter().find_map(|selector| {
            let href = container.select(selector).next()?.value().attr("href")?;
            let decoded = decode_redirect(href.trim());
            is_valid_result_url(&decoded, engine_domain).then_some(decoded)
        })
    }

    fn snippet(&self, container: &ElementRef<'_>) -> Option<String> {
        self.snippet.iter().find_map(|selector| {
            let element = container.select(selector).next()?;
            let text = prepare_snippet(&element_text(&element));
            (!text.is_empty()).then_some(text)
        })
    }
}

fn element_text(element: &ElementRef<'_>) -> String {
    element.text().collect::<String>()
}
