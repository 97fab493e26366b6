// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! DuckDuckGo search provider
//!
//! Implements web search using DuckDuckGo's HTML interface.
//! No API key required. Each call runs validate, fetch and extract in
//! sequence; retry happens only inside the fetcher.

use async_trait::async_trait;
use tracing::{info, warn};

use super::config::AppConfig;
use super::extractor::HtmlExtractor;
use super::fetcher::DuckDuckGoFetcher;
use super::provider::SearchProvider;
use super::types::{
    SearchError, SearchRequest, SearchResponse, SearchResult, DEFAULT_MAX_RESULTS,
};
use super::validator::SearchValidator;

/// Display name; the registry key is its lowercase form
pub const PROVIDER_NAME: &str = "DuckDuckGo";

/// DuckDuckGo search provider (no API key required)
#[derive(Debug, Clone)]
pub struct DuckDuckGoProvider {
    fetcher: DuckDuckGoFetcher,
    validator: SearchValidator,
    default_max_results: usize,
}

impl DuckDuckGoProvider {
    /// Create a new DuckDuckGo provider
    pub fn new(config: &AppConfig) -> Result<Self, SearchError> {
        Ok(Self::with_fetcher(DuckDuckGoFetcher::new(config)?)
            .with_default_max_results(config.search.max_results))
    }

    pub fn with_fetcher(fetcher: DuckDuckGoFetcher) -> Self {
        Self {
            fetcher,
            validator: SearchValidator::default(),
            default_max_results: DEFAULT_MAX_RESULTS,
        }
    }

    /// Result cap applied when a request carries no `max_results`
    pub fn with_default_max_results(mut self, max_results: usize) -> Self {
        self.default_max_results = max_results;
        self
    }

    pub fn default_max_results(&self) -> usize {
        self.default_max_results
    }

    fn limit_for(&self, request: &SearchRequest) -> usize {
        request.max_results.unwrap_or(self.default_max_results)
    }

    async fn run(&self, request: &SearchRequest) -> Result<Vec<SearchResult>, SearchError> {
        self.validator.validate(request)?;

        let max_results = self.limit_for(request);
        let html = self
            .fetcher
            .fetch(&request.query, request.max_results)
            .await?;

        // `Html` is not Send; extraction finishes before the next await point
        let mut results = HtmlExtractor::extract(&html, max_results);
        results.truncate(max_results);

        if results.is_empty() {
            return Err(SearchError::NoResults);
        }
        Ok(results)
    }
}

#[async_trait]
impl SearchProvider for DuckDuckGoProvider {
    async fn search(&self, request: &SearchRequest) -> SearchResponse {
        info!(
            provider = PROVIDER_NAME,
            query_len = request.query.chars().count(),
            max_results = self.limit_for(request),
            "Starting search"
        );

        match self.run(request).await {
            Ok(results) => {
                info!(
                    provider = PROVIDER_NAME,
                    result_count = results.len(),
                    "Search successful"
                );
                SearchResponse::from_results(request.query.clone(), results)
            }
            Err(SearchError::NoResults) => {
                warn!(provider = PROVIDER_NAME, "Search returned no results");
                SearchResponse::no_results(request.query.clone())
            }
            Err(err) => {
                warn!(
                    provider = PROVIDER_NAME,
                    code = err.code().as_u16(),
                    error = %err,
                    "Search failed"
                );
                SearchResponse::from_error(request.query.clone(), &err)
            }
        }
    }

    fn name(&self) -> &str {
        PROVIDER_NAME
    }
}
