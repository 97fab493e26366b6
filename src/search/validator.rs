// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Search request validation
//!
//! Runs before any network work. Lengths are measured in characters of the
//! trimmed query.

use super::types::{SearchError, SearchRequest, MAX_RESULTS_LIMIT};

/// Limits enforced by [`SearchValidator`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidatorOptions {
    pub min_query_length: usize,
    pub max_query_length: usize,
    pub max_results_limit: usize,
}

impl Default for ValidatorOptions {
    fn default() -> Self {
        Self {
            min_query_length: 1,
            max_query_length: 1000,
            max_results_limit: MAX_RESULTS_LIMIT,
        }
    }
}

/// Validates and normalizes incoming search requests
#[derive(Debug, Clone, Default)]
pub struct SearchValidator {
    options: ValidatorOptions,
}

impl SearchValidator {
    pub fn new(options: ValidatorOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ValidatorOptions {
        &self.options
    }

    pub fn set_options(&mut self, options: ValidatorOptions) {
        self.options = options;
    }

    /// Reject empty or oversized queries and out-of-range result limits
    pub fn validate(&self, request: &SearchRequest) -> Result<(), SearchError> {
        self.validate_query(&request.query)?;
        if let Some(max_results) = request.max_results {
            self.validate_max_results(max_results)?;
        }
        Ok(())
    }

    /// Trim the query and clamp the result limit
    pub fn sanitize(&self, request: &SearchRequest) -> SearchRequest {
        SearchRequest {
            query: request.query.trim().to_string(),
            max_results: request
                .max_results
                .map(|n| n.min(self.options.max_results_limit)),
        }
    }

    pub fn validate_and_sanitize(&self, request: &SearchRequest) -> Result<SearchRequest, SearchError> {
        self.validate(request)?;
        Ok(self.sanitize(request))
    }

    fn validate_query(&self, query: &str) -> Result<(), SearchError> {
        let trimmed = query.trim();
        if trimmed.is_empty() {
            return Err(SearchError::invalid_query(
                "Query cannot be empty or whitespace only",
            ));
        }

        let length = trimmed.chars().count();
        if length < self.options.min_query_length {
            return Err(SearchError::invalid_query(format!(
                "Query must be at least {} character(s)",
                self.options.min_query_length
            )));
        }
        if length > self.options.max_query_length {
            return Err(SearchError::invalid_query(format!(
                "Query must not exceed {} characters",
                self.options.max_query_length
            )));
        }
        Ok(())
    }

    fn validate_max_results(&self, max_results: usize) -> Result<(), SearchError> {
        if max_results < 1 {
            return Err(SearchError::invalid_parameter("maxResults must be at least 1"));
        }
        if max_results > self.options.max_results_limit {
            return Err(SearchError::invalid_parameter(format!(
                "maxResults must not exceed {}",
                self.options.max_results_limit
            )));
        }
        Ok(())
    }
}
