// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Search service orchestration
//!
//! Validates and sanitizes requests, checks provider availability and
//! delegates to the active provider. Every outcome is a [`SearchResponse`].

use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

use super::provider::SearchProvider;
use super::types::{SearchError, SearchRequest, SearchResponse};
use super::validator::SearchValidator;

/// Availability snapshot of the active provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceStatus {
    pub available: bool,
    pub provider: String,
}

/// Main search service wrapping a single active provider
pub struct SearchService {
    provider: Arc<dyn SearchProvider>,
    validator: SearchValidator,
}

impl SearchService {
    /// Create a service with the default validator
    pub fn new(provider: Arc<dyn SearchProvider>) -> Self {
        Self::with_validator(provider, SearchValidator::default())
    }

    pub fn with_validator(provider: Arc<dyn SearchProvider>, validator: SearchValidator) -> Self {
        info!(provider = provider.name(), "Search service initialized");
        Self {
            provider,
            validator,
        }
    }

    /// Perform a search
    ///
    /// Validation failures and an unavailable provider are returned as
    /// failure responses without touching the network.
    pub async fn search(&self, request: &SearchRequest) -> SearchResponse {
        let provider = self.provider.name();
        info!(
            provider,
            query_len = request.query.chars().count(),
            max_results = ?request.max_results,
            "Search requested"
        );

        let sanitized = match self.validator.validate_and_sanitize(request) {
            Ok(sanitized) => sanitized,
            Err(err) => {
                debug!(code = err.code().as_u16(), error = %err, "Rejected search request");
                return SearchResponse::from_error(request.query.clone(), &err);
            }
        };

        if !self.provider.is_available() {
            let err = SearchError::ProviderUnavailable {
                provider: provider.to_string(),
            };
            warn!(code = err.code().as_u16(), error = %err, "Provider unavailable");
            return SearchResponse::from_error(request.query.clone(), &err);
        }

        let start = Instant::now();
        let response = self.provider.search(&sanitized).await;

        info!(
            provider,
            success = response.is_success(),
            result_count = response.result_count().unwrap_or(0),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Search completed"
        );

        response
    }

    pub fn provider(&self) -> Arc<dyn SearchProvider> {
        Arc::clone(&self.provider)
    }

    pub fn set_provider(&mut self, provider: Arc<dyn SearchProvider>) {
        info!(
            from = self.provider.name(),
            to = provider.name(),
            "Switching search provider"
        );
        self.provider = provider;
    }

    pub fn validator(&self) -> &SearchValidator {
        &self.validator
    }

    pub fn set_validator(&mut self, validator: SearchValidator) {
        self.validator = validator;
    }

    pub fn status(&self) -> ServiceStatus {
        ServiceStatus {
            available: self.provider.is_available(),
            provider: self.provider.name().to_string(),
        }
    }
}
