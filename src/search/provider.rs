// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Search provider trait definition

use async_trait::async_trait;

use super::types::{SearchRequest, SearchResponse};

/// Trait for implementing search providers
///
/// A provider hides engine-specific fetching and parsing behind a uniform
/// contract. `search` never fails: validation, network and empty-result
/// outcomes are all folded into a failure [`SearchResponse`].
///
/// Implementations hold no per-call mutable state, so one instance can serve
/// concurrent searches.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Perform a web search
    ///
    /// # Arguments
    /// * `request` - Query and optional result cap
    ///
    /// # Returns
    /// Results in engine ranking order, or a failure response
    async fn search(&self, request: &SearchRequest) -> SearchResponse;

    /// Get the provider name for logging and registry lookup
    fn name(&self) -> &str;

    /// Check if the provider can currently serve requests
    fn is_available(&self) -> bool {
        true
    }
}
