// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Search API request types

use serde::{Deserialize, Serialize};

use crate::search::types::SearchRequest;

/// Request body for POST /v1/search
///
/// Range checks happen in the search service so HTTP and tool callers
/// get the same failure messages.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchApiRequest {
    /// Search keywords or question
    pub query: String,

    /// Number of results to return (1-20, default 10)
    #[serde(default, alias = "max_results")]
    pub max_results: Option<usize>,

    /// Optional request ID echoed into the logs
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

impl SearchApiRequest {
    pub fn to_search_request(&self) -> SearchRequest {
        SearchRequest {
            query: self.query.clone(),
            max_results: self.max_results,
        }
    }
}
