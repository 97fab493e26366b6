// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Search API endpoint handler

use axum::{extract::State, Json};
use tracing::{debug, info};

use super::request::SearchApiRequest;
use crate::api::http_server::AppState;
use crate::search::types::SearchResponse;

/// POST /v1/search - Perform web search
///
/// # Request
/// - `query`: Search keywords (required)
/// - `maxResults`: Number of results (1-20, default 10)
/// - `requestId`: Optional request ID for tracking
///
/// # Response
/// Always `200 OK` with the same body the `web_search` tool returns:
/// `success`, `query`, and either `resultCount`/`results` or `error`.
pub async fn search_handler(
    State(state): State<AppState>,
    Json(request): Json<SearchApiRequest>,
) -> Json<SearchResponse> {
    debug!(request_id = ?request.request_id, "Search request received");

    let response = state.service.search(&request.to_search_request()).await;

    info!(
        request_id = ?request.request_id,
        success = response.is_success(),
        result_count = response.result_count().unwrap_or(0),
        "Search request complete"
    );

    Json(response)
}
