// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! `web_search` tool definition and handler

use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::search::types::{
    ErrorCode, SearchError, SearchRequest, SearchResponse, DEFAULT_MAX_RESULTS, MAX_RESULTS_LIMIT,
};
use crate::search::SearchService;

pub const TOOL_NAME: &str = "web_search";

const TOOL_DESCRIPTION: &str = "Search the internet for information. Uses DuckDuckGo search engine to return relevant web pages with titles, URLs, and descriptions.";

/// Errors surfaced to the protocol layer instead of as a tool result
#[derive(Debug, Clone, Error)]
pub enum ToolError {
    #[error("Unknown tool: {0}")]
    NotFound(String),
}

impl ToolError {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::NotFound(_) => ErrorCode::ToolNotFound,
        }
    }
}

/// One content item of a tool result
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolContent {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub text: String,
}

/// Result of a tool call
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolResult {
    pub content: Vec<ToolContent>,
    pub is_error: bool,
}

impl ToolResult {
    fn from_response(response: &SearchResponse, is_error: bool) -> Self {
        let text = serde_json::to_string_pretty(response)
            .unwrap_or_else(|e| format!(r#"{{"success": false, "error": "{}"}}"#, e));
        Self {
            content: vec![ToolContent { kind: "text", text }],
            is_error,
        }
    }
}

/// Tool definition advertised by `tools/list`
pub fn tool_definition() -> Value {
    json!({
        "name": TOOL_NAME,
        "description": TOOL_DESCRIPTION,
        "inputSchema": {
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "Search keywords or question"
                },
                "max_results": {
                    "type": "integer",
                    "description": format!(
                        "Maximum number of results to return (default: {}, max: {})",
                        DEFAULT_MAX_RESULTS, MAX_RESULTS_LIMIT
                    ),
                    "default": DEFAULT_MAX_RESULTS,
                    "minimum": 1,
                    "maximum": MAX_RESULTS_LIMIT
                }
            },
            "required": ["query"]
        }
    })
}

/// Handles `web_search` calls against a shared [`SearchService`]
#[derive(Clone)]
pub struct WebSearchTool {
    service: Arc<SearchService>,
}

impl WebSearchTool {
    pub fn new(service: Arc<SearchService>) -> Self {
        Self { service }
    }

    pub fn service(&self) -> &Arc<SearchService> {
        &self.service
    }

    /// Dispatch a tool call
    ///
    /// Only an unknown tool name is an error. Malformed arguments produce a
    /// failure response flagged with `is_error`; search failures produce a
    /// failure response without it.
    pub async fn call(&self, name: &str, arguments: Option<&Value>) -> Result<ToolResult, ToolError> {
        if name != TOOL_NAME {
            warn!(tool = name, "Unknown tool requested");
            return Err(ToolError::NotFound(name.to_string()));
        }

        let request = match parse_arguments(arguments) {
            Ok(request) => request,
            Err(err) => {
                debug!(code = err.code().as_u16(), error = %err, "Invalid tool arguments");
                let query = arguments
                    .and_then(|args| args.get("query"))
                    .and_then(Value::as_str)
                    .unwrap_or_default();
                return Ok(ToolResult::from_response(
                    &SearchResponse::from_error(query, &err),
                    true,
                ));
            }
        };

        info!(
            query_len = request.query.chars().count(),
            max_results = ?request.max_results,
            "Handling web_search request"
        );

        let response = self.service.search(&request).await;
        Ok(ToolResult::from_response(&response, false))
    }
}

/// Convert raw call arguments into a request
///
/// Range checks are left to the validator; this only enforces shape.
pub fn parse_arguments(arguments: Option<&Value>) -> Result<SearchRequest, SearchError> {
    let Some(args) = arguments.and_then(Value::as_object) else {
        return Err(SearchError::invalid_request("Missing required arguments"));
    };

    let Some(query) = args.get("query").and_then(Value::as_str) else {
        return Err(SearchError::invalid_request("Missing required parameter: query"));
    };

    let mut request = SearchRequest::new(query);
    match args.get("max_results") {
        None | Some(Value::Null) => {}
        Some(Value::Number(number)) => {
            request.max_results = Some(parse_max_results(number)?);
        }
        Some(_) => {
            return Err(SearchError::invalid_parameter("maxResults must be a number"));
        }
    }

    Ok(request)
}

fn parse_max_results(number: &serde_json::Number) -> Result<usize, SearchError> {
    if let Some(n) = number.as_u64() {
        return usize::try_from(n)
            .map_err(|_| SearchError::invalid_parameter("maxResults is out of range"));
    }
    if number.as_i64().is_some() {
        return Err(SearchError::invalid_parameter("maxResults must be at least 1"));
    }

    match number.as_f64() {
        Some(f) if f.fract() == 0.0 && f >= 1.0 && f <= usize::MAX as f64 => Ok(f as usize),
        Some(f) if f.fract() == 0.0 => {
            Err(SearchError::invalid_parameter("maxResults must be at least 1"))
        }
        _ => Err(SearchError::invalid_parameter("maxResults must be an integer")),
    }
}
