// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Core types for web search functionality

use serde::{Deserialize, Serialize};
use std::error::Error as StdError;
use thiserror::Error;

/// Result count used when the caller does not ask for a specific number
pub const DEFAULT_MAX_RESULTS: usize = 10;

/// Upper bound on results per request
pub const MAX_RESULTS_LIMIT: usize = 20;

/// Error message carried by an empty extraction
pub const NO_RESULTS_MESSAGE: &str = "No results found";

/// Search request parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    /// Search query string
    pub query: String,
    /// Maximum number of results to return (default: 10, max: 20)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_results: Option<usize>,
}

impl SearchRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            max_results: None,
        }
    }

    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = Some(max_results);
        self
    }

    /// Requested result count, falling back to [`DEFAULT_MAX_RESULTS`]
    pub fn effective_max_results(&self) -> usize {
        self.max_results.unwrap_or(DEFAULT_MAX_RESULTS)
    }
}

/// A single search result extracted from the engine's result page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Title of the search result
    pub title: String,
    /// Absolute http(s) URL of the destination page
    pub url: String,
    /// Snippet/description of the search result
    pub snippet: String,
}

/// Outcome of a search, serialized as `{success, query, resultCount?, results?, error?}`
///
/// A success always carries at least one result; an empty extraction is
/// represented as a failure with [`NO_RESULTS_MESSAGE`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "WireResponse", try_from = "WireResponse")]
pub enum SearchResponse {
    Success {
        query: String,
        results: Vec<SearchResult>,
    },
    Failure {
        query: String,
        error: String,
    },
}

impl SearchResponse {
    /// Build a response from extracted results, collapsing an empty list into a failure
    pub fn from_results(query: impl Into<String>, results: Vec<SearchResult>) -> Self {
        let query = query.into();
        if results.is_empty() {
            Self::no_results(query)
        } else {
            Self::Success { query, results }
        }
    }

    pub fn failure(query: impl Into<String>, error: impl Into<String>) -> Self {
        Self::Failure {
            query: query.into(),
            error: error.into(),
        }
    }

    pub fn from_error(query: impl Into<String>, error: &SearchError) -> Self {
        Self::failure(query, error.to_string())
    }

    pub fn no_results(query: impl Into<String>) -> Self {
        Self::failure(query, NO_RESULTS_MESSAGE)
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    pub fn query(&self) -> &str {
        match self {
            Self::Success { query, .. } | Self::Failure { query, .. } => query,
        }
    }

    /// Results of a successful search; empty on failure
    pub fn results(&self) -> &[SearchResult] {
        match self {
            Self::Success { results, .. } => results,
            Self::Failure { .. } => &[],
        }
    }

    pub fn result_count(&self) -> Option<usize> {
        match self {
            Self::Success { results, .. } => Some(results.len()),
            Self::Failure { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Success { .. } => None,
            Self::Failure { error, .. } => Some(error),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireResponse {
    success: bool,
    query: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    result_count: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    results: Option<Vec<SearchResult>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl From<SearchResponse> for WireResponse {
    fn from(response: SearchResponse) -> Self {
        match response {
            SearchResponse::Success { query, results } => Self {
                success: true,
                query,
                result_count: Some(results.len()),
                results: Some(results),
                error: None,
            },
            SearchResponse::Failure { query, error } => Self {
                success: false,
                query,
                result_count: None,
                results: None,
                error: Some(error),
            },
        }
    }
}

impl TryFrom<WireResponse> for SearchResponse {
    type Error = String;

    fn try_from(wire: WireResponse) -> Result<Self, Self::Error> {
        if !wire.success {
            return Ok(Self::Failure {
                query: wire.query,
                error: wire.error.unwrap_or_else(|| "Unknown error".to_string()),
            });
        }

        let results = wire.results.unwrap_or_default();
        if results.is_empty() {
            return Err("successful response must carry at least one result".to_string());
        }
        if let Some(count) = wire.result_count {
            if count != results.len() {
                return Err(format!(
                    "resultCount {} does not match {} results",
                    count,
                    results.len()
                ));
            }
        }

        Ok(Self::Success {
            query: wire.query,
            results,
        })
    }
}

/// Numeric error codes, grouped by category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u16)]
pub enum ErrorCode {
    ConfigInvalid = 1001,
    ConfigMissing = 1002,
    ConfigValidationFailed = 1003,

    NetworkError = 2001,
    NetworkTimeout = 2002,
    NetworkRedirectError = 2003,
    ProxyError = 2004,

    SearchFailed = 3001,
    SearchNoResults = 3002,
    SearchParsingError = 3003,
    SearchProviderError = 3004,

    ValidationError = 4001,
    InvalidQuery = 4002,
    InvalidParameter = 4003,

    ToolNotFound = 5001,
    InvalidRequest = 5002,
    HandlerError = 5003,

    Unknown = 9999,
}

impl ErrorCode {
    pub fn as_u16(self) -> u16 {
        self as u16
    }
}

/// Sub-kind of a network failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkErrorKind {
    Generic,
    Timeout,
    Proxy,
}

impl NetworkErrorKind {
    pub fn code(self) -> ErrorCode {
        match self {
            Self::Generic => ErrorCode::NetworkError,
            Self::Timeout => ErrorCode::NetworkTimeout,
            Self::Proxy => ErrorCode::ProxyError,
        }
    }
}

/// Errors that can occur during search operations
#[derive(Debug, Clone, Error)]
pub enum SearchError {
    /// Bad query or limit; raised before any I/O
    #[error("{message}")]
    Validation { code: ErrorCode, message: String },

    /// Transport failure, non-200 status, empty body or timeout
    ///
    /// `url` is the full request URL and is only used for control flow;
    /// it is never part of the rendered message.
    #[error("{message}")]
    Network {
        kind: NetworkErrorKind,
        message: String,
        url: Option<String>,
    },

    /// Well-formed page with zero extractable results
    #[error("No results found")]
    NoResults,

    /// Search provider is unavailable
    #[error("Search provider \"{provider}\" is not available")]
    ProviderUnavailable { provider: String },

    #[error("{message}")]
    Unknown { message: String },
}

impl SearchError {
    pub fn invalid_query(message: impl Into<String>) -> Self {
        Self::Validation {
            code: ErrorCode::InvalidQuery,
            message: message.into(),
        }
    }

    pub fn invalid_parameter(message: impl Into<String>) -> Self {
        Self::Validation {
            code: ErrorCode::InvalidParameter,
            message: message.into(),
        }
    }

    /// Malformed tool call, e.g. missing arguments
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::Validation {
            code: ErrorCode::InvalidRequest,
            message: message.into(),
        }
    }

    pub fn network(kind: NetworkErrorKind, message: impl Into<String>, url: impl Into<String>) -> Self {
        Self::Network {
            kind,
            message: message.into(),
            url: Some(url.into()),
        }
    }

    /// Classify a transport error from `reqwest`
    ///
    /// The upstream detail is taken from the error's source chain with the
    /// request URL stripped, so the message is safe to surface.
    pub fn from_reqwest(err: reqwest::Error, url: &str) -> Self {
        let kind = if err.is_timeout() {
            NetworkErrorKind::Timeout
        } else if chain_mentions(&err, "proxy") {
            NetworkErrorKind::Proxy
        } else {
            NetworkErrorKind::Generic
        };

        let detail = describe_chain(&err.without_url());
        let message = match kind {
            NetworkErrorKind::Timeout => format!("Request timeout: {}", detail),
            NetworkErrorKind::Proxy => format!("Proxy error: {}", detail),
            NetworkErrorKind::Generic => format!("HTTP request failed: {}", detail),
        };

        Self::network(kind, message, url)
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Validation { code, .. } => *code,
            Self::Network { kind, .. } => kind.code(),
            Self::NoResults => ErrorCode::SearchNoResults,
            Self::ProviderUnavailable { .. } => ErrorCode::SearchProviderError,
            Self::Unknown { .. } => ErrorCode::Unknown,
        }
    }

    /// Expected, recoverable outcome as opposed to an unclassified fault
    pub fn is_operational(&self) -> bool {
        !matches!(self, Self::Unknown { .. })
    }

    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network { .. })
    }
}

fn chain_mentions(err: &(dyn StdError + 'static), needle: &str) -> bool {
    let mut current = Some(err);
    while let Some(e) = current {
        if e.to_string().to_lowercase().contains(needle) {
            return true;
        }
        current = e.source();
    }
    false
}

fn describe_chain(err: &(dyn StdError + 'static)) -> String {
    let mut parts = vec![err.to_string()];
    let mut current = err.source();
    while let Some(e) = current {
        let text = e.to_string();
        if !parts.iter().any(|p| p.contains(&text)) {
            parts.push(text);
        }
        current = e.source();
    }
    parts.join(": ")
}
