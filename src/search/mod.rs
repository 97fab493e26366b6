// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Web search module
//!
//! Turns a free-text query into a bounded list of `(title, url, snippet)`
//! results scraped from DuckDuckGo's HTML endpoint:
//!
//! - [`validator`] rejects bad input before any I/O
//! - [`fetcher`] performs the GET with retry and checks the response shape
//! - [`extractor`] walks ordered selector candidates over the parsed page
//! - [`url`] unwraps the engine's redirect links and validates destinations
//! - [`duckduckgo`] composes the above behind [`SearchProvider`]

pub mod config;
pub mod duckduckgo;
pub mod extractor;
pub mod fetcher;
pub mod provider;
pub mod registry;
pub mod retry;
pub mod selectors;
pub mod service;
pub mod text;
pub mod types;
pub mod url;
pub mod validator;

// Re-export commonly used types
pub use config::{AppConfig, ConfigError, LogFormat, LogLevel, LoggingConfig, ProxyConfig};
pub use duckduckgo::DuckDuckGoProvider;
pub use extractor::HtmlExtractor;
pub use fetcher::DuckDuckGoFetcher;
pub use provider::SearchProvider;
pub use registry::ProviderRegistry;
pub use retry::{retry_if, retry_with_backoff, RetryPolicy};
pub use selectors::{SelectorSet, DUCKDUCKGO_SELECTORS};
pub use service::{SearchService, ServiceStatus};
pub use types::{
    ErrorCode, NetworkErrorKind, SearchError, SearchRequest, SearchResponse, SearchResult,
};
pub use validator::{SearchValidator, ValidatorOptions};
