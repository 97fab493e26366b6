// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod api;
pub mod cli;
pub mod logging;
pub mod mcp;
pub mod search;
pub mod version;

// Re-export main types
pub use mcp::{McpServer, WebSearchTool};
pub use search::{
    AppConfig, DuckDuckGoProvider, ProviderRegistry, SearchError, SearchProvider, SearchRequest,
    SearchResponse, SearchResult, SearchService,
};
