// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
// Service, registry and tool wiring over the real DuckDuckGo provider

use super::fixtures::{config_for, RESULTS_PAGE};
use mockito::Matcher;
use serde_json::{json, Value};
use std::sync::Arc;
use web_search_mcp::mcp::{McpServer, WebSearchTool};
use web_search_mcp::search::{ProviderRegistry, SearchRequest, SearchService};

fn service_for(base_url: &str) -> Arc<SearchService> {
    let mut config = config_for(base_url);
    config.search.retry_attempts = 1;

    let mut registry = ProviderRegistry::new();
    registry.register_duckduckgo(&config).unwrap();
    Arc::new(SearchService::new(registry.default_provider().unwrap()))
}

#[tokio::test]
async fn test_service_sanitizes_before_search() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/html/")
        .match_query(Matcher::UrlEncoded("q".into(), "rust ownership".into()))
        .with_status(200)
        .with_body(RESULTS_PAGE)
        .expect(1)
        .create_async()
        .await;

    let service = service_for(&server.url());
    let response = service
        .search(&SearchRequest::new("  rust ownership  ").with_max_results(2))
        .await;

    mock.assert_async().await;
    assert!(response.is_success());
    assert_eq!(response.result_count(), Some(2));
    assert_eq!(service.status().provider, "DuckDuckGo");
}

#[tokio::test]
async fn test_tool_call_over_protocol() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/html/")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(RESULTS_PAGE)
        .expect(1)
        .create_async()
        .await;

    let mcp = McpServer::new(
        WebSearchTool::new(service_for(&server.url())),
        Default::default(),
    );
    let request = json!({
        "jsonrpc": "2.0",
        "id": 7,
        "method": "tools/call",
        "params": { "name": "web_search", "arguments": { "query": "rust", "max_results": 1 } }
    });

    let line = mcp.handle_line(&request.to_string()).await.unwrap();
    let reply: Value = serde_json::from_str(&line).unwrap();

    mock.assert_async().await;
    assert_eq!(reply["id"], 7);
    assert_eq!(reply["result"]["isError"], false);
    let body: Value =
        serde_json::from_str(reply["result"]["content"][0]["text"].as_str().unwrap()).unwrap();
    assert_eq!(body["success"], true);
    assert_eq!(body["resultCount"], 1);
    assert_eq!(body["results"][0]["title"], "What is Ownership? - The Rust Programming Language");
}
