// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
// DuckDuckGo provider end to end against a mock result page

use super::fixtures::{config_for, fast_fetcher, NO_RESULTS_PAGE, RESULTS_PAGE};
use mockito::{Matcher, Mock, ServerGuard};
use serde_json::Value;
use web_search_mcp::search::{DuckDuckGoProvider, SearchProvider, SearchRequest};

async fn serve_page(server: &mut ServerGuard, body: &str, hits: usize) -> Mock {
    server
        .mock("GET", "/html/")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "text/html; charset=utf-8")
        .with_body(body)
        .expect(hits)
        .create_async()
        .await
}

fn provider_for(server: &ServerGuard) -> DuckDuckGoProvider {
    DuckDuckGoProvider::with_fetcher(fast_fetcher(&config_for(&server.url())))
}

#[tokio::test]
async fn test_search_returns_clean_results() {
    let mut server = mockito::Server::new_async().await;
    let mock = serve_page(&mut server, RESULTS_PAGE, 1).await;

    let response = provider_for(&server)
        .search(&SearchRequest::new("rust ownership"))
        .await;

    mock.assert_async().await;
    assert!(response.is_success());
    assert_eq!(response.query(), "rust ownership");
    assert_eq!(response.result_count(), Some(3));
    assert_eq!(
        response.results()[0].url,
        "https://doc.rust-lang.org/book/ch04-01-what-is-ownership.html"
    );
}

#[tokio::test]
async fn test_search_respects_max_results() {
    let mut server = mockito::Server::new_async().await;
    let mock = serve_page(&mut server, RESULTS_PAGE, 1).await;

    let response = provider_for(&server)
        .search(&SearchRequest::new("rust").with_max_results(1))
        .await;

    mock.assert_async().await;
    assert_eq!(response.result_count(), Some(1));
    assert_eq!(response.results().len(), 1);
}

#[tokio::test]
async fn test_response_wire_shape() {
    let mut server = mockito::Server::new_async().await;
    let _mock = serve_page(&mut server, RESULTS_PAGE, 1).await;

    let response = provider_for(&server)
        .search(&SearchRequest::new("rust").with_max_results(2))
        .await;
    let json: Value = serde_json::to_value(&response).unwrap();

    assert_eq!(json["success"], true);
    assert_eq!(json["query"], "rust");
    assert_eq!(json["resultCount"], 2);
    assert!(json.get("error").is_none());
    let first = json["results"][0].as_object().unwrap();
    let mut keys: Vec<&str> = first.keys().map(String::as_str).collect();
    keys.sort_unstable();
    assert_eq!(keys, vec!["snippet", "title", "url"]);
}

#[tokio::test]
async fn test_no_results_page_is_failure() {
    let mut server = mockito::Server::new_async().await;
    let mock = serve_page(&mut server, NO_RESULTS_PAGE, 1).await;

    let response = provider_for(&server)
        .search(&SearchRequest::new("zxqv nothing matches"))
        .await;

    mock.assert_async().await;
    assert!(!response.is_success());
    assert_eq!(response.error(), Some("No results found"));
    assert!(response.results().is_empty());
}

#[tokio::test]
async fn test_invalid_requests_never_reach_network() {
    let mut server = mockito::Server::new_async().await;
    let mock = serve_page(&mut server, RESULTS_PAGE, 0).await;
    let provider = provider_for(&server);

    let empty = provider.search(&SearchRequest::new("   ")).await;
    assert_eq!(empty.error(), Some("Query cannot be empty or whitespace only"));

    let too_many = provider
        .search(&SearchRequest::new("rust").with_max_results(25))
        .await;
    assert_eq!(too_many.error(), Some("maxResults must not exceed 20"));

    let too_long = provider.search(&SearchRequest::new("a".repeat(1001))).await;
    assert_eq!(too_long.error(), Some("Query must not exceed 1000 characters"));

    mock.assert_async().await;
}

#[tokio::test]
async fn test_upstream_failure_is_failure_response() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/html/")
        .match_query(Matcher::Any)
        .with_status(429)
        .expect(3)
        .create_async()
        .await;

    let response = provider_for(&server).search(&SearchRequest::new("rust")).await;

    mock.assert_async().await;
    assert!(!response.is_success());
    assert_eq!(
        response.error(),
        Some("Failed to fetch search results: DuckDuckGo returned status 429")
    );
}

#[tokio::test]
async fn test_configured_default_limit_applies() {
    let mut server = mockito::Server::new_async().await;
    let mock = serve_page(&mut server, RESULTS_PAGE, 1).await;

    let mut config = config_for(&server.url());
    config.search.max_results = 2;
    config.search.retry_attempts = 1;
    let provider = DuckDuckGoProvider::new(&config).unwrap();

    let response = provider.search(&SearchRequest::new("rust")).await;

    mock.assert_async().await;
    assert_eq!(response.result_count(), Some(2));
}
