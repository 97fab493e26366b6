// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
// Fetcher behaviour against local servers

use super::fixtures::{config_for, fast_fetcher, RESULTS_PAGE};
use mockito::Matcher;
use std::time::Duration;
use tokio::net::TcpListener;
use web_search_mcp::search::{DuckDuckGoFetcher, NetworkErrorKind, RetryPolicy, SearchError};

#[tokio::test]
async fn test_query_is_form_encoded() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/html/")
        .match_query(Matcher::UrlEncoded("q".into(), "c++ & rust? 100%".into()))
        .with_status(200)
        .with_body(RESULTS_PAGE)
        .expect(1)
        .create_async()
        .await;

    let html = fast_fetcher(&config_for(&server.url()))
        .fetch("c++ & rust? 100%", None)
        .await
        .unwrap();

    assert_eq!(html, RESULTS_PAGE);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_single_attempt_policy_does_not_retry() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/html/")
        .match_query(Matcher::Any)
        .with_status(500)
        .expect(1)
        .create_async()
        .await;

    let fetcher = DuckDuckGoFetcher::new(&config_for(&server.url()))
        .unwrap()
        .with_retry_policy(RetryPolicy::new(1, Duration::from_millis(1)));
    let err = fetcher.fetch("rust", None).await.unwrap_err();

    mock.assert_async().await;
    assert_eq!(
        err.to_string(),
        "Failed to fetch search results: DuckDuckGo returned status 500"
    );
}

#[tokio::test]
async fn test_follows_redirects_within_limit() {
    let mut server = mockito::Server::new_async().await;
    let moved = server
        .mock("GET", "/html/")
        .match_query(Matcher::Any)
        .with_status(301)
        .with_header("location", "/moved/")
        .expect(1)
        .create_async()
        .await;
    let target = server
        .mock("GET", "/moved/")
        .with_status(200)
        .with_body("<html>moved</html>")
        .expect(1)
        .create_async()
        .await;

    let html = fast_fetcher(&config_for(&server.url()))
        .fetch("rust", None)
        .await
        .unwrap();

    assert_eq!(html, "<html>moved</html>");
    moved.assert_async().await;
    target.assert_async().await;
}

#[tokio::test]
async fn test_unresponsive_server_times_out() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let holder = tokio::spawn(async move {
        let mut open = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            open.push(socket);
        }
    });

    let mut config = config_for(&format!("http://{}", addr));
    config.http.timeout_ms = 200;
    let fetcher = DuckDuckGoFetcher::new(&config)
        .unwrap()
        .with_retry_policy(RetryPolicy::new(1, Duration::from_millis(1)));

    let err = fetcher.fetch("rust", None).await.unwrap_err();
    holder.abort();

    match &err {
        SearchError::Network { kind, .. } => assert_eq!(*kind, NetworkErrorKind::Timeout),
        other => panic!("expected network error, got {:?}", other),
    }
    assert!(err.to_string().starts_with("Failed to fetch search results: Request timeout"));
    assert_eq!(err.code().as_u16(), NetworkErrorKind::Timeout.code().as_u16());
}

#[tokio::test]
async fn test_connection_refused_is_network_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = fast_fetcher(&config_for(&format!("http://{}", addr)))
        .fetch("rust", None)
        .await
        .unwrap_err();

    assert!(err.is_network());
    assert!(err.is_operational());
}
