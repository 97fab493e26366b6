// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Result page fetcher
//!
//! Builds the search URL, performs the GET with bounded retry and checks the
//! response shape (status 200, non-empty body). Returns raw HTML; parsing is
//! left to the extractor.

use reqwest::header::{
    HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, DNT, UPGRADE_INSECURE_REQUESTS,
};
use reqwest::redirect::Policy;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tracing::{debug, error, warn};

use super::config::{AppConfig, HttpConfig, ProxyConfig};
use super::retry::{retry_with_backoff, RetryPolicy};
use super::types::{NetworkErrorKind, SearchError};
use super::url::{build_search_url, redact_query};

const ACCEPT_HTML: &str =
    "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,image/apng,*/*;q=0.8";
const ACCEPT_LANGUAGE_VALUE: &str = "en-US,en;q=0.9";

/// Build the HTTP client used for result page requests
///
/// Compression is negotiated by reqwest itself (gzip, brotli, deflate) and
/// bodies are decoded transparently. Without a proxy the client ignores the
/// system proxy variables so the configured value is the only source.
pub fn build_client(
    http: &HttpConfig,
    timeout: Duration,
    user_agent: &str,
    proxy: Option<&ProxyConfig>,
) -> Result<Client, SearchError> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_HTML));
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static(ACCEPT_LANGUAGE_VALUE));
    headers.insert(DNT, HeaderValue::from_static("1"));
    headers.insert(UPGRADE_INSECURE_REQUESTS, HeaderValue::from_static("1"));

    let redirect = if http.max_redirects == 0 {
        Policy::none()
    } else {
        Policy::limited(http.max_redirects)
    };

    let builder = Client::builder()
        .timeout(timeout)
        .user_agent(user_agent)
        .default_headers(headers)
        .redirect(redirect);

    let builder = match proxy {
        Some(proxy) => {
            let proxy_url = proxy.url();
            let proxy = reqwest::Proxy::all(&proxy_url).map_err(|e| {
                SearchError::network(
                    NetworkErrorKind::Proxy,
                    format!("Invalid proxy configuration: {}", e),
                    proxy_url.clone(),
                )
            })?;
            debug!(proxy = %proxy_url, "HTTP client configured with proxy");
            builder.proxy(proxy)
        }
        None => builder.no_proxy(),
    };

    builder.build().map_err(|e| SearchError::Unknown {
        message: format!("Failed to create HTTP client: {}", e),
    })
}

/// Fetches DuckDuckGo's HTML result page
#[derive(Debug, Clone)]
pub struct DuckDuckGoFetcher {
    client: Client,
    base_url: String,
    html_path: String,
    retry: RetryPolicy,
}

impl DuckDuckGoFetcher {
    pub fn new(config: &AppConfig) -> Result<Self, SearchError> {
        let client = build_client(
            &config.http,
            config.request_timeout(),
            &config.duckduckgo.user_agent,
            config.proxy.as_ref(),
        )?;
        Ok(Self::with_client(client, config))
    }

    /// Use a prebuilt client; endpoint and retry policy still come from `config`
    pub fn with_client(client: Client, config: &AppConfig) -> Self {
        Self {
            client,
            base_url: config.duckduckgo.base_url.clone(),
            html_path: config.duckduckgo.html_path.clone(),
            retry: config.retry_policy(),
        }
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    /// `{base_url}{html_path}?q={query}`
    pub fn search_url(&self, query: &str) -> Result<String, SearchError> {
        build_search_url(&self.base_url, &self.html_path, query)
            .map(String::from)
            .map_err(|e| SearchError::Unknown {
                message: format!("Invalid search endpoint {}{}: {}", self.base_url, self.html_path, e),
            })
    }

    /// Fetch the result page for `query`
    ///
    /// `max_results` is informational only; the HTML endpoint has no
    /// parameter that reliably limits the page size.
    pub async fn fetch(&self, query: &str, max_results: Option<usize>) -> Result<String, SearchError> {
        let url = self.search_url(query)?;
        let redacted = redact_query(&url);
        let max_attempts = self.retry.attempts();

        debug!(
            url = %redacted,
            query_len = query.chars().count(),
            max_results = ?max_results,
            "Fetching DuckDuckGo search results"
        );

        let result = retry_with_backoff(
            &self.retry,
            || self.fetch_html(&url),
            |attempt, err: &SearchError| {
                warn!(
                    attempt,
                    max_attempts,
                    code = err.code().as_u16(),
                    error = %err,
                    "Retrying DuckDuckGo fetch"
                );
            },
        )
        .await;

        match result {
            Ok(html) => {
                debug!(body_len = html.len(), "Fetched DuckDuckGo results");
                Ok(html)
            }
            Err(err) => {
                error!(
                    url = %redacted,
                    code = err.code().as_u16(),
                    error = %err,
                    "Failed to fetch DuckDuckGo results"
                );
                let kind = match &err {
                    SearchError::Network { kind, .. } => *kind,
                    _ => NetworkErrorKind::Generic,
                };
                Err(SearchError::network(
                    kind,
                    format!("Failed to fetch search results: {}", err),
                    url,
                ))
            }
        }
    }

    async fn fetch_html(&self, url: &str) -> Result<String, SearchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| SearchError::from_reqwest(e, url))?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(SearchError::network(
                NetworkErrorKind::Generic,
                format!("DuckDuckGo returned status {}", status.as_u16()),
                url,
            ));
        }

        let body = response
            .text()
            .await
            .map_err(|e| SearchError::from_reqwest(e, url))?;

        debug!(status = status.as_u16(), body_len = body.len(), "Received response");

        if body.is_empty() {
            return Err(SearchError::network(
                NetworkErrorKind::Generic,
                "DuckDuckGo returned empty response",
                url,
            ));
        }

        Ok(body)
    }
}
