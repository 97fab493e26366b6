// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
// Shared result pages and helpers for the web search tests

use std::time::Duration;
use web_search_mcp::search::{AppConfig, DuckDuckGoFetcher, RetryPolicy};

/// A trimmed DuckDuckGo HTML page: one ad, three organic results
pub const RESULTS_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head><title>rust ownership at DuckDuckGo</title></head>
<body>
<div id="links" class="results">
  <div class="result results_links results_links_deep web-result result--ad">
    <div class="links_main links_deep result__body">
      <h2 class="result__title">
        <a rel="nofollow" class="result__a" href="https://duckduckgo.com/y.js?ad_domain=example.net&amp;u3=1">Sponsored: Learn Rust Fast</a>
      </h2>
      <a class="result__snippet" href="https://duckduckgo.com/y.js?ad_domain=example.net">Ad copy</a>
    </div>
  </div>
  <div class="result results_links results_links_deep web-result">
    <div class="links_main links_deep result__body">
      <h2 class="result__title">
        <a rel="nofollow" class="result__a" href="//duckduckgo.com/l/?uddg=https%3A%2F%2Fdoc.rust-lang.org%2Fbook%2Fch04-01-what-is-ownership.html&amp;rut=0a1b">What is <b>Ownership</b>? - The Rust Programming Language</a>
      </h2>
      <a class="result__snippet" href="//duckduckgo.com/l/?uddg=https%3A%2F%2Fdoc.rust-lang.org%2Fbook%2F">
        <b>Ownership</b> is a set of rules that govern how a Rust program manages memory.
      </a>
    </div>
  </div>
  <div class="result results_links results_links_deep web-result">
    <div class="links_main links_deep result__body">
      <h2 class="result__title">
        <a rel="nofollow" class="result__a" href="https://en.wikipedia.org/wiki/Rust_(programming_language)">Rust (programming language) - Wikipedia</a>
      </h2>
      <a class="result__snippet">Rust is a general-purpose programming language. Jump to navigation</a>
    </div>
  </div>
  <div class="result results_links results_links_deep web-result">
    <div class="links_main links_deep result__body">
      <h2 class="result__title">
        <a rel="nofollow" class="result__a" href="https://blog.example.org/borrowing">Understanding borrowing</a>
      </h2>
    </div>
  </div>
</div>
</body>
</html>"#;

/// A page DuckDuckGo serves when nothing matches
pub const NO_RESULTS_PAGE: &str = r#"<!DOCTYPE html>
<html><body>
<div id="links" class="results">
  <div class="no-results">No results.</div>
</div>
</body></html>"#;

/// Config pointing at a local mock server
pub fn config_for(base_url: &str) -> AppConfig {
    let mut config = AppConfig::default();
    config.duckduckgo.base_url = base_url.to_string();
    config
}

/// Fetcher with millisecond backoff so retry tests stay fast
pub fn fast_fetcher(config: &AppConfig) -> DuckDuckGoFetcher {
    DuckDuckGoFetcher::new(config)
        .unwrap()
        .with_retry_policy(RetryPolicy::new(3, Duration::from_millis(1)))
}
