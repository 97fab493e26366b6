// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Configuration for the web search server
//!
//! Values are layered: built-in defaults, then the environment profile
//! (`development`, `production`, `test`), then an optional
//! `config/{environment}.json` file, then individual environment variables.
//! The merged result is validated once and treated as read-only afterwards.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use url::Url;

use super::retry::RetryPolicy;
use super::types::{ErrorCode, MAX_RESULTS_LIMIT};

pub const DEFAULT_ENVIRONMENT: &str = "production";
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

const DEFAULT_PROXY_HOST: &str = "127.0.0.1";
const DEFAULT_PROXY_PORT: u16 = 7897;
const MAX_RETRY_ATTEMPTS: u32 = 5;

/// Proxy variables, checked in order
const PROXY_VARS: &[&str] = &["HTTPS_PROXY", "https_proxy", "HTTP_PROXY", "http_proxy"];

/// Errors raised while loading or validating configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Configuration validation failed: {0}")]
    Validation(String),

    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

impl ConfigError {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Validation(_) => ErrorCode::ConfigValidationFailed,
            _ => ErrorCode::ConfigInvalid,
        }
    }
}

/// Server identity reported to tool clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub name: String,
    pub version: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            name: crate::version::SERVER_NAME.to_string(),
            version: crate::version::VERSION_NUMBER.to_string(),
        }
    }
}

/// Search behaviour
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SearchConfig {
    /// Default result count (1..=20)
    pub max_results: usize,
    /// Overall request timeout in milliseconds
    #[serde(rename = "timeout")]
    pub timeout_ms: u64,
    /// Fetch attempts (0..=5, 0 runs once)
    pub retry_attempts: u32,
    /// Base backoff delay in milliseconds
    #[serde(rename = "retryDelay")]
    pub retry_delay_ms: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_results: 10,
            timeout_ms: 30_000,
            retry_attempts: 3,
            retry_delay_ms: 1000,
        }
    }
}

/// Target engine endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DuckDuckGoConfig {
    pub base_url: String,
    pub html_path: String,
    pub user_agent: String,
}

impl Default for DuckDuckGoConfig {
    fn default() -> Self {
        Self {
            base_url: "https://duckduckgo.com".to_string(),
            html_path: "/html/".to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

/// HTTP client settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HttpConfig {
    #[serde(rename = "timeout")]
    pub timeout_ms: u64,
    pub max_redirects: usize,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 30_000,
            max_redirects: 5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
}

impl LogLevel {
    /// Directive understood by `tracing_subscriber::EnvFilter`
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Json,
    Simple,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: LogLevel,
    pub format: LogFormat,
    pub colorize: bool,
}

/// Outbound proxy, read from the standard proxy environment variables
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProxyConfig {
    pub scheme: String,
    pub host: String,
    pub port: u16,
}

impl ProxyConfig {
    /// Parse a proxy value such as `http://10.0.0.1:3128` or `proxy.local:8080`
    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        let candidate = if raw.contains("://") {
            raw.to_string()
        } else {
            format!("http://{}", raw)
        };

        let url = Url::parse(&candidate)
            .map_err(|e| ConfigError::Invalid(format!("Invalid proxy URL {}: {}", raw, e)))?;

        let host = url
            .host_str()
            .filter(|h| !h.is_empty())
            .unwrap_or(DEFAULT_PROXY_HOST)
            .to_string();

        Ok(Self {
            scheme: url.scheme().to_string(),
            host,
            port: url.port().unwrap_or(DEFAULT_PROXY_PORT),
        })
    }

    /// First non-empty proxy variable, HTTPS before HTTP
    pub fn from_lookup<F>(lookup: F) -> Result<Option<Self>, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        PROXY_VARS
            .iter()
            .find_map(|var| lookup(*var).filter(|v| !v.trim().is_empty()))
            .map(|raw| Self::parse(raw.trim()))
            .transpose()
    }

    pub fn url(&self) -> String {
        format!("{}://{}:{}", self.scheme, self.host, self.port)
    }
}

/// Complete server configuration
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub search: SearchConfig,
    pub duckduckgo: DuckDuckGoConfig,
    pub http: HttpConfig,
    pub logging: LoggingConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proxy: Option<ProxyConfig>,
}

impl AppConfig {
    /// Load using `APP_ENV` (default `production`) and the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        let environment = env::var("APP_ENV").unwrap_or_else(|_| DEFAULT_ENVIRONMENT.to_string());
        Self::load(&environment)
    }

    /// Load the given environment profile from `./config` and the process environment
    pub fn load(environment: &str) -> Result<Self, ConfigError> {
        Self::load_with(environment, Some(Path::new("config")), |key| env::var(key).ok())
    }

    /// Load with an explicit config directory and variable lookup
    pub fn load_with<F>(
        environment: &str,
        config_dir: Option<&Path>,
        lookup: F,
    ) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut merged = serde_json::to_value(Self::default())?;

        if let Some(profile) = environment_profile(environment) {
            merge_deep(&mut merged, profile);
        }

        if let Some(dir) = config_dir {
            let path = dir.join(format!("{}.json", environment));
            if path.exists() {
                let raw = std::fs::read_to_string(&path).map_err(|source| ConfigError::Io {
                    path: path.clone(),
                    source,
                })?;
                let file_value: Value = serde_json::from_str(&raw).map_err(|e| {
                    ConfigError::Invalid(format!("Failed to load config file {}: {}", path.display(), e))
                })?;
                merge_deep(&mut merged, file_value);
            }
        }

        apply_env_overrides(&mut merged, &lookup);

        let mut config: Self = serde_json::from_value(merged)?;
        config.proxy = ProxyConfig::from_lookup(&lookup)?;
        config.validate()?;
        Ok(config)
    }

    /// Check every field; all problems are reported together
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut problems = Vec::new();

        if self.server.name.trim().is_empty() {
            problems.push("server.name must not be empty".to_string());
        }
        if self.server.version.trim().is_empty() {
            problems.push("server.version must not be empty".to_string());
        }
        if !(1..=MAX_RESULTS_LIMIT).contains(&self.search.max_results) {
            problems.push(format!(
                "search.maxResults must be between 1 and {}",
                MAX_RESULTS_LIMIT
            ));
        }
        if self.search.timeout_ms == 0 {
            problems.push("search.timeout must be positive".to_string());
        }
        if self.search.retry_attempts > MAX_RETRY_ATTEMPTS {
            problems.push(format!(
                "search.retryAttempts must be at most {}",
                MAX_RETRY_ATTEMPTS
            ));
        }
        if Url::parse(&self.duckduckgo.base_url).is_err() {
            problems.push("duckduckgo.baseUrl must be an absolute URL".to_string());
        }
        if !self.duckduckgo.html_path.starts_with('/') {
            problems.push("duckduckgo.htmlPath must start with '/'".to_string());
        }
        if self.duckduckgo.user_agent.trim().is_empty() {
            problems.push("duckduckgo.userAgent must not be empty".to_string());
        }
        if self.http.timeout_ms == 0 {
            problems.push("http.timeout must be positive".to_string());
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(problems.join("; ")))
        }
    }

    /// Backoff policy for fetch attempts
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.search.retry_attempts,
            Duration::from_millis(self.search.retry_delay_ms),
        )
    }

    /// Effective client timeout: the tighter of the HTTP and search limits
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.http.timeout_ms.min(self.search.timeout_ms))
    }
}

fn environment_profile(environment: &str) -> Option<Value> {
    match environment {
        "development" => Some(json!({
            "logging": { "level": "debug", "format": "simple", "colorize": true },
            "search": { "timeout": 60000 },
        })),
        "production" => Some(json!({
            "logging": { "level": "info", "format": "json", "colorize": false },
            "search": { "timeout": 30000 },
        })),
        "test" => Some(json!({
            "logging": { "level": "error", "format": "simple" },
            "search": { "maxResults": 5, "timeout": 10000, "retryAttempts": 1 },
        })),
        _ => None,
    }
}

/// Recursively merge `source` into `target`; non-object values replace
fn merge_deep(target: &mut Value, source: Value) {
    match (target, source) {
        (Value::Object(target), Value::Object(source)) => {
            for (key, value) in source {
                let nested = value.is_object() && target.get(&key).map_or(false, Value::is_object);
                match target.get_mut(&key) {
                    Some(existing) if nested => merge_deep(existing, value),
                    _ => {
                        target.insert(key, value);
                    }
                }
            }
        }
        (target, source) => *target = source,
    }
}

fn apply_env_overrides<F>(config: &mut Value, lookup: &F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(level) = lookup("LOG_LEVEL").filter(|v| !v.is_empty()) {
        merge_deep(config, json!({ "logging": { "level": level.to_lowercase() } }));
    }
    if let Some(max) = lookup("MAX_RESULTS").and_then(|v| v.trim().parse::<u64>().ok()) {
        merge_deep(config, json!({ "search": { "maxResults": max } }));
    }
    if let Some(timeout) = lookup("SEARCH_TIMEOUT").and_then(|v| v.trim().parse::<u64>().ok()) {
        merge_deep(config, json!({ "search": { "timeout": timeout } }));
    }
}
