// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Tracing subscriber setup
//!
//! All output goes to stderr; stdout carries the stdio tool transport.
//! `RUST_LOG` takes precedence over the configured level.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::search::config::{LogFormat, LoggingConfig};

/// Filter directive used when `RUST_LOG` is unset
///
/// Dependency crates are held at `warn` so request-level noise from the
/// HTTP stack does not drown the search events.
pub fn default_directive(config: &LoggingConfig) -> String {
    let level = config.level.as_str();
    format!(
        "{level},hyper=warn,reqwest=warn,html5ever=warn,selectors=warn,tower_http={level}"
    )
}

fn env_filter(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive(config)))
}

/// Install the global subscriber; fails if one is already set
pub fn init(config: &LoggingConfig) -> anyhow::Result<()> {
    let filter = env_filter(config);

    let installed = match config.format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_ansi(false),
            )
            .try_init(),
        LogFormat::Simple => tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(false)
                    .with_ansi(config.colorize),
            )
            .try_init(),
    };

    installed.map_err(|e| anyhow::anyhow!("tracing setup failed: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::config::LogLevel;

    #[test]
    fn test_default_directive_uses_level() {
        let config = LoggingConfig {
            level: LogLevel::Debug,
            ..LoggingConfig::default()
        };
        let directive = default_directive(&config);
        assert!(directive.starts_with("debug,"));
        assert!(directive.contains("reqwest=warn"));
        assert!(EnvFilter::try_new(&directive).is_ok());
    }

    #[test]
    fn test_every_level_builds_a_filter() {
        for level in [LogLevel::Error, LogLevel::Warn, LogLevel::Info, LogLevel::Debug] {
            let config = LoggingConfig {
                level,
                format: LogFormat::Simple,
                ..LoggingConfig::default()
            };
            let directive = default_directive(&config);
            assert!(directive.starts_with(&format!("{},", level.as_str())));
            assert!(directive.ends_with(&format!("tower_http={}", level.as_str())));
            assert!(EnvFilter::try_new(&directive).is_ok());
        }
    }
}
