// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::{net::SocketAddr, path::PathBuf, sync::Arc};
use tokio::{io::BufReader, signal};
use tracing::info;

use crate::api::start_server;
use crate::logging;
use crate::mcp::{McpServer, WebSearchTool};
use crate::search::{AppConfig, ProviderRegistry, SearchRequest, SearchService};
use crate::version;

/// DuckDuckGo web search tool server
#[derive(Parser, Debug)]
#[command(name = "web-search-mcp")]
#[command(version = version::VERSION_NUMBER)]
#[command(about = "Web search tool server backed by DuckDuckGo's HTML results page", long_about = None)]
pub struct Cli {
    /// Configuration profile (development, production, test)
    #[arg(long, global = true, env = "APP_ENV", default_value = "production")]
    pub env: String,

    /// Directory holding `<env>.json` config files
    #[arg(long, global = true, default_value = "config")]
    pub config_dir: PathBuf,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Serve the web_search tool over stdin/stdout (default)
    Serve,

    /// Serve the search API over HTTP
    Http {
        /// Listen address
        #[arg(long, default_value = "127.0.0.1:8080")]
        addr: SocketAddr,
    },

    /// Run one search and print the JSON response
    Search {
        /// Search keywords
        query: String,

        /// Maximum number of results
        #[arg(short = 'n', long)]
        max_results: Option<usize>,
    },
}

/// Load config, install logging and build the search service
fn bootstrap(cli: &Cli) -> Result<(AppConfig, Arc<SearchService>)> {
    let config = AppConfig::load_with(&cli.env, Some(cli.config_dir.as_path()), |key| {
        std::env::var(key).ok()
    })
    .with_context(|| format!("failed to load '{}' configuration", cli.env))?;

    logging::init(&config.logging)?;
    info!("{}", version::get_version_string());

    let mut registry = ProviderRegistry::new();
    registry.register_duckduckgo(&config)?;
    let service = Arc::new(SearchService::new(registry.default_provider()?));

    Ok((config, service))
}

async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

/// Execute CLI command
pub async fn execute(cli: Cli) -> Result<()> {
    let (config, service) = bootstrap(&cli)?;

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => {
            let server = Arc::new(McpServer::new(
                WebSearchTool::new(service),
                config.server.clone(),
            ));
            let stdin = BufReader::new(tokio::io::stdin());
            let stdout = tokio::io::stdout();

            info!("Serving web_search over stdio");
            tokio::select! {
                served = server.serve(stdin, stdout) => served?,
                _ = shutdown_signal() => {}
            }
            Ok(())
        }
        Commands::Http { addr } => start_server(service, addr, shutdown_signal()).await,
        Commands::Search { query, max_results } => {
            let request = SearchRequest { query, max_results };
            let response = service.search(&request).await;
            println!("{}", serde_json::to_string_pretty(&response)?);
            Ok(())
        }
    }
}
