// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use axum::{
    extract::State,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use serde_json::json;
use std::{future::Future, net::SocketAddr, sync::Arc};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::search::search_handler;
use crate::search::SearchService;
use crate::version::{get_version_info, VERSION_NUMBER};

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<SearchService>,
}

pub fn create_router(service: Arc<SearchService>) -> Router {
    let state = AppState { service };

    Router::new()
        // Health check
        .route("/health", get(health_handler))
        // Search endpoint
        .route("/v1/search", post(search_handler))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

/// Serve the HTTP API until `shutdown` resolves
pub async fn start_server<F>(
    service: Arc<SearchService>,
    addr: SocketAddr,
    shutdown: F,
) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = create_router(service);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!("API server listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    Ok(())
}

async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    let status = state.service.status();
    Json(json!({
        "status": if status.available { "ok" } else { "degraded" },
        "provider": status.provider,
        "available": status.available,
        "version": VERSION_NUMBER,
        "server": get_version_info(),
    }))
}
