// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use super::embed::{embed_batch_handler, embed_handler};
use super::handlers::{health_handler, models_handler};
use crate::config::ServerConfig;
use crate::embeddings::EmbeddingService;

/// Default request body limit (32MB)
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 32 * 1024 * 1024;

/// State shared by every handler
#[derive(Debug, Clone)]
pub struct AppState {
    pub service: Arc<EmbeddingService>,
    pub max_upload_bytes: usize,
}

impl AppState {
    pub fn new(service: Arc<EmbeddingService>) -> Self {
        Self {
            service,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }

    pub fn with_max_upload_bytes(mut self, max_upload_bytes: usize) -> Self {
        self.max_upload_bytes = max_upload_bytes;
        self
    }
}

/// Build the router with all routes and middleware
pub fn create_app(state: Arc<AppState>) -> Router {
    let body_limit = state.max_upload_bytes;

    Router::new()
        // Health check
        .route("/health", get(health_handler))
        // Model catalog
        .route("/models", get(models_handler))
        // Embedding endpoints
        .route("/embed", post(embed_handler))
        .route("/embed/batch", post(embed_batch_handler))
        .with_state(state)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
}

/// Bind the listener and serve until Ctrl-C
pub async fn start_server(config: &ServerConfig, service: Arc<EmbeddingService>) -> anyhow::Result<()> {
    let state = AppState::new(service).with_max_upload_bytes(config.max_upload_bytes);
    let app = create_app(Arc::new(state));

    let listener = tokio::net::TcpListener::bind((config.host.as_str(), config.port)).await?;
    let addr = listener.local_addr()?;

    info!("Starting server on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
