//! Riddle Quest - chat-driven riddle relay
//!
//! Serves a small chat UI, runs one riddle session per client and relays
//! riddle lookups and answers to the upstream riddle service.

mod api;
mod backend;
mod config;
mod proxy;
mod runtime;
mod session;

use api::{create_router, AppState};
use backend::{HttpBackend, LoggingBackend, RiddleBackend};
use config::Config;
use proxy::RiddleProxy;
use std::net::SocketAddr;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "riddle_quest=info,tower_http=debug".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false),
        )
        .init();

    // Configuration
    let config = Config::from_env()?;
    tracing::info!(backend_url = %config.backend_url, "Configured riddle backend");

    let http_backend: Arc<dyn RiddleBackend> = Arc::new(HttpBackend::new(config.backend_url)?);
    let backend: Arc<dyn RiddleBackend> = Arc::new(LoggingBackend::new(http_backend));

    // Create application state
    let state = AppState::new(RiddleProxy::new(backend));

    // Create router
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let compression = CompressionLayer::new()
        .gzip(true)
        .br(true)
        .deflate(true)
        .zstd(true);

    let app = create_router(state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(cors)
            .layer(compression),
    );

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Riddle Quest server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
