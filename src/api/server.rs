//! HTTP server implementation for the indexd API

use axum::{
    http::{header::CONTENT_TYPE, Method},
    routing::get,
    Router,
};
use std::net::SocketAddr;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{self, AppState};
use crate::core::error::Result;

/// Creates the application router with all routes and middleware
pub fn create_app(state: AppState) -> Router {
    // CORS configuration: the API is read-only
    let cors = CorsLayer::new()
        .allow_methods([Method::GET])
        .allow_headers([CONTENT_TYPE])
        .allow_origin(Any);

    Router::new()
        // Root route
        .route("/", get(handlers::root_handler))
        // Liveness probe
        .route("/healthcheck", get(handlers::healthcheck))
        // Position lookup
        .route("/search/:value", get(handlers::search))
        // System routes
        .route("/api/v1/info", get(handlers::system_info))
        // Apply middleware
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        // Add shared state
        .with_state(state)
}

/// Start the HTTP server
pub async fn start_server(addr: SocketAddr, state: AppState) -> Result<()> {
    tracing::info!("Starting API server on {}", addr);

    let app = create_app(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!("Server listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
