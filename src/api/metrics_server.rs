//! Dedicated Prometheus exposition listener
//!
//! Served on its own bind address so scrapes never contend with API
//! traffic.

use axum::{http::header, response::IntoResponse, routing::get, Router};
use std::net::SocketAddr;

use crate::core::error::Result;
use crate::system::metrics;

/// Creates the metrics router
pub fn create_metrics_app() -> Router {
    Router::new()
        .route("/metrics", get(serve_metrics))
        .route("/healthcheck", get(metrics_healthcheck))
}

async fn serve_metrics() -> impl IntoResponse {
    let body = metrics::collect_metrics();
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        body,
    )
}

async fn metrics_healthcheck() -> &'static str {
    "OK"
}

/// Start the metrics server
pub async fn start_metrics_server(addr: SocketAddr) -> Result<()> {
    tracing::info!("Starting metrics server on {}", addr);

    let app = create_metrics_app();

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn metrics_body_is_text_exposition() {
        metrics::init_registry();
        let response = serve_metrics().await.into_response();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .unwrap()
            .to_str()
            .unwrap()
            .to_string();
        assert!(content_type.starts_with("text/plain"));
    }

    #[tokio::test]
    async fn healthcheck_is_ok() {
        assert_eq!(metrics_healthcheck().await, "OK");
    }
}
