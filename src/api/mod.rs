//! # API Module
//!
//! This module provides the HTTP interface for indexd:
//! - `GET /` - service banner (name and version)
//! - `GET /healthcheck` - liveness probe
//! - `GET /search/:value` - position lookup; 404 when no match
//! - `GET /api/v1/info` - snapshot size and refresh information
//!
//! A dedicated metrics listener serves `GET /metrics` (Prometheus text
//! exposition) and its own `/healthcheck` on a separate bind address.

pub mod handlers;
pub mod metrics_server;
pub mod server;

// Re-export commonly used items
pub use handlers::AppState;
pub use metrics_server::start_metrics_server;
pub use server::{create_app, start_server};
