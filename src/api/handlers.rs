//! HTTP request handlers for the indexd API

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use serde::Serialize;
use std::sync::Arc;
use std::time::{Instant, UNIX_EPOCH};
use tracing::debug;

use crate::index::IndexManager;
use crate::system::metrics::Metrics;

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    /// Index manager answering lookups
    pub index: Arc<IndexManager>,
    /// Process start time, for uptime reporting
    pub started_at: Instant,
}

/// Body of a successful search response
#[derive(Debug, Serialize)]
pub struct SearchResponse {
    /// Position of the value in the dataset
    pub index: usize,
}

/// Body of an error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Human-readable reason
    pub error: String,
}

/// Service information returned by the info endpoint
#[derive(Debug, Serialize)]
pub struct InfoResponse {
    /// Service name
    pub name: String,
    /// Service version
    pub version: String,
    /// Number of values in the published snapshot
    pub snapshot_size: usize,
    /// Unix time of the last successful refresh, if any
    pub last_refresh_unix: Option<u64>,
    /// Seconds since process start
    pub uptime_seconds: u64,
}

/// Service banner: name and version
pub async fn root_handler() -> String {
    format!("{} v{}", crate::NAME, crate::VERSION)
}

/// Liveness probe
pub async fn healthcheck() -> &'static str {
    "WORKING"
}

/// Look up the position of a value in the dataset
///
/// Returns `200` with the position, `404` when neither an exact nor a
/// tolerant match exists, and `400` for a non-integer parameter.
pub async fn search(
    State(state): State<AppState>,
    Path(value): Path<String>,
) -> Result<Json<SearchResponse>, (StatusCode, Json<ErrorResponse>)> {
    let metrics = Metrics::global();
    metrics.http.search_requests.inc();

    let value: i64 = match value.parse() {
        Ok(value) => value,
        Err(_) => {
            metrics.http.invalid_requests.inc();
            return Err((
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: "Invalid value parameter".to_string(),
                }),
            ));
        }
    };

    match state.index.lookup(value) {
        Some(index) => Ok(Json(SearchResponse { index })),
        None => {
            debug!(value, "position not found");
            Err((
                StatusCode::NOT_FOUND,
                Json(ErrorResponse {
                    error: "Position not found".to_string(),
                }),
            ))
        }
    }
}

/// Snapshot and process information
pub async fn system_info(State(state): State<AppState>) -> Json<InfoResponse> {
    let last_refresh_unix = state
        .index
        .last_refreshed()
        .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
        .map(|d| d.as_secs());

    Json(InfoResponse {
        name: crate::NAME.to_string(),
        version: crate::VERSION.to_string(),
        snapshot_size: state.index.snapshot_len(),
        last_refresh_unix,
        uptime_seconds: state.started_at.elapsed().as_secs(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::DatasetConfig;
    use std::io::Write;
    use std::time::Duration;
    use tempfile::NamedTempFile;

    async fn state_with_dataset(content: &str) -> (AppState, NamedTempFile) {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();

        let manager = Arc::new(IndexManager::new(&DatasetConfig {
            path: file.path().to_path_buf(),
            refresh_interval: Duration::from_secs(3600),
            read_timeout: Duration::from_secs(5),
        }));
        manager.refresh().await.unwrap();

        (
            AppState {
                index: manager,
                started_at: Instant::now(),
            },
            file,
        )
    }

    #[test]
    fn responses_serialize_to_the_wire_contract() {
        let hit = serde_json::to_value(SearchResponse { index: 2 }).unwrap();
        assert_eq!(hit, serde_json::json!({"index": 2}));

        let miss = serde_json::to_value(ErrorResponse {
            error: "Position not found".to_string(),
        })
        .unwrap();
        assert_eq!(miss, serde_json::json!({"error": "Position not found"}));
    }

    #[tokio::test]
    async fn search_returns_the_position() {
        let (state, _file) = state_with_dataset("10\n20\n30\n").await;

        let response = search(State(state), Path("20".to_string())).await.unwrap();
        assert_eq!(response.0.index, 1);
    }

    #[tokio::test]
    async fn search_accepts_within_tolerance() {
        let (state, _file) = state_with_dataset("10\n20\n30\n").await;

        let response = search(State(state), Path("21".to_string())).await.unwrap();
        assert_eq!(response.0.index, 1);
    }

    #[tokio::test]
    async fn search_misses_with_not_found() {
        let (state, _file) = state_with_dataset("10\n20\n30\n").await;

        let err = search(State(state), Path("50".to_string()))
            .await
            .unwrap_err();
        assert_eq!(err.0, StatusCode::NOT_FOUND);
        assert_eq!(err.1 .0.error, "Position not found");
    }

    #[tokio::test]
    async fn search_rejects_non_integer_parameter() {
        let (state, _file) = state_with_dataset("10\n20\n30\n").await;

        let err = search(State(state), Path("abc".to_string()))
            .await
            .unwrap_err();
        assert_eq!(err.0, StatusCode::BAD_REQUEST);
        assert_eq!(err.1 .0.error, "Invalid value parameter");
    }

    #[tokio::test]
    async fn search_handles_negative_values() {
        let (state, _file) = state_with_dataset("-30\n-20\n-10\n").await;

        let response = search(State(state.clone()), Path("-20".to_string()))
            .await
            .unwrap();
        assert_eq!(response.0.index, 1);

        // Near-misses on negative targets never pass the tolerance check
        let err = search(State(state), Path("-19".to_string()))
            .await
            .unwrap_err();
        assert_eq!(err.0, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn healthcheck_reports_working() {
        assert_eq!(healthcheck().await, "WORKING");
    }

    #[tokio::test]
    async fn info_reports_snapshot_state() {
        let (state, _file) = state_with_dataset("10\n20\n30\n").await;

        let info = system_info(State(state)).await;
        assert_eq!(info.0.name, crate::NAME);
        assert_eq!(info.0.snapshot_size, 3);
        assert!(info.0.last_refresh_unix.is_some());
    }
}
