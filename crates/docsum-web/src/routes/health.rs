//! Health check endpoints.

use axum::{extract::State, routing::get, Json, Router};
use serde::{Deserialize, Serialize};

use crate::state::AppState;

/// Health check response.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status.
    pub status: String,
    /// Service version.
    pub version: String,
    /// Archive backend (`s3`, `local` or `disabled`).
    pub storage: String,
    /// Seconds since startup.
    pub uptime_secs: i64,
}

/// Version response.
#[derive(Debug, Serialize, Deserialize)]
pub struct VersionResponse {
    pub name: String,
    pub version: String,
}

/// Liveness check. Does not contact the archive store.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        storage: state.storage_backend(),
        uptime_secs: state.uptime_secs(),
    })
}

pub async fn version() -> Json<VersionResponse> {
    Json(VersionResponse {
        name: "docsum".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Create health check routes.
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/version", get(version))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use docsum_core::{AppConfig, DocumentProcessor, Summarizer};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn test_state() -> AppState {
        let config = AppConfig::default();
        let processor = DocumentProcessor::new(&config, Arc::new(Summarizer::default()), None);
        AppState::new(config, processor).unwrap()
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let app = health_routes().with_state(test_state());

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let health: HealthResponse = serde_json::from_slice(&body).unwrap();

        assert_eq!(health.status, "ok");
        assert_eq!(health.storage, "disabled");
        assert!(!health.version.is_empty());
        assert!(health.uptime_secs >= 0);
    }

    #[tokio::test]
    async fn test_version_endpoint() {
        let app = health_routes().with_state(test_state());

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/version")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let version: VersionResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(version.name, "docsum");
        assert_eq!(version.version, env!("CARGO_PKG_VERSION"));
    }
}
