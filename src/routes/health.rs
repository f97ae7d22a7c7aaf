//! Health check endpoints for liveness and readiness probes.

use axum::{extract::State, Json};
use serde::Serialize;

use crate::errors::ApiResponse;
use crate::AppState;

/// Readiness probe detail.
#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: String,
    /// Number of response groups currently loaded.
    pub templates: usize,
}

/// Liveness probe — always returns OK if the process is running.
pub async fn live() -> &'static str {
    "OK"
}

/// Readiness probe — reports how many templates the store is serving.
pub async fn ready(State(state): State<AppState>) -> Json<ApiResponse<HealthStatus>> {
    let templates = state.store.len();
    if templates == 0 {
        tracing::warn!("Store has no response groups loaded");
    }

    ApiResponse::success(HealthStatus {
        status: "ok".to_string(),
        templates,
    })
}
