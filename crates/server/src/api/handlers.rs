use axum::{extract::State, http::header, response::IntoResponse, Json};
use hasher_core::Config;
use serde::Serialize;
use std::sync::Arc;

use super::error::ApiError;
use crate::metrics::{collect_dynamic_metrics, encode_metrics};
use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub state: String,
    pub pending_jobs: usize,
}

pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let service = state.service();
    Json(HealthResponse {
        status: "ok".to_string(),
        state: service.state().as_str().to_string(),
        pending_jobs: service.pending_jobs(),
    })
}

pub async fn get_config(State(state): State<Arc<AppState>>) -> Json<Config> {
    Json(state.config().clone())
}

/// GET /metrics
///
/// Prometheus text exposition.
pub async fn metrics(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, ApiError> {
    collect_dynamic_metrics(&state);
    let body = encode_metrics().map_err(|e| ApiError::Encoding(e.to_string()))?;
    Ok((
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        body,
    ))
}
