use std::sync::Arc;

use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use super::error::ApiError;
use crate::state::AppState;

/// Response for `GET /stats`
#[derive(Debug, Serialize)]
pub struct StatsResponse {
    /// Completed admissions
    pub total: u64,
    /// Average admission time in microseconds (truncated)
    pub average: u64,
}

/// GET /stats
pub async fn get_stats(State(state): State<Arc<AppState>>) -> Result<Response, ApiError> {
    let snapshot = state.service().stats();
    let body = serde_json::to_vec(&StatsResponse {
        total: snapshot.count,
        average: snapshot.average_micros(),
    })
    .map_err(|e| ApiError::Encoding(e.to_string()))?;

    Ok(([(header::CONTENT_TYPE, "application/json")], body).into_response())
}
