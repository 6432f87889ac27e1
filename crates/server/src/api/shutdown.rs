use std::sync::Arc;

use axum::extract::State;
use tracing::info;

use crate::state::AppState;

/// GET|POST /shutdown
///
/// Stop accepting work and let the process exit once pending jobs drain.
/// Repeated calls are harmless.
pub async fn shutdown(State(state): State<Arc<AppState>>) -> &'static str {
    if state.service().shutdown().trigger() {
        info!("Shutdown requested over HTTP");
    }
    "shutting down"
}
