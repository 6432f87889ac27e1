use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use super::middleware::{admission_timing, metrics_middleware};
use super::{handlers, hash, shutdown, stats};
use crate::state::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Hashing
        .route(
            "/hash",
            post(hash::admit).route_layer(middleware::from_fn_with_state(
                state.clone(),
                admission_timing,
            )),
        )
        .route("/hash/", get(hash::lookup_missing_id))
        .route("/hash/{*id}", get(hash::lookup))
        // Stats and lifecycle
        .route("/stats", get(stats::get_stats))
        .route("/shutdown", get(shutdown::shutdown).post(shutdown::shutdown))
        // Operations
        .route("/health", get(handlers::health))
        .route("/config", get(handlers::get_config))
        .route("/metrics", get(handlers::metrics))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
