pub mod config;
pub mod routes;
pub mod state;

use std::sync::Arc;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Build the service router over shared state.
pub fn app(state: Arc<AppState>) -> Router {
    // Leave headroom above the upload cap for multipart framing.
    let body_limit = state.config.max_upload_size_bytes as usize + 64 * 1024;

    Router::new()
        .route("/", get(routes::base))
        .route("/upload/:project_id", post(routes::upload))
        .route("/process/:project_id", post(routes::process))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
