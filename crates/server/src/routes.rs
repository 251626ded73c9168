//! Route configuration.

use crate::handlers;
use crate::state::AppState;
use axum::Router;
use axum::routing::{get, post};
use tower_http::trace::TraceLayer;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check (intentionally unauthenticated for probes)
        .route("/api/v1/health", get(handlers::health_check))
        // Block upload control plane
        .route(
            "/api/v1/upload/block/{block}",
            post(handlers::create_block_upload),
        )
        .route(
            "/api/v1/upload/block/{block}/files",
            post(handlers::upload_block_file),
        )
        .route(
            "/api/v1/upload/block/{block}/finish",
            post(handlers::complete_block_upload),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
