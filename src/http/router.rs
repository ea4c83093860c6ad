//! Axum router with CORS and request tracing.

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::http::state::AppState;

/// Build the application router.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(handlers::index))
        .route("/health", get(handlers::health))
        .route("/api/personas", get(handlers::personas))
        .route("/api/session", get(handlers::session_state))
        .route("/api/chat", post(handlers::ask))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
