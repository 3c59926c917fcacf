//! Router configuration for the web server.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;

use super::handlers;
use super::AppState;

/// Create the main router with all routes.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index).post(handlers::analyze_form))
        .route("/api/analyze", post(handlers::api_analyze))
        .route("/health", get(handlers::health))
        .route("/static/style.css", get(handlers::serve_css))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
