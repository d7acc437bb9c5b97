//! # Routes
//!
//! Axum router configuration for the storefront API.

use crate::handlers;
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// Create the main application router
///
/// Routes:
/// - GET  /               - Health check
/// - GET  /health         - Health check
/// - GET  /products       - Catalog query (q, category, sort params)
/// - GET  /checkout-status - Config probe; ?test=1 runs the smoke test
/// - POST /checkout       - Create a checkout session
pub fn create_router(state: AppState) -> Router {
    // Storefront is served from another origin, so allow-all CORS
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(handlers::health))
        .route("/health", get(handlers::health))
        .route("/products", get(handlers::list_products))
        .route("/checkout-status", get(handlers::checkout_status))
        .route("/checkout", post(handlers::create_checkout))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
