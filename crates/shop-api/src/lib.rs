//! # shop-api
//!
//! HTTP API layer for tac-store-rs.
//!
//! This crate provides:
//! - Axum-based HTTP server
//! - Catalog query endpoint
//! - Checkout endpoint delegating to the payment processor
//! - Diagnostic configuration probe
//!
//! ## Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | GET | `/health` | Health check |
//! | GET | `/products` | Query the catalog |
//! | GET | `/checkout-status` | Config probe / smoke test |
//! | POST | `/checkout` | Create checkout session |

pub mod handlers;
pub mod routes;
pub mod state;

pub use routes::create_router;
pub use state::{AppConfig, AppState, CheckoutAvailability};
