//! # Tac-Store
//!
//! Storefront API: catalog queries and Stripe-backed checkout.
//!
//! ## Usage
//!
//! ```bash
//! # Set environment variables
//! export STRIPE_SECRET_KEY=sk_test_...
//! export SITE_URL=https://shop.example.com
//!
//! # Run the server
//! tac-store
//! ```

use shop_api::{routes, state::AppState};
use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(Level::INFO.into())
                .from_env_lossy(),
        )
        .init();

    // Initialize application state
    let state = AppState::new()?;

    let addr = state.config.socket_addr()?;
    let is_prod = state.config.is_production();

    info!("Environment: {}", state.config.environment);
    info!("Products loaded: {}", state.catalog.len());
    info!(
        "Checkout configured: key={}, site_url={}",
        state.checkout.has_stripe_key, state.checkout.has_site_url
    );

    // Create router
    let app = routes::create_router(state);

    // Start server
    info!("Tac-Store starting on http://{}", addr);

    if !is_prod {
        info!("Catalog: GET http://{}/products", addr);
        info!("Checkout: POST http://{}/checkout", addr);
        info!("Status probe: GET http://{}/checkout-status", addr);
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
