//! # shop-stripe
//!
//! Stripe payment-session service for tac-store-rs.
//!
//! Implements `shop_core::PaymentSessionService` against Stripe's Checkout
//! Sessions API. Configuration comes from two environment variables:
//! `STRIPE_SECRET_KEY` and `SITE_URL`.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use shop_stripe::StripeSessionService;
//! use shop_core::{CheckoutRequest, PaymentSessionService};
//!
//! let service = StripeSessionService::from_env()?;
//! let session = service.create_session(&request).await?;
//!
//! // Redirect customer to session.url
//! ```

pub mod config;
pub mod session;

// Re-exports
pub use config::{StripeConfig, ENV_SECRET_KEY, ENV_SITE_URL};
pub use session::StripeSessionService;
