//! # shop-core
//!
//! Core types and logic for the tac-store storefront engine.
//!
//! This crate provides:
//! - `Product`, `Category`, and `Catalog` for the read-only product catalog
//! - `CatalogQuery` for filter/search/sort over the catalog
//! - `Cart` and `CartSummary` for ephemeral cart state
//! - `CheckoutRequest` for normalizing client line items into a
//!   payment-session request
//! - `PaymentSessionService` trait for the external payment processor
//! - `StoreError` for typed error handling
//!
//! ## Example
//!
//! ```rust,ignore
//! use shop_core::{Cart, Catalog, CatalogQuery, Category, SortKey};
//!
//! let catalog = Catalog::builtin();
//!
//! // Query the catalog
//! let results = CatalogQuery::all()
//!     .with_category(Category::Medical)
//!     .with_sort(SortKey::PriceAsc)
//!     .apply(&catalog);
//!
//! // Derive a cart summary
//! let mut cart = Cart::new();
//! cart.add("ifak-lite");
//! let summary = cart.summary(&catalog);
//! ```

pub mod cart;
pub mod checkout;
pub mod error;
pub mod product;
pub mod query;

// Re-exports for convenience
pub use cart::{Cart, CartSummary};
pub use checkout::{
    smoke_test_items, to_minor_units, BoxedPaymentSessionService, CheckoutRequest, LineItem,
    PaymentSession, PaymentSessionService, RawLineItem, RedirectUrls, CURRENCY, MAX_UNIT_AMOUNT,
};
pub use error::{StoreError, StoreResult};
pub use product::{Catalog, Category, Product};
pub use query::{CatalogQuery, CategoryFilter, SortKey};
