//! # Store Error Types
//!
//! Typed error handling for the storefront engine.
//! All fallible operations return `Result<T, StoreError>`.

use thiserror::Error;

/// Core error type for catalog and checkout operations
#[derive(Debug, Error)]
pub enum StoreError {
    /// Missing or invalid deployment configuration (env vars)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Malformed client input (fixable by the caller)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Product not found in catalog
    #[error("Product not found: {product_id}")]
    ProductNotFound { product_id: String },

    /// Payment processor API error
    #[error("Processor error [{provider}]: {message}")]
    Processor { provider: String, message: String },

    /// Network/HTTP failure communicating with the processor
    #[error("Network error: {0}")]
    Network(String),

    /// Processor call exceeded the bounded timeout
    #[error("Upstream timeout after {secs}s")]
    UpstreamTimeout { secs: u64 },

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl StoreError {
    /// Short category label used as the `error` field of error responses
    pub fn summary(&self) -> &'static str {
        match self {
            StoreError::Configuration(_) => "Configuration error",
            StoreError::InvalidRequest(_) => "Checkout error",
            StoreError::ProductNotFound { .. } => "Product not found",
            StoreError::Processor { .. } => "Payment processor error",
            StoreError::Network(_) => "Network error",
            StoreError::UpstreamTimeout { .. } => "Upstream timeout",
            StoreError::Serialization(_) => "Serialization error",
        }
    }

    /// Returns the HTTP status code appropriate for this error.
    ///
    /// Client mistakes map to 4xx, deployment and upstream failures to 5xx,
    /// so callers can distinguish "fix your request" from "try again later".
    pub fn status_code(&self) -> u16 {
        match self {
            StoreError::Configuration(_) => 500,
            StoreError::InvalidRequest(_) => 400,
            StoreError::ProductNotFound { .. } => 404,
            StoreError::Processor { .. } => 502,
            StoreError::Network(_) => 503,
            StoreError::UpstreamTimeout { .. } => 504,
            StoreError::Serialization(_) => 500,
        }
    }
}

/// Result type alias for store operations
pub type StoreResult<T> = Result<T, StoreError>;
