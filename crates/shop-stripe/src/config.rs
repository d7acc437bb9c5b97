//! # Stripe Configuration
//!
//! Configuration for the Stripe integration, read once at startup from
//! environment variables and passed through application state. Absence of
//! either required variable disables checkout entirely.

use shop_core::StoreError;
use std::env;

/// Env var holding the Stripe secret API key
pub const ENV_SECRET_KEY: &str = "STRIPE_SECRET_KEY";

/// Env var holding the public storefront base URL (redirect target)
pub const ENV_SITE_URL: &str = "SITE_URL";

/// Stripe API configuration
#[derive(Debug, Clone)]
pub struct StripeConfig {
    /// Secret API key (sk_test_... or sk_live_...)
    pub secret_key: String,

    /// Public storefront base URL, used for default redirect URLs
    pub site_url: String,

    /// API base URL (overridable for testing/mocking)
    pub api_base_url: String,

    /// API version header value
    pub api_version: String,
}

impl StripeConfig {
    /// Load configuration from environment variables.
    ///
    /// Required env vars:
    /// - `STRIPE_SECRET_KEY`
    /// - `SITE_URL`
    pub fn from_env() -> Result<Self, StoreError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let secret_key = env::var(ENV_SECRET_KEY)
            .map_err(|_| StoreError::Configuration(format!("{} not set", ENV_SECRET_KEY)))?;

        let site_url = env::var(ENV_SITE_URL)
            .map_err(|_| StoreError::Configuration(format!("{} not set", ENV_SITE_URL)))?;

        if !secret_key.starts_with("sk_test_") && !secret_key.starts_with("sk_live_") {
            return Err(StoreError::Configuration(format!(
                "{} must start with sk_test_ or sk_live_",
                ENV_SECRET_KEY
            )));
        }

        Ok(Self::new(secret_key, site_url))
    }

    /// Create config with explicit values (for testing)
    pub fn new(secret_key: impl Into<String>, site_url: impl Into<String>) -> Self {
        Self {
            secret_key: secret_key.into(),
            site_url: site_url.into(),
            api_base_url: "https://api.stripe.com".to_string(),
            api_version: "2024-06-20".to_string(),
        }
    }

    /// Check if using test keys
    pub fn is_test_mode(&self) -> bool {
        self.secret_key.starts_with("sk_test_")
    }

    /// Get authorization header value
    pub fn auth_header(&self) -> String {
        format!("Bearer {}", self.secret_key)
    }

    /// Builder: set custom API base URL (for testing)
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_modes() {
        let config = StripeConfig::new("sk_test_abc123", "https://shop.example.com");
        assert!(config.is_test_mode());

        let config = StripeConfig::new("sk_live_abc123", "https://shop.example.com");
        assert!(!config.is_test_mode());
    }

    #[test]
    fn test_auth_header() {
        let config = StripeConfig::new("sk_test_abc123", "https://shop.example.com");
        assert_eq!(config.auth_header(), "Bearer sk_test_abc123");
    }

    #[test]
    fn test_base_url_override() {
        let config = StripeConfig::new("sk_test_abc", "https://shop.example.com")
            .with_api_base_url("http://127.0.0.1:9999");
        assert_eq!(config.api_base_url, "http://127.0.0.1:9999");
    }
}
