//! # Application State
//!
//! Shared state for the Axum application: server config, the read-only
//! product catalog, and checkout availability.
//!
//! All environment reads happen here, once, at startup. Handlers receive
//! explicit state instead of touching globals, so tests can inject fake
//! configurations and payment services.

use shop_core::{BoxedPaymentSessionService, Catalog, StoreError, StoreResult};
use shop_stripe::{StripeConfig, StripeSessionService, ENV_SECRET_KEY, ENV_SITE_URL};
use std::sync::Arc;

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Environment (development, staging, production)
    pub environment: String,
}

impl AppConfig {
    /// Load from environment variables
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            host: std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
        }
    }

    /// Get the socket address to bind to
    pub fn socket_addr(&self) -> StoreResult<std::net::SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|_| {
                StoreError::Configuration(format!(
                    "invalid bind address {}:{}",
                    self.host, self.port
                ))
            })
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

/// Whether checkout is available, and the service to use when it is.
///
/// Either required variable being absent disables checkout: the status
/// probe reports which one, and POST /checkout fails fast without ever
/// touching the payment processor.
#[derive(Clone)]
pub struct CheckoutAvailability {
    service: Option<BoxedPaymentSessionService>,
    site_url: Option<String>,
    /// STRIPE_SECRET_KEY present
    pub has_stripe_key: bool,
    /// SITE_URL present
    pub has_site_url: bool,
}

impl CheckoutAvailability {
    /// Build from the environment: construct the Stripe service only when
    /// both required variables are present and valid.
    pub fn from_env() -> Self {
        let has_stripe_key = std::env::var(ENV_SECRET_KEY).is_ok();
        let has_site_url = std::env::var(ENV_SITE_URL).is_ok();

        match StripeConfig::from_env() {
            Ok(config) => {
                let site_url = config.site_url.clone();
                Self {
                    service: Some(Arc::new(StripeSessionService::new(config))),
                    site_url: Some(site_url),
                    has_stripe_key,
                    has_site_url,
                }
            }
            Err(e) => {
                tracing::warn!("Checkout disabled: {}", e);
                Self {
                    service: None,
                    site_url: None,
                    has_stripe_key,
                    has_site_url,
                }
            }
        }
    }

    /// Availability with an explicit service (tests, alternate providers)
    pub fn with_service(service: BoxedPaymentSessionService, site_url: impl Into<String>) -> Self {
        Self {
            service: Some(service),
            site_url: Some(site_url.into()),
            has_stripe_key: true,
            has_site_url: true,
        }
    }

    /// Availability with nothing configured
    pub fn disabled() -> Self {
        Self {
            service: None,
            site_url: None,
            has_stripe_key: false,
            has_site_url: false,
        }
    }

    /// Get the service and site URL, or the configuration error naming
    /// the first missing variable.
    pub fn require(&self) -> StoreResult<(BoxedPaymentSessionService, &str)> {
        if !self.has_stripe_key {
            return Err(StoreError::Configuration(format!(
                "{} not set",
                ENV_SECRET_KEY
            )));
        }
        if !self.has_site_url {
            return Err(StoreError::Configuration(format!("{} not set", ENV_SITE_URL)));
        }

        match (&self.service, &self.site_url) {
            (Some(service), Some(site_url)) => Ok((Arc::clone(service), site_url)),
            _ => Err(StoreError::Configuration(
                "checkout service not initialized".to_string(),
            )),
        }
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Application config
    pub config: AppConfig,
    /// Product catalog (read-only after load)
    pub catalog: Arc<Catalog>,
    /// Checkout availability and payment service
    pub checkout: CheckoutAvailability,
}

impl AppState {
    /// Create state from the environment
    pub fn new() -> anyhow::Result<Self> {
        let config = AppConfig::from_env();
        let catalog = Arc::new(load_catalog());
        let checkout = CheckoutAvailability::from_env();

        Ok(Self {
            config,
            catalog,
            checkout,
        })
    }

    /// Create state with explicit parts (tests)
    pub fn with_parts(catalog: Catalog, checkout: CheckoutAvailability) -> Self {
        Self {
            config: AppConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
                environment: "test".to_string(),
            },
            catalog: Arc::new(catalog),
            checkout,
        }
    }
}

/// Load product catalog from config file, falling back to the built-in set
fn load_catalog() -> Catalog {
    let config_paths = [
        "config/products.toml",
        "../config/products.toml",
        "../../config/products.toml",
    ];

    for path in config_paths {
        if let Ok(content) = std::fs::read_to_string(path) {
            match Catalog::from_toml(&content) {
                Ok(catalog) => {
                    tracing::info!("Loaded {} products from {}", catalog.len(), path);
                    return catalog;
                }
                Err(e) => {
                    tracing::warn!("Failed to parse {}: {}", path, e);
                }
            }
        }
    }

    let catalog = Catalog::builtin();
    tracing::info!("Using built-in catalog ({} products)", catalog.len());
    catalog
}
