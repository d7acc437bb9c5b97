//! # Stripe Checkout Sessions
//!
//! `PaymentSessionService` implementation backed by Stripe's Checkout
//! Sessions API. One form-encoded POST per checkout; the response carries
//! the hosted payment page URL the customer is redirected to.
//!
//! No retries: session creation is not blindly retry-safe, so failures are
//! surfaced to the caller. The request id is sent as the idempotency key.

use crate::config::StripeConfig;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use shop_core::{
    CheckoutRequest, PaymentSession, PaymentSessionService, StoreError, StoreResult, CURRENCY,
};
use std::time::Duration;
use tracing::{debug, error, info, instrument};

/// Per-request timeout for the Stripe API call, in seconds.
/// Exceeding it surfaces as `StoreError::UpstreamTimeout`.
const REQUEST_TIMEOUT_SECS: u64 = 20;

/// Stripe Checkout Sessions payment service.
///
/// Uses Stripe's hosted checkout page, so no card data touches this
/// process.
pub struct StripeSessionService {
    config: StripeConfig,
    client: Client,
    request_timeout: Duration,
}

impl StripeSessionService {
    /// Create a new service from explicit config
    pub fn new(config: StripeConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            config,
            client,
            request_timeout: Duration::from_secs(REQUEST_TIMEOUT_SECS),
        }
    }

    /// Builder: set the per-request timeout (for testing)
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Create from environment variables
    pub fn from_env() -> StoreResult<Self> {
        let config = StripeConfig::from_env()?;
        Ok(Self::new(config))
    }

    /// Build the form-encoded body for the Checkout Sessions API
    fn build_form(&self, request: &CheckoutRequest) -> Vec<(String, String)> {
        let mut form: Vec<(String, String)> = vec![
            ("mode".to_string(), "payment".to_string()),
            ("success_url".to_string(), request.success_url.clone()),
            ("cancel_url".to_string(), request.cancel_url.clone()),
        ];

        for (i, item) in request.line_items.iter().enumerate() {
            form.push((
                format!("line_items[{}][price_data][currency]", i),
                CURRENCY.to_string(),
            ));
            form.push((
                format!("line_items[{}][price_data][unit_amount]", i),
                item.unit_amount.to_string(),
            ));
            form.push((
                format!("line_items[{}][price_data][product_data][name]", i),
                item.name.clone(),
            ));
            form.push((
                format!("line_items[{}][quantity]", i),
                item.quantity.to_string(),
            ));
        }

        form
    }
}

#[async_trait]
impl PaymentSessionService for StripeSessionService {
    #[instrument(skip(self, request), fields(request_id = %request.id))]
    async fn create_session(&self, request: &CheckoutRequest) -> StoreResult<PaymentSession> {
        if request.line_items.is_empty() {
            return Err(StoreError::InvalidRequest("no items provided".to_string()));
        }

        let form = self.build_form(request);

        debug!(
            "Creating Stripe checkout session: {} line items, total={} cents",
            request.line_items.len(),
            request.total()
        );

        let url = format!("{}/v1/checkout/sessions", self.config.api_base_url);

        let response = self
            .client
            .post(&url)
            .header("Authorization", self.config.auth_header())
            .header("Stripe-Version", &self.config.api_version)
            .header("Idempotency-Key", request.id.to_string())
            .timeout(self.request_timeout)
            .form(&form)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    StoreError::UpstreamTimeout {
                        secs: self.request_timeout.as_secs(),
                    }
                } else {
                    StoreError::Network(e.to_string())
                }
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| StoreError::Network(e.to_string()))?;

        if !status.is_success() {
            error!("Stripe API error: status={}, body={}", status, body);

            if let Ok(error_response) = serde_json::from_str::<StripeErrorResponse>(&body) {
                return Err(StoreError::Processor {
                    provider: "stripe".to_string(),
                    message: error_response.error.message,
                });
            }

            return Err(StoreError::Processor {
                provider: "stripe".to_string(),
                message: format!("HTTP {}: {}", status, body),
            });
        }

        let session: StripeSessionResponse = serde_json::from_str(&body).map_err(|e| {
            StoreError::Serialization(format!("Failed to parse Stripe response: {}", e))
        })?;

        info!(
            "Created Stripe checkout session: id={}, url={}",
            session.id, session.url
        );

        Ok(PaymentSession {
            session_id: session.id,
            url: session.url,
            created_at: Utc::now(),
            expires_at: session
                .expires_at
                .and_then(|ts| DateTime::from_timestamp(ts, 0)),
        })
    }

    fn provider_name(&self) -> &'static str {
        "stripe"
    }
}

// =============================================================================
// Stripe API Types
// =============================================================================

#[derive(Debug, Deserialize)]
struct StripeSessionResponse {
    id: String,
    url: String,
    #[serde(default)]
    expires_at: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct StripeErrorResponse {
    error: StripeApiError,
}

#[derive(Debug, Deserialize)]
struct StripeApiError {
    message: String,
}
