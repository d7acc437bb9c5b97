//! # Checkout Request Builder
//!
//! Normalizes loosely-typed client line items into a payment-session
//! request, and defines the `PaymentSessionService` seam to the external
//! payment processor.
//!
//! Prices arrive in major currency units (dollars) and are converted to
//! integer minor units (cents) by `round(price * 100)`. Rounding is
//! half-away-from-zero (`f64::round`), which for the non-negative prices
//! accepted here is half-up. Non-numeric or negative prices are rejected
//! with `InvalidRequest` rather than coerced.

use crate::error::{StoreError, StoreResult};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use uuid::Uuid;

/// Currency for all checkout sessions. Single-currency storefront.
pub const CURRENCY: &str = "usd";

/// Maximum accepted unit price in minor units (Stripe caps amounts at
/// eight digits). Prices above this are rejected, never saturated.
pub const MAX_UNIT_AMOUNT: i64 = 99_999_999;

/// A normalized, priced, quantified unit submitted to the payment processor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    /// Display name
    pub name: String,
    /// Unit price in minor currency units (cents), non-negative
    pub unit_amount: i64,
    /// Quantity, positive
    pub quantity: u32,
}

impl LineItem {
    pub fn new(name: impl Into<String>, unit_amount: i64, quantity: u32) -> Self {
        Self {
            name: name.into(),
            unit_amount,
            quantity,
        }
    }

    /// Line total in minor units, saturating at `i64::MAX`
    pub fn total(&self) -> i64 {
        self.unit_amount.saturating_mul(self.quantity as i64)
    }
}

/// Convert a major-unit price to minor units (cents), rounding half-up
pub fn to_minor_units(price: f64) -> i64 {
    (price * 100.0).round() as i64
}

/// A raw line item as submitted by the storefront client.
///
/// Price and quantity are kept as JSON values so that parse-and-validate
/// happens explicitly here, at the boundary, instead of letting serde
/// reject or coerce loosely-typed input.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawLineItem {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub price: Option<Value>,
    #[serde(default)]
    pub quantity: Option<Value>,
}

/// Success/cancel redirect URLs for a checkout session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectUrls {
    pub success_url: String,
    pub cancel_url: String,
}

impl RedirectUrls {
    /// Default redirects for a site base URL: back to the storefront with
    /// a status query parameter.
    pub fn for_site(site_url: &str) -> Self {
        let base = site_url.trim_end_matches('/');
        Self {
            success_url: format!("{}/?status=success", base),
            cancel_url: format!("{}/?status=cancelled", base),
        }
    }

    /// Apply client-supplied overrides, keeping defaults where absent
    pub fn with_overrides(
        mut self,
        success_url: Option<String>,
        cancel_url: Option<String>,
    ) -> Self {
        if let Some(url) = success_url {
            self.success_url = url;
        }
        if let Some(url) = cancel_url {
            self.cancel_url = url;
        }
        self
    }
}

/// A validated, normalized checkout request ready for submission
#[derive(Debug, Clone)]
pub struct CheckoutRequest {
    /// Request id, also used as the processor idempotency key
    pub id: Uuid,
    /// Normalized line items (non-empty)
    pub line_items: Vec<LineItem>,
    /// Redirect after successful payment
    pub success_url: String,
    /// Redirect if the customer cancels
    pub cancel_url: String,
}

impl CheckoutRequest {
    /// Build a request from raw client items.
    ///
    /// Fails with `InvalidRequest` when the items list is empty, a price
    /// is missing/non-numeric/negative, or a quantity is numeric but not
    /// a positive integer. Missing or non-numeric quantities default to 1.
    pub fn build(items: &[RawLineItem], urls: RedirectUrls) -> StoreResult<Self> {
        if items.is_empty() {
            return Err(StoreError::InvalidRequest("no items provided".to_string()));
        }

        let line_items = items
            .iter()
            .map(normalize_item)
            .collect::<StoreResult<Vec<LineItem>>>()?;

        Ok(Self {
            id: Uuid::new_v4(),
            line_items,
            success_url: urls.success_url,
            cancel_url: urls.cancel_url,
        })
    }

    /// Build directly from already-normalized line items (internal paths)
    pub fn from_line_items(line_items: Vec<LineItem>, urls: RedirectUrls) -> StoreResult<Self> {
        if line_items.is_empty() {
            return Err(StoreError::InvalidRequest("no items provided".to_string()));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            line_items,
            success_url: urls.success_url,
            cancel_url: urls.cancel_url,
        })
    }

    /// Total across all line items, in minor units, saturating at `i64::MAX`
    pub fn total(&self) -> i64 {
        self.line_items
            .iter()
            .fold(0i64, |acc, item| acc.saturating_add(item.total()))
    }

    /// Total quantity across all line items
    pub fn item_count(&self) -> u32 {
        self.line_items.iter().map(|i| i.quantity).sum()
    }
}

fn normalize_item(raw: &RawLineItem) -> StoreResult<LineItem> {
    let name = raw
        .name
        .clone()
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| "Item".to_string());

    let price = parse_price(raw.price.as_ref(), &name)?;
    let quantity = parse_quantity(raw.quantity.as_ref(), &name)?;

    Ok(LineItem {
        name,
        unit_amount: to_minor_units(price),
        quantity,
    })
}

/// Parse a price value: JSON number or numeric string, finite, non-negative
fn parse_price(value: Option<&Value>, name: &str) -> StoreResult<f64> {
    let price = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .ok_or_else(|| {
        StoreError::InvalidRequest(format!("item '{}' has a missing or non-numeric price", name))
    })?;

    if !price.is_finite() || price < 0.0 {
        return Err(StoreError::InvalidRequest(format!(
            "item '{}' has an invalid price: {}",
            name, price
        )));
    }

    // Compared in f64 space, before the cast can saturate
    if price * 100.0 > MAX_UNIT_AMOUNT as f64 {
        return Err(StoreError::InvalidRequest(format!(
            "item '{}' has a price above the maximum: {}",
            name, price
        )));
    }

    Ok(price)
}

/// Parse a quantity: missing or non-numeric defaults to 1; a numeric value
/// must be a positive integer.
fn parse_quantity(value: Option<&Value>, name: &str) -> StoreResult<u32> {
    let qty = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    match qty {
        None => Ok(1),
        Some(q) if q >= 1.0 && q.fract() == 0.0 && q <= u32::MAX as f64 => Ok(q as u32),
        Some(q) => Err(StoreError::InvalidRequest(format!(
            "item '{}' has an invalid quantity: {}",
            name, q
        ))),
    }
}

/// Fixture line items used by the diagnostic smoke-test path
pub fn smoke_test_items() -> Vec<LineItem> {
    vec![
        LineItem::new("Test Item A", 500, 1),
        LineItem::new("Test Item B", 750, 2),
    ]
}

/// A payment session created by the processor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentSession {
    /// Processor's session id
    pub session_id: String,
    /// Processor-hosted checkout URL (redirect customer here)
    pub url: String,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
    /// When the session expires, if the processor reports it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

/// Capability provided by the external payment processor.
///
/// The processor's internals (card networks, fraud checks, webhooks) are
/// out of scope; this seam is what the checkout handler depends on, and
/// what tests replace with a recording fake.
#[async_trait]
pub trait PaymentSessionService: Send + Sync {
    /// Create a hosted payment session for the given request
    async fn create_session(&self, request: &CheckoutRequest) -> StoreResult<PaymentSession>;

    /// Processor name (for logging)
    fn provider_name(&self) -> &'static str;
}

/// Type alias for a shared payment session service (dynamic dispatch)
pub type BoxedPaymentSessionService = Arc<dyn PaymentSessionService>;
