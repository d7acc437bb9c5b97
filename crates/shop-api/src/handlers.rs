//! # Request Handlers
//!
//! Axum request handlers for the storefront API: catalog queries, the
//! checkout endpoint, and the checkout-status diagnostic probe.
//!
//! Every failure path returns the same `{error, detail}` JSON shape with
//! a status code from the error taxonomy; no fault escapes unhandled.

use crate::state::AppState;
use axum::{
    body::Bytes,
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use shop_core::{
    smoke_test_items, CatalogQuery, CategoryFilter, CheckoutRequest, RawLineItem, RedirectUrls,
    SortKey, StoreError, StoreResult,
};
use std::collections::HashMap;
use tracing::{error, info, instrument};

// =============================================================================
// Request/Response Types
// =============================================================================

/// Query parameters for the products endpoint
#[derive(Debug, Default, Deserialize)]
pub struct ProductsParams {
    /// Free-text query
    #[serde(default)]
    pub q: Option<String>,
    /// Category name, or "All"
    #[serde(default)]
    pub category: Option<String>,
    /// Sort key: featured, price-asc, price-desc, rating
    #[serde(default)]
    pub sort: Option<String>,
}

impl ProductsParams {
    fn into_query(self) -> StoreResult<CatalogQuery> {
        let mut query = CatalogQuery::all();

        if let Some(text) = self.q {
            query.text = text;
        }
        if let Some(category) = self.category {
            query.category = CategoryFilter::parse(&category).ok_or_else(|| {
                StoreError::InvalidRequest(format!("unknown category: {}", category))
            })?;
        }
        if let Some(sort) = self.sort {
            query.sort = SortKey::parse(&sort)
                .ok_or_else(|| StoreError::InvalidRequest(format!("unknown sort key: {}", sort)))?;
        }

        Ok(query)
    }
}

/// Successful checkout response: redirect the customer to this URL
#[derive(Debug, Serialize)]
pub struct CheckoutResponse {
    pub url: String,
}

/// Uniform error response shape
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub detail: String,
}

fn error_response(err: StoreError) -> (StatusCode, Json<ErrorResponse>) {
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let body = ErrorResponse {
        error: err.summary().to_string(),
        detail: err.to_string(),
    };
    (status, Json(body))
}

// =============================================================================
// Handlers
// =============================================================================

/// Health check endpoint
pub async fn health() -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "service": "tac-store",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Catalog query endpoint: filter, search, and sort the product list
#[instrument(skip(state))]
pub async fn list_products(
    State(state): State<AppState>,
    Query(params): Query<ProductsParams>,
) -> Result<Json<Value>, (StatusCode, Json<ErrorResponse>)> {
    let query = params.into_query().map_err(error_response)?;
    let products = query.apply(&state.catalog);

    Ok(Json(json!({
        "products": products,
        "count": products.len()
    })))
}

/// Diagnostic probe: reports whether checkout configuration is present.
///
/// With `?test` present and valid configuration, exercises the full
/// session-creation path with fixture line items and answers 302 to the
/// processor-hosted page.
#[instrument(skip(state, params))]
pub async fn checkout_status(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Response, (StatusCode, Json<ErrorResponse>)> {
    let test = params.contains_key("test");

    if !test {
        return Ok(Json(json!({
            "ok": true,
            "hasStripeKey": state.checkout.has_stripe_key,
            "hasSiteUrl": state.checkout.has_site_url,
            "note": "Add ?test=1 to create a checkout session."
        }))
        .into_response());
    }

    let (service, site_url) = state.checkout.require().map_err(error_response)?;

    let request = CheckoutRequest::from_line_items(
        smoke_test_items(),
        RedirectUrls::for_site(site_url),
    )
    .map_err(error_response)?;

    info!("Smoke-testing checkout via {}", service.provider_name());

    let session = service.create_session(&request).await.map_err(|e| {
        error!("Checkout smoke test failed: {}", e);
        error_response(e)
    })?;

    Ok((StatusCode::FOUND, [(header::LOCATION, session.url)]).into_response())
}

/// Create a checkout session from client-supplied line items.
///
/// The body is taken as raw bytes and parsed here, so even a
/// syntactically invalid body gets the uniform `{error, detail}` shape
/// instead of a framework rejection.
#[instrument(skip(state, body))]
pub async fn create_checkout(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<CheckoutResponse>, (StatusCode, Json<ErrorResponse>)> {
    // Configuration is checked before the body is interpreted
    let (service, site_url) = state.checkout.require().map_err(error_response)?;

    let body: Value = serde_json::from_slice(&body).map_err(|e| {
        error_response(StoreError::InvalidRequest(format!(
            "malformed JSON body: {}",
            e
        )))
    })?;

    let request = parse_checkout_body(&body, site_url).map_err(error_response)?;

    info!(
        "Creating checkout: {} line items, total={} cents",
        request.line_items.len(),
        request.total()
    );

    let session = service.create_session(&request).await.map_err(|e| {
        error!("Failed to create checkout session: {}", e);
        error_response(e)
    })?;

    Ok(Json(CheckoutResponse { url: session.url }))
}

/// Parse and validate the checkout body explicitly, so loosely-typed
/// client input is rejected with a descriptive error instead of being
/// coerced or bounced by the framework.
fn parse_checkout_body(body: &Value, site_url: &str) -> StoreResult<CheckoutRequest> {
    let items = match body.get("items") {
        Some(Value::Array(items)) if !items.is_empty() => items,
        _ => return Err(StoreError::InvalidRequest("no items provided".to_string())),
    };

    let raw: Vec<RawLineItem> = items
        .iter()
        .map(|v| serde_json::from_value(v.clone()))
        .collect::<Result<_, _>>()
        .map_err(|e| StoreError::InvalidRequest(format!("malformed item: {}", e)))?;

    let urls = RedirectUrls::for_site(site_url).with_overrides(
        body.get("success_url")
            .and_then(Value::as_str)
            .map(String::from),
        body.get("cancel_url")
            .and_then(Value::as_str)
            .map(String::from),
    );

    CheckoutRequest::build(&raw, urls)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::create_router;
    use crate::state::{AppState, CheckoutAvailability};
    use async_trait::async_trait;
    use axum_test::TestServer;
    use shop_core::{
        Catalog, Category, PaymentSession, PaymentSessionService, Product, StoreResult,
    };
    use std::sync::{Arc, Mutex};

    /// Recording fake for the payment collaborator
    struct MockSessionService {
        calls: Mutex<Vec<CheckoutRequest>>,
        fail_with: Option<String>,
    }

    impl MockSessionService {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                calls: Mutex::new(Vec::new()),
                fail_with: None,
            })
        }

        fn failing(message: impl Into<String>) -> Arc<Self> {
            Arc::new(Self {
                calls: Mutex::new(Vec::new()),
                fail_with: Some(message.into()),
            })
        }

        fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }

        fn recorded(&self) -> Vec<CheckoutRequest> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl PaymentSessionService for MockSessionService {
        async fn create_session(
            &self,
            request: &CheckoutRequest,
        ) -> StoreResult<PaymentSession> {
            self.calls.lock().unwrap().push(request.clone());

            if let Some(message) = &self.fail_with {
                return Err(StoreError::Processor {
                    provider: "mock".to_string(),
                    message: message.clone(),
                });
            }

            Ok(PaymentSession {
                session_id: "cs_test_mock".to_string(),
                url: "https://checkout.example.com/c/pay/cs_test_mock".to_string(),
                created_at: chrono::Utc::now(),
                expires_at: None,
            })
        }

        fn provider_name(&self) -> &'static str {
            "mock"
        }
    }

    fn test_catalog() -> Catalog {
        Catalog {
            products: vec![
                Product::new("bag-alpha", "Go-Bag Alpha", 349.0, Category::GoBags, 4.8)
                    .with_description("Deployment pack")
                    .with_tags(["modular"]),
                Product::new("ifak-lite", "IFAK Lite", 149.0, Category::Medical, 4.5)
                    .with_description("First aid kit")
                    .with_tags(["first-aid"]),
                Product::new("ghost-radio", "Ghost Radio", 99.0, Category::Comms, 4.9)
                    .with_description("Shielded radio")
                    .out_of_stock(),
            ],
        }
    }

    fn server_with(service: Arc<MockSessionService>) -> TestServer {
        let state = AppState::with_parts(
            test_catalog(),
            CheckoutAvailability::with_service(service, "https://shop.example.com"),
        );
        TestServer::new(create_router(state)).unwrap()
    }

    fn server_without_config() -> TestServer {
        let state = AppState::with_parts(test_catalog(), CheckoutAvailability::disabled());
        TestServer::new(create_router(state)).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let server = server_without_config();
        let res = server.get("/health").await;
        res.assert_status_ok();

        let body: Value = res.json();
        assert_eq!(body["status"], "healthy");
    }

    #[tokio::test]
    async fn test_products_hides_out_of_stock() {
        let server = server_without_config();
        let res = server.get("/products").await;
        res.assert_status_ok();

        let body: Value = res.json();
        assert_eq!(body["count"], 2);
        let ids: Vec<&str> = body["products"]
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p["id"].as_str().unwrap())
            .collect();
        assert!(!ids.contains(&"ghost-radio"));
    }

    #[tokio::test]
    async fn test_products_filter_and_sort() {
        let server = server_without_config();

        let res = server
            .get("/products")
            .add_query_param("category", "Medical")
            .await;
        let body: Value = res.json();
        assert_eq!(body["count"], 1);
        assert_eq!(body["products"][0]["id"], "ifak-lite");

        let res = server.get("/products").add_query_param("sort", "price-asc").await;
        let body: Value = res.json();
        assert_eq!(body["products"][0]["id"], "ifak-lite");
        assert_eq!(body["products"][1]["id"], "bag-alpha");

        let res = server.get("/products").add_query_param("q", "first-aid").await;
        let body: Value = res.json();
        assert_eq!(body["count"], 1);
    }

    #[tokio::test]
    async fn test_products_unknown_sort_is_400() {
        let server = server_without_config();
        let res = server.get("/products").add_query_param("sort", "newest").await;
        res.assert_status(StatusCode::BAD_REQUEST);

        let body: ErrorResponse = res.json();
        assert!(body.detail.contains("newest"));
    }

    #[tokio::test]
    async fn test_checkout_empty_items_rejected_without_calling_processor() {
        let mock = MockSessionService::new();
        let server = server_with(Arc::clone(&mock));

        let res = server.post("/checkout").json(&json!({ "items": [] })).await;
        res.assert_status(StatusCode::BAD_REQUEST);

        let body: ErrorResponse = res.json();
        assert!(body.detail.contains("no items provided"));
        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test]
    async fn test_checkout_invalid_json_body_keeps_error_shape() {
        let mock = MockSessionService::new();
        let server = server_with(Arc::clone(&mock));

        let res = server.post("/checkout").text("{not json").await;
        res.assert_status(StatusCode::BAD_REQUEST);

        let body: ErrorResponse = res.json();
        assert_eq!(body.error, "Checkout error");
        assert!(body.detail.contains("malformed JSON body"));
        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test]
    async fn test_checkout_missing_items_rejected() {
        let mock = MockSessionService::new();
        let server = server_with(Arc::clone(&mock));

        let res = server.post("/checkout").json(&json!({})).await;
        res.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test]
    async fn test_checkout_normalizes_and_invokes_once() {
        let mock = MockSessionService::new();
        let server = server_with(Arc::clone(&mock));

        let res = server
            .post("/checkout")
            .json(&json!({
                "items": [
                    { "name": "A", "price": 5, "quantity": 1 },
                    { "name": "B", "price": 7.5, "quantity": 2 }
                ]
            }))
            .await;
        res.assert_status_ok();

        let body: Value = res.json();
        assert_eq!(
            body["url"],
            "https://checkout.example.com/c/pay/cs_test_mock"
        );

        let calls = mock.recorded();
        assert_eq!(calls.len(), 1);
        let items = &calls[0].line_items;
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].unit_amount, 500);
        assert_eq!(items[1].unit_amount, 750);
        assert_eq!(items[1].quantity, 2);
    }

    #[tokio::test]
    async fn test_checkout_default_redirect_urls() {
        let mock = MockSessionService::new();
        let server = server_with(Arc::clone(&mock));

        server
            .post("/checkout")
            .json(&json!({ "items": [{ "name": "A", "price": 5 }] }))
            .await
            .assert_status_ok();

        let calls = mock.recorded();
        assert_eq!(
            calls[0].success_url,
            "https://shop.example.com/?status=success"
        );
        assert_eq!(
            calls[0].cancel_url,
            "https://shop.example.com/?status=cancelled"
        );
    }

    #[tokio::test]
    async fn test_checkout_url_overrides() {
        let mock = MockSessionService::new();
        let server = server_with(Arc::clone(&mock));

        server
            .post("/checkout")
            .json(&json!({
                "items": [{ "name": "A", "price": 5 }],
                "success_url": "https://elsewhere/thanks"
            }))
            .await
            .assert_status_ok();

        let calls = mock.recorded();
        assert_eq!(calls[0].success_url, "https://elsewhere/thanks");
        assert_eq!(
            calls[0].cancel_url,
            "https://shop.example.com/?status=cancelled"
        );
    }

    #[tokio::test]
    async fn test_checkout_non_numeric_price_rejected() {
        let mock = MockSessionService::new();
        let server = server_with(Arc::clone(&mock));

        let res = server
            .post("/checkout")
            .json(&json!({ "items": [{ "name": "A", "price": "free" }] }))
            .await;
        res.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test]
    async fn test_checkout_missing_config_fails_fast() {
        let server = server_without_config();

        let res = server
            .post("/checkout")
            .json(&json!({ "items": [{ "name": "A", "price": 5 }] }))
            .await;
        res.assert_status(StatusCode::INTERNAL_SERVER_ERROR);

        let body: ErrorResponse = res.json();
        assert!(body.detail.contains("STRIPE_SECRET_KEY"));
    }

    #[tokio::test]
    async fn test_checkout_processor_failure_surfaced() {
        let mock = MockSessionService::failing("rate limited");
        let server = server_with(Arc::clone(&mock));

        let res = server
            .post("/checkout")
            .json(&json!({ "items": [{ "name": "A", "price": 5 }] }))
            .await;
        res.assert_status(StatusCode::BAD_GATEWAY);

        let body: ErrorResponse = res.json();
        assert_eq!(body.error, "Payment processor error");
        // Invoked exactly once: no retries
        assert_eq!(mock.call_count(), 1);
    }

    #[tokio::test]
    async fn test_status_probe_reports_config_presence() {
        let server = server_without_config();
        let res = server.get("/checkout-status").await;
        res.assert_status_ok();

        let body: Value = res.json();
        assert_eq!(body["ok"], true);
        assert_eq!(body["hasStripeKey"], false);
        assert_eq!(body["hasSiteUrl"], false);

        let server = server_with(MockSessionService::new());
        let body: Value = server.get("/checkout-status").await.json();
        assert_eq!(body["hasStripeKey"], true);
        assert_eq!(body["hasSiteUrl"], true);
    }

    #[tokio::test]
    async fn test_status_probe_smoke_test_redirects() {
        let mock = MockSessionService::new();
        let server = server_with(Arc::clone(&mock));

        let res = server
            .get("/checkout-status")
            .add_query_param("test", "1")
            .await;
        res.assert_status(StatusCode::FOUND);
        assert_eq!(
            res.header("location"),
            "https://checkout.example.com/c/pay/cs_test_mock"
        );

        // Fixture items were submitted
        let calls = mock.recorded();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].line_items[0].unit_amount, 500);
        assert_eq!(calls[0].line_items[1].unit_amount, 750);
        assert_eq!(calls[0].line_items[1].quantity, 2);
    }

    #[tokio::test]
    async fn test_status_probe_smoke_test_without_config_is_error() {
        let server = server_without_config();

        let res = server
            .get("/checkout-status")
            .add_query_param("test", "1")
            .await;
        res.assert_status(StatusCode::INTERNAL_SERVER_ERROR);

        let body: ErrorResponse = res.json();
        assert!(body.detail.contains("STRIPE_SECRET_KEY"));
    }
}
