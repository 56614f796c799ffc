//! Integration tests for Threadline.
//!
//! The tests drive the full storefront router in-process with
//! `tower::ServiceExt::oneshot`. No server or network is involved.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p threadline-integration-tests
//! ```
//!
//! # Test Files
//!
//! - `storefront_cart` - Cart mutations, selection and pricing
//! - `storefront_checkout` - Checkout steps, order placement and declines
//! - `storefront_account` - Profile, addresses and order history
//! - `storefront_catalog` - Home, category and product pages

use std::sync::Arc;
use std::time::Duration;

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use serde_json::Value;
use threadline_storefront::config::StorefrontConfig;
use threadline_storefront::services::gateway::OrderGateway;
use threadline_storefront::state::AppState;
use tower::ServiceExt;

/// Configuration with an instant order gateway.
#[must_use]
pub fn test_config() -> StorefrontConfig {
    let mut config = StorefrontConfig::default();
    config.orders.latency = Duration::ZERO;
    config
}

/// A JSON response.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

/// Sends requests to one storefront instance as one shopper.
///
/// The session cookie from each response is sent with the next request,
/// like a browser would.
pub struct TestClient {
    app: Router,
    cookie: Option<String>,
}

impl TestClient {
    /// A storefront with the default fixtures and an instant gateway.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(test_config())
    }

    /// A storefront with custom configuration.
    ///
    /// # Panics
    ///
    /// Panics if the fixtures fail to load.
    #[must_use]
    pub fn with_config(config: StorefrontConfig) -> Self {
        let state = AppState::new(config).expect("Failed to build state");
        Self::from_state(state)
    }

    /// A storefront using `gateway` for order submission.
    ///
    /// # Panics
    ///
    /// Panics if the fixtures fail to load.
    #[must_use]
    pub fn with_gateway(gateway: Arc<dyn OrderGateway>) -> Self {
        let state = AppState::with_gateway(test_config(), gateway).expect("Failed to build state");
        Self::from_state(state)
    }

    fn from_state(state: AppState) -> Self {
        Self {
            app: threadline_storefront::app(state),
            cookie: None,
        }
    }

    /// A second shopper on the same storefront, with no session yet.
    #[must_use]
    pub fn other_shopper(&self) -> Self {
        Self {
            app: self.app.clone(),
            cookie: None,
        }
    }

    /// The same shopper in another browser tab, sharing the session.
    #[must_use]
    pub fn same_shopper(&self) -> Self {
        Self {
            app: self.app.clone(),
            cookie: self.cookie.clone(),
        }
    }

    pub async fn get(&mut self, path: &str) -> TestResponse {
        self.send(Method::GET, path, None).await
    }

    pub async fn post(&mut self, path: &str, body: Value) -> TestResponse {
        self.send(Method::POST, path, Some(body)).await
    }

    /// POST without a body.
    pub async fn post_empty(&mut self, path: &str) -> TestResponse {
        self.send(Method::POST, path, None).await
    }

    /// Send a request and decode the response body.
    ///
    /// Bodies that are not JSON come back as a JSON string.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be built.
    pub async fn send(&mut self, method: Method, path: &str, body: Option<Value>) -> TestResponse {
        let mut request = Request::builder().method(method).uri(path);
        if let Some(cookie) = &self.cookie {
            request = request.header(header::COOKIE, cookie);
        }
        let request = match body {
            Some(body) => request
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => request.body(Body::empty()),
        }
        .expect("Failed to build request");

        let response = self
            .app
            .clone()
            .oneshot(request)
            .await
            .expect("Router is infallible");

        if let Some(cookie) = response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(';').next())
        {
            self.cookie = Some(cookie.to_string());
        }

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read body");
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };

        TestResponse { status, body }
    }

    /// Add a product variant to the cart, asserting success.
    ///
    /// # Panics
    ///
    /// Panics if the storefront rejects the line.
    pub async fn add_to_cart(&mut self, slug: &str, size: &str, color: &str, quantity: i64) -> Value {
        let response = self
            .post(
                "/cart/add",
                serde_json::json!({
                    "slug": slug,
                    "size": size,
                    "color": color,
                    "quantity": quantity,
                }),
            )
            .await;
        assert_eq!(response.status, StatusCode::OK, "{}", response.body);
        response.body
    }
}

impl Default for TestClient {
    fn default() -> Self {
        Self::new()
    }
}
