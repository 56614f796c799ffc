//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures server errors to Sentry
//! before responding to the client. All route handlers should return
//! `Result<T, AppError>`. Every error response is a JSON object with an
//! `error` message; validation failures add an `errors` map and an empty
//! checkout selection adds a `redirect` hint.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use threadline_core::{AddressError, CartError, CheckoutError, ValidationErrors};

use crate::services::gateway::GatewayError;

/// Where the shopper is sent when checkout has nothing to buy.
pub const EMPTY_SELECTION_REDIRECT: &str = "/cart";

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Form fields failed validation.
    #[error(transparent)]
    Validation(#[from] ValidationErrors),

    /// Cart mutation rejected.
    #[error(transparent)]
    Cart(#[from] CartError),

    /// Checkout transition rejected.
    #[error(transparent)]
    Checkout(#[from] CheckoutError),

    /// Address book operation rejected.
    #[error(transparent)]
    Address(#[from] AddressError),

    /// The order gateway refused the order.
    #[error(transparent)]
    OrderDeclined(#[from] GatewayError),

    /// Session store failure.
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// HTTP status for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::NotFound(_)
            | Self::Cart(CartError::LineNotFound(_))
            | Self::Address(AddressError::NotFound(_)) => StatusCode::NOT_FOUND,
            Self::Validation(_) | Self::Address(AddressError::Invalid(_)) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            Self::Cart(_) => StatusCode::BAD_REQUEST,
            Self::Checkout(_) => StatusCode::CONFLICT,
            Self::OrderDeclined(_) => StatusCode::PAYMENT_REQUIRED,
            Self::Session(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    const fn is_server_error(&self) -> bool {
        matches!(self, Self::Session(_) | Self::Internal(_))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if self.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = self.status();

        let body = match &self {
            // Don't expose internal error details to clients
            Self::Session(_) | Self::Internal(_) => json!({ "error": "Internal server error" }),
            Self::Validation(errors) | Self::Address(AddressError::Invalid(errors)) => json!({
                "error": self.to_string(),
                "errors": errors.messages(),
            }),
            Self::Checkout(CheckoutError::EmptySelection) => json!({
                "error": self.to_string(),
                "redirect": EMPTY_SELECTION_REDIRECT,
            }),
            _ => json!({ "error": self.to_string() }),
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Add a breadcrumb for shopper actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of actions
/// leading up to an error.
pub fn add_breadcrumb(category: &str, message: &str, data: &[(&str, &str)]) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    for (key, value) in data {
        breadcrumb.data.insert(
            (*key).to_string(),
            serde_json::Value::String((*value).to_string()),
        );
    }

    sentry::add_breadcrumb(breadcrumb);
}
