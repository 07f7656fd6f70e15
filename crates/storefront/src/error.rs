//! Error types for the shop controller, the REST backend, and the API server.
//!
//! - [`ShopError`] is the domain taxonomy every shop operation returns.
//! - [`TransportError`] covers failures talking to a remote API server.
//! - [`AppError`] is what route handlers return; it maps to an HTTP status and
//!   a JSON `{ "error": "..." }` body.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use bazaar_core::{NotificationKind, Price};
use thiserror::Error;

use crate::api::ErrorBody;

/// Errors produced by shop operations.
///
/// Every variant is recoverable: the shop controller turns it into a
/// notification and leaves unrelated state untouched.
#[derive(Debug, Error)]
pub enum ShopError {
    /// User input failed validation (login form, tracking id, payment method).
    #[error("{0}")]
    Validation(String),

    /// Checkout attempted with no cart lines.
    #[error("Your cart is empty. Add items before placing an order.")]
    EmptyCart,

    /// Checkout attempted while the cart total is above the budget limit.
    #[error("Order blocked because cart total {total} exceeds your budget limit of {limit}.")]
    BudgetExceeded { total: Price, limit: Price },

    /// Adding an item would push the cart total above the budget limit.
    #[error("Cannot add {item}. This would exceed your budget limit of {limit}.")]
    WouldExceedBudget { item: String, limit: Price },

    /// Referenced product, order, or session does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Remote API call failed.
    #[error(transparent)]
    Transport(#[from] TransportError),
}

impl ShopError {
    /// Notification severity used when this error is shown to the shopper.
    #[must_use]
    pub const fn notification_kind(&self) -> NotificationKind {
        match self {
            Self::Validation(_) | Self::BudgetExceeded { .. } | Self::WouldExceedBudget { .. } => {
                NotificationKind::Warning
            }
            Self::EmptyCart | Self::NotFound(_) => NotificationKind::Info,
            Self::Transport(_) => NotificationKind::Error,
        }
    }

    /// Whether this error came from the budget guard.
    #[must_use]
    pub const fn is_budget(&self) -> bool {
        matches!(
            self,
            Self::BudgetExceeded { .. } | Self::WouldExceedBudget { .. }
        )
    }
}

/// Errors that can occur when calling the remote storefront API.
#[derive(Debug, Error)]
pub enum TransportError {
    /// HTTP request failed (connection refused, timeout, ...).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Server answered with a non-success status.
    #[error("{message}")]
    Status { status: u16, message: String },

    /// Response body was not the expected JSON.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Base URL or path could not be turned into a request URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

/// Application-level error type for the API server.
#[derive(Debug, Error)]
pub enum AppError {
    /// Shop operation failed.
    #[error(transparent)]
    Shop(#[from] ShopError),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    const fn status(&self) -> StatusCode {
        match self {
            Self::Shop(err) => match err {
                ShopError::Validation(_)
                | ShopError::EmptyCart
                | ShopError::BudgetExceeded { .. }
                | ShopError::WouldExceedBudget { .. } => StatusCode::BAD_REQUEST,
                ShopError::NotFound(_) => StatusCode::NOT_FOUND,
                ShopError::Transport(_) => StatusCode::BAD_GATEWAY,
            },
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            tracing::error!(error = %self, "Request error");
        }

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Internal(_) => "Internal server error".to_string(),
            Self::Shop(ShopError::Transport(_)) => "External service error".to_string(),
            Self::BadRequest(msg) => msg.clone(),
            Self::Shop(err) => err.to_string(),
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
