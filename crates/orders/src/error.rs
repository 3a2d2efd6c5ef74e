//! Unified error handling with Sentry integration.
//!
//! The interesting mapping is [`CheckoutError`]: each saga abort kind has
//! one stable outward status, and a missing product (404) is never conflated
//! with an unreachable catalog (503) - the caller's recovery differs.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use clementine_core::ApiMessage;

use crate::db::RepositoryError;
use crate::services::CheckoutError;

/// Application-level error type for the order service.
#[derive(Debug, Error)]
pub enum AppError {
    /// Checkout saga aborted or failed.
    #[error("Checkout error: {0}")]
    Checkout(#[from] CheckoutError),

    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Whether this error is a server-side fault worth reporting.
    const fn is_server_error(&self) -> bool {
        matches!(
            self,
            Self::Database(_) | Self::Internal(_) | Self::Checkout(CheckoutError::Store(_))
        )
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let (status, message) = match &self {
            Self::Checkout(err) => match err {
                CheckoutError::EmptyCart => (StatusCode::BAD_REQUEST, "Empty cart"),
                CheckoutError::InvalidQuantity => (StatusCode::BAD_REQUEST, "Invalid quantity"),
                CheckoutError::ProductNotFound => (StatusCode::NOT_FOUND, "Product not found"),
                CheckoutError::StockNotAvailable => (StatusCode::CONFLICT, "Stock not available"),
                CheckoutError::ServiceUnavailable => (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "Product service unavailable",
                ),
                CheckoutError::Store(_) => {
                    (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
                }
            },
            Self::Database(_) | Self::Internal(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        };

        (status, Json(ApiMessage::error(message))).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(err: CheckoutError) -> StatusCode {
        AppError::Checkout(err).into_response().status()
    }

    #[test]
    fn test_saga_abort_status_mapping() {
        assert_eq!(status_of(CheckoutError::EmptyCart), StatusCode::BAD_REQUEST);
        assert_eq!(
            status_of(CheckoutError::ProductNotFound),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(CheckoutError::StockNotAvailable),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_of(CheckoutError::ServiceUnavailable),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }
}
