//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures server-side errors to
//! Sentry before responding to the client. All route handlers return
//! `Result<T, AppError>`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use clementine_core::ApiMessage;

use crate::db::RepositoryError;
use crate::services::auth::AuthError;

/// Application-level error type for the identity service.
#[derive(Debug, Error)]
pub enum AppError {
    /// Authentication operation failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

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
            Self::Database(_)
                | Self::Internal(_)
                | Self::Auth(
                    AuthError::PasswordHash | AuthError::Token(_) | AuthError::Repository(_)
                )
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
            Self::Auth(err) => match err {
                AuthError::UserAlreadyExists => (StatusCode::BAD_REQUEST, "Email already used"),
                AuthError::InvalidCredentials => (StatusCode::BAD_REQUEST, "Invalid credentials"),
                AuthError::InvalidEmail(_) => (StatusCode::BAD_REQUEST, "Invalid email address"),
                AuthError::WeakPassword(_) => (StatusCode::BAD_REQUEST, "Password too weak"),
                AuthError::InvalidRefreshToken(_) => {
                    (StatusCode::UNAUTHORIZED, "Invalid refresh token")
                }
                // Don't expose internal details to clients
                AuthError::PasswordHash | AuthError::Token(_) | AuthError::Repository(_) => {
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

    fn status_of(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            status_of(AppError::Auth(AuthError::UserAlreadyExists)),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(AppError::Auth(AuthError::InvalidCredentials)),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(AppError::Internal("boom".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
