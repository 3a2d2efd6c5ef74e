//! Authentication error types.

use thiserror::Error;

use clementine_core::{EmailError, TokenError};

use crate::db::RepositoryError;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The email address is not well-formed.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    /// The password does not meet requirements.
    #[error("weak password: {0}")]
    WeakPassword(String),

    /// An account with this email already exists.
    #[error("user already exists")]
    UserAlreadyExists,

    /// Wrong email or password. Deliberately does not say which.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// The presented refresh token was rejected.
    #[error("invalid refresh token")]
    InvalidRefreshToken(#[source] TokenError),

    /// Password hashing failed.
    #[error("password hashing failed")]
    PasswordHash,

    /// Token signing failed.
    #[error("token signing failed: {0}")]
    Token(#[from] TokenError),

    /// Database operation failed.
    #[error("repository error: {0}")]
    Repository(#[from] RepositoryError),
}
