//! Route handlers for the identity service.

pub mod auth;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Build the identity service routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/refresh", post(auth::refresh))
        .route("/api/auth/verify", get(auth::verify))
}
