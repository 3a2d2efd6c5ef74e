//! Route handlers for the order service.

pub mod orders;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Build the order service routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/orders", get(orders::list))
        .route("/api/orders/checkout", post(orders::checkout))
}
