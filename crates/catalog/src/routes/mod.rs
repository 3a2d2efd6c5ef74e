//! Route handlers for the catalog service.

pub mod products;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::state::AppState;

/// Build the catalog service routes.
///
/// The read surface and the reservation endpoint are open; the `/api/admin`
/// surface is gated on the admin role by the handlers' `RequireAdmin`
/// extractor, evaluated after the trust filter has run.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/products", get(products::list))
        .route("/api/products/{id}", get(products::get_by_id))
        .route("/api/products/{id}/reserve", post(products::reserve))
        .route("/api/admin/products", post(products::create))
        .route(
            "/api/admin/products/{id}",
            put(products::update).delete(products::remove),
        )
}
