//! An in-process catalog server speaking the real wire protocol.
//!
//! Bound to an ephemeral localhost port, so the order service's real
//! `HttpCatalogClient` exercises actual HTTP, including status-code
//! classification and transport failures.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use rust_decimal::Decimal;
use serde::Deserialize;

#[derive(Debug, Clone)]
struct MockProduct {
    name: String,
    price: Decimal,
    stock: i64,
}

#[derive(Debug, Default)]
struct MockState {
    products: HashMap<i64, MockProduct>,
    fail_with_500: bool,
}

/// Scriptable catalog double.
#[derive(Debug, Clone, Default)]
pub struct MockCatalog {
    state: Arc<Mutex<MockState>>,
}

impl MockCatalog {
    /// Creates an empty mock catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a product.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn add_product(&self, id: i64, name: &str, price: Decimal, stock: i64) {
        self.state.lock().expect("mock lock poisoned").products.insert(
            id,
            MockProduct {
                name: name.to_string(),
                price,
                stock,
            },
        );
    }

    /// Make every endpoint answer 500, simulating a broken catalog.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn fail_with_500(&self, fail: bool) {
        self.state.lock().expect("mock lock poisoned").fail_with_500 = fail;
    }

    /// Remaining stock for a product, if it exists.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn stock_of(&self, id: i64) -> Option<i64> {
        self.state
            .lock()
            .expect("mock lock poisoned")
            .products
            .get(&id)
            .map(|p| p.stock)
    }

    /// Bind to an ephemeral port, start serving, and return the base URL.
    ///
    /// The server task lives until the test runtime shuts down.
    ///
    /// # Panics
    ///
    /// Panics if binding fails.
    pub async fn spawn(&self) -> String {
        let app = Router::new()
            .route("/api/products/{id}", get(get_product))
            .route("/api/products/{id}/reserve", post(reserve))
            .with_state(self.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("mock catalog must bind");
        let addr = listener.local_addr().expect("mock catalog must have addr");

        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("mock catalog serve");
        });

        format!("http://{addr}")
    }
}

async fn get_product(State(mock): State<MockCatalog>, Path(id): Path<i64>) -> Response {
    let state = mock.state.lock().expect("mock lock poisoned");

    if state.fail_with_500 {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }

    match state.products.get(&id) {
        Some(p) => Json(serde_json::json!({
            "id": id,
            "name": p.name,
            "description": "",
            "price": p.price,
            "stock": p.stock,
        }))
        .into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

#[derive(Debug, Deserialize)]
struct ReserveParams {
    qty: i64,
}

async fn reserve(
    State(mock): State<MockCatalog>,
    Path(id): Path<i64>,
    Query(params): Query<ReserveParams>,
) -> Response {
    let mut state = mock.state.lock().expect("mock lock poisoned");

    if state.fail_with_500 {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }

    match state.products.get_mut(&id) {
        None => StatusCode::NOT_FOUND.into_response(),
        Some(p) if p.stock < params.qty => (
            StatusCode::CONFLICT,
            Json(serde_json::json!({"ok": false, "message": "Not enough stock"})),
        )
            .into_response(),
        Some(p) => {
            p.stock -= params.qty;
            Json(serde_json::json!({"ok": true})).into_response()
        }
    }
}
