//! End-to-end checkout through the order service router.
//!
//! The real router, trust filter, saga, and `HttpCatalogClient` run against
//! an in-process catalog server over actual HTTP; only order persistence is
//! in-memory.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use rust_decimal::Decimal;
use tower::ServiceExt;

use clementine_core::Role;
use clementine_integration_tests::{access_token, mock_catalog::MockCatalog, orders_app};
use clementine_orders::catalog::HttpCatalogClient;
use clementine_orders::db::InMemoryOrderStore;

fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

/// Spin up a mock catalog and wire the full orders app to it.
async fn setup(mock: &MockCatalog) -> (Router, InMemoryOrderStore) {
    let base_url = mock.spawn().await;
    let client = HttpCatalogClient::new(&base_url, Duration::from_secs(2)).unwrap();
    let store = InMemoryOrderStore::new();
    let app = orders_app(&base_url, Arc::new(client), Arc::new(store.clone()));
    (app, store)
}

fn checkout_request(token: Option<&str>, body: &serde_json::Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/api/orders/checkout")
        .header("content-type", "application/json");
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    builder
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_checkout_succeeds_and_snapshots_prices() {
    let mock = MockCatalog::new();
    mock.add_product(1, "P1", dec("10.00"), 5);
    let (app, store) = setup(&mock).await;

    let token = access_token("user@test.com", Role::User);
    let body = serde_json::json!({"items": [{"productId": 1, "quantity": 2}]});

    let response = app
        .oneshot(checkout_request(Some(&token), &body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["total"], "20.00");
    assert_eq!(json["status"], "CREATED");
    assert_eq!(json["items"][0]["productId"], 1);
    assert_eq!(json["items"][0]["name"], "P1");
    assert_eq!(json["items"][0]["price"], "10.00");
    assert_eq!(json["items"][0]["quantity"], 2);

    assert_eq!(store.order_count(), 1);
    assert_eq!(mock.stock_of(1), Some(3));
}

#[tokio::test]
async fn test_checkout_without_token_is_unauthorized() {
    let mock = MockCatalog::new();
    mock.add_product(1, "P1", dec("10.00"), 5);
    let (app, store) = setup(&mock).await;

    let body = serde_json::json!({"items": [{"productId": 1, "quantity": 1}]});
    let response = app.oneshot(checkout_request(None, &body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(store.order_count(), 0);
    assert_eq!(mock.stock_of(1), Some(5));
}

#[tokio::test]
async fn test_empty_cart_is_bad_request() {
    let mock = MockCatalog::new();
    let (app, store) = setup(&mock).await;

    let token = access_token("user@test.com", Role::User);
    let body = serde_json::json!({"items": []});
    let response = app
        .oneshot(checkout_request(Some(&token), &body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["ok"], false);
    assert_eq!(json["message"], "Empty cart");
    assert_eq!(store.order_count(), 0);
}

#[tokio::test]
async fn test_unknown_product_is_not_found() {
    let mock = MockCatalog::new();
    let (app, store) = setup(&mock).await;

    let token = access_token("user@test.com", Role::User);
    let body = serde_json::json!({"items": [{"productId": 99, "quantity": 1}]});
    let response = app
        .oneshot(checkout_request(Some(&token), &body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["message"], "Product not found");
    assert_eq!(store.order_count(), 0);
}

#[tokio::test]
async fn test_mid_cart_conflict_is_409_and_persists_nothing() {
    let mock = MockCatalog::new();
    mock.add_product(1, "P1", dec("10.00"), 5);
    mock.add_product(2, "P2", dec("4.50"), 1);
    let (app, store) = setup(&mock).await;

    let token = access_token("user@test.com", Role::User);
    let body = serde_json::json!({"items": [
        {"productId": 1, "quantity": 2},
        {"productId": 2, "quantity": 5}
    ]});
    let response = app
        .oneshot(checkout_request(Some(&token), &body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let json = body_json(response).await;
    assert_eq!(json["message"], "Stock not available");

    // No order; the first line's remote reservation stands (no compensation)
    assert_eq!(store.order_count(), 0);
    assert_eq!(mock.stock_of(1), Some(3));
    assert_eq!(mock.stock_of(2), Some(1));
}

#[tokio::test]
async fn test_catalog_500_is_service_unavailable() {
    let mock = MockCatalog::new();
    mock.add_product(1, "P1", dec("10.00"), 5);
    mock.fail_with_500(true);
    let (app, store) = setup(&mock).await;

    let token = access_token("user@test.com", Role::User);
    let body = serde_json::json!({"items": [{"productId": 1, "quantity": 1}]});
    let response = app
        .oneshot(checkout_request(Some(&token), &body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let json = body_json(response).await;
    assert_eq!(json["message"], "Product service unavailable");
    assert_eq!(store.order_count(), 0);
}

#[tokio::test]
async fn test_listing_returns_own_orders_only() {
    let mock = MockCatalog::new();
    mock.add_product(1, "P1", dec("10.00"), 5);
    let (app, _store) = setup(&mock).await;

    let token = access_token("user@test.com", Role::User);
    let body = serde_json::json!({"items": [{"productId": 1, "quantity": 2}]});
    let response = app
        .clone()
        .oneshot(checkout_request(Some(&token), &body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let list_for = |token: String| {
        let app = app.clone();
        async move {
            let request = Request::builder()
                .uri("/api/orders")
                .header("authorization", format!("Bearer {token}"))
                .body(Body::empty())
                .unwrap();
            let response = app.oneshot(request).await.unwrap();
            assert_eq!(response.status(), StatusCode::OK);
            body_json(response).await
        }
    };

    let mine = list_for(access_token("user@test.com", Role::User)).await;
    assert_eq!(mine.as_array().unwrap().len(), 1);
    assert_eq!(mine[0]["total"], "20.00");

    let theirs = list_for(access_token("other@test.com", Role::User)).await;
    assert!(theirs.as_array().unwrap().is_empty());
}
