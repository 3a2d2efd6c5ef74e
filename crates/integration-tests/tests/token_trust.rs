//! Token trust propagation across service boundaries.
//!
//! The filter never rejects: an expired or tampered token is treated exactly
//! like no token at all, and only an endpoint's own policy turns the missing
//! principal into a 401/403.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use rust_decimal::Decimal;
use tower::ServiceExt;

use clementine_core::Role;
use clementine_integration_tests::{
    access_token, catalog_app, expired_access_token, identity_app, orders_app, refresh_token,
};
use clementine_orders::catalog::InMemoryCatalog;
use clementine_orders::db::InMemoryOrderStore;

fn orders() -> Router {
    let catalog = InMemoryCatalog::new();
    catalog.add_product(1, "P1", "10.00".parse::<Decimal>().unwrap(), 5);
    orders_app(
        "http://127.0.0.1:1",
        Arc::new(catalog),
        Arc::new(InMemoryOrderStore::new()),
    )
}

fn get_orders(token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri("/api/orders");
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}

async fn status_with(token: Option<&str>) -> StatusCode {
    orders()
        .oneshot(get_orders(token))
        .await
        .unwrap()
        .status()
}

#[tokio::test]
async fn test_valid_token_is_accepted() {
    assert_eq!(
        status_with(Some(&access_token("user@test.com", Role::User))).await,
        StatusCode::OK
    );
}

#[tokio::test]
async fn test_missing_token_is_rejected_by_policy() {
    assert_eq!(status_with(None).await, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_garbage_token_behaves_like_no_token() {
    assert_eq!(
        status_with(Some("not-a-jwt")).await,
        StatusCode::UNAUTHORIZED
    );
}

#[tokio::test]
async fn test_expired_token_behaves_like_no_token() {
    assert_eq!(
        status_with(Some(&expired_access_token("user@test.com"))).await,
        StatusCode::UNAUTHORIZED
    );
}

#[tokio::test]
async fn test_tampered_token_behaves_like_no_token() {
    let mut token = access_token("user@test.com", Role::User);
    let last = if token.ends_with('A') { 'B' } else { 'A' };
    token.pop();
    token.push(last);

    assert_eq!(status_with(Some(&token)).await, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_refresh_token_not_accepted_as_access() {
    assert_eq!(
        status_with(Some(&refresh_token("user@test.com"))).await,
        StatusCode::UNAUTHORIZED
    );
}

#[tokio::test]
async fn test_malformed_authorization_header_is_anonymous() {
    let request = Request::builder()
        .uri("/api/orders")
        .header("authorization", "Basic dXNlcjpwdw==")
        .body(Body::empty())
        .unwrap();

    let response = orders().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

// =============================================================================
// The same token is honored by every service independently
// =============================================================================

#[tokio::test]
async fn test_identity_verify_accepts_access_token() {
    let request = Request::builder()
        .uri("/api/auth/verify")
        .header(
            "authorization",
            format!("Bearer {}", access_token("user@test.com", Role::User)),
        )
        .body(Body::empty())
        .unwrap();

    let response = identity_app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_identity_verify_rejects_anonymous() {
    let request = Request::builder()
        .uri("/api/auth/verify")
        .body(Body::empty())
        .unwrap();

    let response = identity_app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_catalog_admin_surface_rejects_anonymous_and_non_admin() {
    let payload = serde_json::json!({
        "name": "P1", "description": "", "price": "10.00", "stock": 5
    });

    let request = |token: Option<String>| {
        let mut builder = Request::builder()
            .method("POST")
            .uri("/api/admin/products")
            .header("content-type", "application/json");
        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {token}"));
        }
        builder
            .body(Body::from(serde_json::to_vec(&payload).unwrap()))
            .unwrap()
    };

    // Anonymous: no principal attached, policy answers 401
    let response = catalog_app().oneshot(request(None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // Authenticated but not admin: policy answers 403
    let response = catalog_app()
        .oneshot(request(Some(access_token("user@test.com", Role::User))))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}
