//! Catalog client classification over real HTTP.
//!
//! Every failure the transport can produce must land in exactly one
//! `CatalogError` variant before it reaches the saga.

#![allow(clippy::unwrap_used)]

use std::time::Duration;

use clementine_core::ProductId;
use clementine_integration_tests::mock_catalog::MockCatalog;
use clementine_orders::catalog::{CatalogApi, CatalogError, HttpCatalogClient};
use rust_decimal::Decimal;

fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

async fn client_for(mock: &MockCatalog) -> HttpCatalogClient {
    let base_url = mock.spawn().await;
    HttpCatalogClient::new(&base_url, Duration::from_secs(2)).unwrap()
}

#[tokio::test]
async fn test_fetch_product_success() {
    let mock = MockCatalog::new();
    mock.add_product(1, "P1", dec("10.00"), 5);
    let client = client_for(&mock).await;

    let snapshot = client.fetch_product(ProductId::new(1)).await.unwrap();

    assert_eq!(snapshot.id, ProductId::new(1));
    assert_eq!(snapshot.name, "P1");
    assert_eq!(snapshot.price, dec("10.00"));
    assert_eq!(snapshot.stock, 5);
}

#[tokio::test]
async fn test_fetch_missing_product_is_not_found() {
    let mock = MockCatalog::new();
    let client = client_for(&mock).await;

    let err = client.fetch_product(ProductId::new(99)).await.unwrap_err();
    assert_eq!(err, CatalogError::NotFound);
}

#[tokio::test]
async fn test_fetch_500_is_unavailable() {
    let mock = MockCatalog::new();
    mock.add_product(1, "P1", dec("10.00"), 5);
    mock.fail_with_500(true);
    let client = client_for(&mock).await;

    let err = client.fetch_product(ProductId::new(1)).await.unwrap_err();
    assert!(matches!(err, CatalogError::Unavailable(_)));
}

#[tokio::test]
async fn test_reserve_decrements_stock() {
    let mock = MockCatalog::new();
    mock.add_product(1, "P1", dec("10.00"), 5);
    let client = client_for(&mock).await;

    client.reserve_stock(ProductId::new(1), 3).await.unwrap();

    assert_eq!(mock.stock_of(1), Some(2));
    let snapshot = client.fetch_product(ProductId::new(1)).await.unwrap();
    assert_eq!(snapshot.stock, 2);
}

#[tokio::test]
async fn test_reserve_insufficient_stock_is_conflict() {
    let mock = MockCatalog::new();
    mock.add_product(1, "P1", dec("10.00"), 1);
    let client = client_for(&mock).await;

    let err = client.reserve_stock(ProductId::new(1), 2).await.unwrap_err();

    assert_eq!(err, CatalogError::Conflict);
    // 409 guarantees nothing changed
    assert_eq!(mock.stock_of(1), Some(1));
}

#[tokio::test]
async fn test_reserve_missing_product_is_unavailable() {
    // A 404 at reserve time is not a stock answer; it classifies with the
    // transport failures, not as NotFound
    let mock = MockCatalog::new();
    let client = client_for(&mock).await;

    let err = client.reserve_stock(ProductId::new(7), 1).await.unwrap_err();
    assert!(matches!(err, CatalogError::Unavailable(_)));
}

#[tokio::test]
async fn test_connection_refused_is_unavailable() {
    // Bind and immediately drop a listener to get a port nobody serves
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client =
        HttpCatalogClient::new(&format!("http://{addr}"), Duration::from_secs(2)).unwrap();

    let err = client.fetch_product(ProductId::new(1)).await.unwrap_err();
    assert!(matches!(err, CatalogError::Unavailable(_)));

    let err = client.reserve_stock(ProductId::new(1), 1).await.unwrap_err();
    assert!(matches!(err, CatalogError::Unavailable(_)));
}
