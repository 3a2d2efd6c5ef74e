//! Catalog client: the order service's view of the remote catalog.
//!
//! Every outbound failure is classified into [`CatalogError`] before it
//! leaves this module; transport exceptions never escape to the saga. The
//! client performs no retries and no circuit breaking - a single failed
//! attempt is surfaced immediately.

pub mod http;
pub mod memory;

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;

use clementine_core::ProductId;

pub use http::HttpCatalogClient;
pub use memory::InMemoryCatalog;

/// Product state read from the catalog at checkout time.
///
/// Never cached: this reflects catalog state strictly at the moment of the
/// call and may already be stale by the time the reservation executes.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ProductSnapshot {
    /// Catalog product id.
    pub id: ProductId,
    /// Display name, frozen into the order item.
    pub name: String,
    /// Unit price, frozen into the order item.
    pub price: Decimal,
    /// Available stock as reported; informational only.
    pub stock: i32,
}

/// Classified outcome of a failed catalog call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    /// The catalog does not know this product (404).
    #[error("product not found")]
    NotFound,

    /// The catalog refused the reservation for lack of stock (409).
    #[error("insufficient stock")]
    Conflict,

    /// Transport failure, timeout, or an unexpected status. Distinct from
    /// [`CatalogError::NotFound`]: callers retry this one instead of fixing
    /// their request.
    #[error("catalog unavailable: {0}")]
    Unavailable(String),
}

/// Operations the checkout saga needs from the catalog.
///
/// Production uses [`HttpCatalogClient`]; tests use [`InMemoryCatalog`].
#[async_trait]
pub trait CatalogApi: Send + Sync {
    /// Fetch a product's current name, price, and stock.
    async fn fetch_product(&self, id: ProductId) -> Result<ProductSnapshot, CatalogError>;

    /// Reserve stock: check-and-decrement on the catalog side.
    ///
    /// On success the remote decrement has already happened and will not be
    /// undone by anything this service does later.
    async fn reserve_stock(&self, id: ProductId, quantity: u32) -> Result<(), CatalogError>;
}
