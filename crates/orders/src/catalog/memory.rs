//! In-memory catalog for testing.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rust_decimal::Decimal;

use clementine_core::ProductId;

use super::{CatalogApi, CatalogError, ProductSnapshot};

#[derive(Debug, Clone)]
struct StockedProduct {
    name: String,
    price: Decimal,
    stock: u32,
}

#[derive(Debug, Default)]
struct InMemoryState {
    products: HashMap<i64, StockedProduct>,
    fetch_calls: Vec<ProductId>,
    reserve_calls: Vec<(ProductId, u32)>,
    unavailable: bool,
}

/// In-memory catalog for tests.
///
/// Mirrors the classification behavior of
/// [`HttpCatalogClient`](super::HttpCatalogClient) and records every call so
/// tests can assert which lines of a cart were actually contacted.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    state: Arc<Mutex<InMemoryState>>,
}

impl InMemoryCatalog {
    /// Creates a new empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a product.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn add_product(&self, id: i64, name: &str, price: Decimal, stock: u32) {
        self.state.lock().expect("catalog lock poisoned").products.insert(
            id,
            StockedProduct {
                name: name.to_string(),
                price,
                stock,
            },
        );
    }

    /// Make every subsequent call fail as `Unavailable`, simulating an
    /// outage.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.state.lock().expect("catalog lock poisoned").unavailable = unavailable;
    }

    /// Remaining stock for a product, if it exists.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn stock_of(&self, id: i64) -> Option<u32> {
        self.state
            .lock()
            .expect("catalog lock poisoned")
            .products
            .get(&id)
            .map(|p| p.stock)
    }

    /// Products fetched so far, in call order.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn fetch_calls(&self) -> Vec<ProductId> {
        self.state
            .lock()
            .expect("catalog lock poisoned")
            .fetch_calls
            .clone()
    }

    /// Reservations attempted so far, in call order.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn reserve_calls(&self) -> Vec<(ProductId, u32)> {
        self.state
            .lock()
            .expect("catalog lock poisoned")
            .reserve_calls
            .clone()
    }
}

#[async_trait]
impl CatalogApi for InMemoryCatalog {
    async fn fetch_product(&self, id: ProductId) -> Result<ProductSnapshot, CatalogError> {
        let mut state = self.state.lock().expect("catalog lock poisoned");
        state.fetch_calls.push(id);

        if state.unavailable {
            return Err(CatalogError::Unavailable("catalog offline".to_string()));
        }

        let product = state
            .products
            .get(&id.as_i64())
            .ok_or(CatalogError::NotFound)?;

        Ok(ProductSnapshot {
            id,
            name: product.name.clone(),
            price: product.price,
            stock: i32::try_from(product.stock).unwrap_or(i32::MAX),
        })
    }

    async fn reserve_stock(&self, id: ProductId, quantity: u32) -> Result<(), CatalogError> {
        let mut state = self.state.lock().expect("catalog lock poisoned");
        state.reserve_calls.push((id, quantity));

        if state.unavailable {
            return Err(CatalogError::Unavailable("catalog offline".to_string()));
        }

        // A product missing at reserve time surfaces as Unavailable, like
        // the HTTP client's treatment of an unexpected 404
        let product = state
            .products
            .get_mut(&id.as_i64())
            .ok_or_else(|| CatalogError::Unavailable("product missing at reserve".to_string()))?;

        if product.stock < quantity {
            return Err(CatalogError::Conflict);
        }

        product.stock -= quantity;
        Ok(())
    }
}
