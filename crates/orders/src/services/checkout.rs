//! The checkout saga.
//!
//! One checkout request walks the cart in order, and for each line does a
//! blocking fetch-then-reserve against the catalog before moving on; there
//! is no fan-out across lines. Only when every line has been priced and
//! reserved is the order committed locally, in a single transaction.
//!
//! Failure semantics: processing stops at the first failing line. Lines
//! after it are never contacted. Lines before it have already had stock
//! decremented remotely, and that reservation is NOT released - there is no
//! compensation step, so an abort after a partial reservation leaks reserved
//! stock. No order row is ever written on an abort.

use std::sync::Arc;

use rust_decimal::Decimal;
use thiserror::Error;

use clementine_core::{Principal, ProductId};

use crate::catalog::{CatalogApi, CatalogError};
use crate::db::{OrderStore, RepositoryError};
use crate::models::{Order, OrderItem};

/// One line of a submitted cart.
///
/// Duplicate product ids across lines are legal and additive; each line is
/// priced and reserved independently, in cart order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CartLine {
    /// The product to buy.
    pub product_id: ProductId,
    /// Requested quantity; at least 1.
    pub quantity: u32,
}

/// Why a checkout aborted.
///
/// Every outbound failure is classified into one of these before it crosses
/// the saga's boundary; callers never see a transport error. `NotFound` and
/// `Unavailable` stay distinct because they demand different recovery: fix
/// the cart versus retry later.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// The cart has zero lines. The catalog is never contacted.
    #[error("empty cart")]
    EmptyCart,

    /// A line requested quantity zero.
    #[error("invalid quantity")]
    InvalidQuantity,

    /// A line referenced a product the catalog does not know.
    #[error("product not found")]
    ProductNotFound,

    /// The catalog reported insufficient stock for a line.
    #[error("stock not available")]
    StockNotAvailable,

    /// The catalog could not be reached or answered unexpectedly.
    #[error("product service unavailable")]
    ServiceUnavailable,

    /// The local order commit failed; nothing was persisted.
    #[error("order store error: {0}")]
    Store(#[from] RepositoryError),
}

/// Coordinates one checkout: remote pricing, remote reservation, local
/// commit.
///
/// Holds no cross-request state and no locks; concurrent checkouts only meet
/// at the catalog's per-product stock rows, whose mutual exclusion is the
/// reservation endpoint's job.
#[derive(Clone)]
pub struct CheckoutService {
    catalog: Arc<dyn CatalogApi>,
    store: Arc<dyn OrderStore>,
}

impl CheckoutService {
    /// Create a new checkout service over a catalog client and order store.
    #[must_use]
    pub fn new(catalog: Arc<dyn CatalogApi>, store: Arc<dyn OrderStore>) -> Self {
        Self { catalog, store }
    }

    /// Run the checkout saga for one cart.
    ///
    /// The authenticated principal is passed in explicitly; its subject
    /// becomes the order owner.
    ///
    /// # Errors
    ///
    /// Returns the first [`CheckoutError`] encountered; see the module
    /// documentation for what has and has not happened remotely by then.
    pub async fn checkout(
        &self,
        principal: &Principal,
        cart: &[CartLine],
    ) -> Result<Order, CheckoutError> {
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }
        if cart.iter().any(|line| line.quantity == 0) {
            return Err(CheckoutError::InvalidQuantity);
        }

        let mut items = Vec::with_capacity(cart.len());
        let mut total = Decimal::ZERO;

        for line in cart {
            let snapshot = self
                .catalog
                .fetch_product(line.product_id)
                .await
                .map_err(|e| match e {
                    CatalogError::NotFound => CheckoutError::ProductNotFound,
                    CatalogError::Conflict | CatalogError::Unavailable(_) => {
                        CheckoutError::ServiceUnavailable
                    }
                })?;

            self.catalog
                .reserve_stock(line.product_id, line.quantity)
                .await
                .map_err(|e| match e {
                    CatalogError::Conflict => CheckoutError::StockNotAvailable,
                    CatalogError::NotFound | CatalogError::Unavailable(_) => {
                        CheckoutError::ServiceUnavailable
                    }
                })?;

            let item = OrderItem {
                product_id: line.product_id,
                name: snapshot.name,
                price: snapshot.price,
                quantity: line.quantity,
            };
            total += item.line_total();
            items.push(item);
        }

        let order = self
            .store
            .create(&principal.subject, total, items)
            .await?;

        tracing::info!(
            order_id = %order.id,
            owner = %order.owner_email,
            total = %order.total,
            "order created"
        );

        Ok(order)
    }

    /// List the principal's orders, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::Store`] if the store query fails.
    pub async fn list_orders(&self, principal: &Principal) -> Result<Vec<Order>, CheckoutError> {
        let orders = self.store.list_for_owner(&principal.subject).await?;
        Ok(orders)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use clementine_core::{Email, Role};

    use crate::catalog::InMemoryCatalog;
    use crate::db::InMemoryOrderStore;

    fn principal() -> Principal {
        Principal {
            subject: Email::parse("user@test.com").unwrap(),
            role: Role::User,
        }
    }

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn line(product_id: i64, quantity: u32) -> CartLine {
        CartLine {
            product_id: ProductId::new(product_id),
            quantity,
        }
    }

    fn service(catalog: &InMemoryCatalog, store: &InMemoryOrderStore) -> CheckoutService {
        CheckoutService::new(Arc::new(catalog.clone()), Arc::new(store.clone()))
    }

    #[tokio::test]
    async fn test_single_line_checkout_succeeds() {
        let catalog = InMemoryCatalog::new();
        catalog.add_product(1, "P1", dec("10.00"), 5);
        let store = InMemoryOrderStore::new();

        let order = service(&catalog, &store)
            .checkout(&principal(), &[line(1, 2)])
            .await
            .unwrap();

        assert_eq!(order.total, dec("20.00"));
        assert_eq!(order.owner_email.as_str(), "user@test.com");
        assert_eq!(order.status.as_str(), "CREATED");
        assert_eq!(
            order.items,
            vec![OrderItem {
                product_id: ProductId::new(1),
                name: "P1".to_string(),
                price: dec("10.00"),
                quantity: 2,
            }]
        );
        assert_eq!(store.order_count(), 1);
        assert_eq!(catalog.stock_of(1), Some(3));
    }

    #[tokio::test]
    async fn test_empty_cart_never_contacts_catalog() {
        let catalog = InMemoryCatalog::new();
        let store = InMemoryOrderStore::new();

        let result = service(&catalog, &store).checkout(&principal(), &[]).await;

        assert!(matches!(result, Err(CheckoutError::EmptyCart)));
        assert!(catalog.fetch_calls().is_empty());
        assert!(catalog.reserve_calls().is_empty());
        assert_eq!(store.order_count(), 0);
    }

    #[tokio::test]
    async fn test_zero_quantity_rejected_before_catalog() {
        let catalog = InMemoryCatalog::new();
        catalog.add_product(1, "P1", dec("10.00"), 5);
        let store = InMemoryOrderStore::new();

        let result = service(&catalog, &store)
            .checkout(&principal(), &[line(1, 0)])
            .await;

        assert!(matches!(result, Err(CheckoutError::InvalidQuantity)));
        assert!(catalog.fetch_calls().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_product_aborts_without_reserving() {
        let catalog = InMemoryCatalog::new();
        catalog.add_product(1, "P1", dec("10.00"), 5);
        let store = InMemoryOrderStore::new();

        let result = service(&catalog, &store)
            .checkout(&principal(), &[line(99, 1), line(1, 1)])
            .await;

        assert!(matches!(result, Err(CheckoutError::ProductNotFound)));
        // Only the failing line was fetched; nothing was reserved and the
        // later line was never queried
        assert_eq!(catalog.fetch_calls(), vec![ProductId::new(99)]);
        assert!(catalog.reserve_calls().is_empty());
        assert_eq!(store.order_count(), 0);
    }

    #[tokio::test]
    async fn test_mid_cart_conflict_stops_processing_and_keeps_earlier_reservation() {
        let catalog = InMemoryCatalog::new();
        catalog.add_product(1, "P1", dec("10.00"), 5);
        catalog.add_product(2, "P2", dec("4.50"), 1);
        catalog.add_product(3, "P3", dec("2.00"), 9);
        let store = InMemoryOrderStore::new();

        let result = service(&catalog, &store)
            .checkout(&principal(), &[line(1, 2), line(2, 5), line(3, 1)])
            .await;

        assert!(matches!(result, Err(CheckoutError::StockNotAvailable)));
        // Line 3 was never contacted in any way
        assert_eq!(
            catalog.fetch_calls(),
            vec![ProductId::new(1), ProductId::new(2)]
        );
        assert_eq!(catalog.reserve_calls(), vec![(ProductId::new(1), 2)]);
        // No order, but line 1's reservation stands: stock stays decremented
        assert_eq!(store.order_count(), 0);
        assert_eq!(catalog.stock_of(1), Some(3));
        assert_eq!(catalog.stock_of(2), Some(1));
    }

    #[tokio::test]
    async fn test_catalog_outage_maps_to_service_unavailable() {
        let catalog = InMemoryCatalog::new();
        catalog.add_product(1, "P1", dec("10.00"), 5);
        catalog.set_unavailable(true);
        let store = InMemoryOrderStore::new();

        let result = service(&catalog, &store)
            .checkout(&principal(), &[line(1, 1)])
            .await;

        assert!(matches!(result, Err(CheckoutError::ServiceUnavailable)));
        assert_eq!(store.order_count(), 0);
    }

    #[tokio::test]
    async fn test_duplicate_lines_are_additive() {
        let catalog = InMemoryCatalog::new();
        catalog.add_product(1, "P1", dec("3.00"), 10);
        let store = InMemoryOrderStore::new();

        let order = service(&catalog, &store)
            .checkout(&principal(), &[line(1, 2), line(1, 3)])
            .await
            .unwrap();

        assert_eq!(order.total, dec("15.00"));
        assert_eq!(order.items.len(), 2);
        assert_eq!(catalog.stock_of(1), Some(5));
    }

    #[tokio::test]
    async fn test_concurrent_checkouts_race_for_last_unit() {
        let catalog = InMemoryCatalog::new();
        catalog.add_product(1, "P1", dec("10.00"), 1);
        let store = InMemoryOrderStore::new();
        let service = service(&catalog, &store);

        let cart = [line(1, 1)];
        let principal = principal();
        let (a, b) = tokio::join!(
            service.checkout(&principal, &cart),
            service.checkout(&principal, &cart),
        );

        let results = [a, b];
        let successes = results.iter().filter(|r| r.is_ok()).count();
        assert_eq!(successes, 1);
        assert!(
            results
                .iter()
                .any(|r| matches!(r, Err(CheckoutError::StockNotAvailable)))
        );
        assert_eq!(catalog.stock_of(1), Some(0));
        assert_eq!(store.order_count(), 1);
    }

    #[tokio::test]
    async fn test_list_orders_newest_first() {
        let catalog = InMemoryCatalog::new();
        catalog.add_product(1, "P1", dec("10.00"), 10);
        let store = InMemoryOrderStore::new();
        let service = service(&catalog, &store);

        let first = service
            .checkout(&principal(), &[line(1, 1)])
            .await
            .unwrap();
        let second = service
            .checkout(&principal(), &[line(1, 2)])
            .await
            .unwrap();

        let orders = service.list_orders(&principal()).await.unwrap();
        assert_eq!(
            orders.iter().map(|o| o.id).collect::<Vec<_>>(),
            vec![second.id, first.id]
        );

        // Another user sees nothing
        let other = Principal {
            subject: Email::parse("other@test.com").unwrap(),
            role: Role::User,
        };
        assert!(service.list_orders(&other).await.unwrap().is_empty());
    }
}
