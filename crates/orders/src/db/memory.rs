//! In-memory order store for testing.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;

use clementine_core::{Email, OrderId, OrderStatus};

use super::{OrderStore, RepositoryError};
use crate::models::{Order, OrderItem};

#[derive(Debug, Default)]
struct InMemoryState {
    orders: Vec<Order>,
    next_id: i64,
}

/// In-memory order store for tests.
///
/// Same contract as [`super::PgOrderStore`]: an order and its items appear
/// together or not at all.
#[derive(Debug, Clone, Default)]
pub struct InMemoryOrderStore {
    state: Arc<Mutex<InMemoryState>>,
}

impl InMemoryOrderStore {
    /// Creates a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of persisted orders.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn order_count(&self) -> usize {
        self.state.lock().expect("store lock poisoned").orders.len()
    }
}

#[async_trait]
impl OrderStore for InMemoryOrderStore {
    async fn create(
        &self,
        owner: &Email,
        total: Decimal,
        items: Vec<OrderItem>,
    ) -> Result<Order, RepositoryError> {
        let mut state = self.state.lock().expect("store lock poisoned");

        state.next_id += 1;
        let order = Order {
            id: OrderId::new(state.next_id),
            owner_email: owner.clone(),
            total,
            status: OrderStatus::Created,
            items,
            created_at: Utc::now(),
        };
        state.orders.push(order.clone());

        Ok(order)
    }

    async fn list_for_owner(&self, owner: &Email) -> Result<Vec<Order>, RepositoryError> {
        let state = self.state.lock().expect("store lock poisoned");

        let mut orders: Vec<Order> = state
            .orders
            .iter()
            .filter(|o| &o.owner_email == owner)
            .cloned()
            .collect();
        orders.reverse();

        Ok(orders)
    }
}
