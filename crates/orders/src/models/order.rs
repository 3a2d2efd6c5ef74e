//! Order aggregate.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use clementine_core::{Email, OrderId, OrderStatus, ProductId};

/// A single line of a persisted order.
///
/// Name and price are snapshots taken from the catalog at checkout time and
/// are never re-synced afterwards; later catalog edits don't touch history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderItem {
    /// The catalog product this line refers to.
    pub product_id: ProductId,
    /// Product name at checkout time.
    pub name: String,
    /// Unit price at checkout time.
    pub price: Decimal,
    /// Quantity purchased; at least 1.
    pub quantity: u32,
}

impl OrderItem {
    /// The line's contribution to the order total.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

/// An order with all of its items.
///
/// Created atomically with its items in one local transaction and immutable
/// thereafter. Items live and die with their order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    /// Database identifier.
    pub id: OrderId,
    /// The buyer, taken from the authenticated principal's subject.
    pub owner_email: Email,
    /// Sum of all line totals.
    pub total: Decimal,
    /// Lifecycle status; always `CREATED` here.
    pub status: OrderStatus,
    /// Item snapshots in cart order.
    pub items: Vec<OrderItem>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_line_total() {
        let item = OrderItem {
            product_id: ProductId::new(1),
            name: "P1".to_string(),
            price: "10.00".parse().unwrap(),
            quantity: 3,
        };
        assert_eq!(item.line_total(), "30.00".parse::<Decimal>().unwrap());
    }
}
