//! Product model.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use clementine_core::ProductId;

/// A catalog product with its available stock.
///
/// Serializes straight onto the wire as `{id, name, description, price,
/// stock}`; consumers (the order service among them) read price and stock
/// from this shape at checkout time.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Product {
    /// Database identifier.
    pub id: ProductId,
    /// Display name, snapshotted into order items at checkout.
    pub name: String,
    /// Free-text description.
    pub description: String,
    /// Unit price; non-negative.
    pub price: Decimal,
    /// Available stock; non-negative, decremented only via reservation.
    pub stock: i32,
    /// Creation timestamp; not part of the wire shape.
    #[serde(skip)]
    pub created_at: DateTime<Utc>,
}
