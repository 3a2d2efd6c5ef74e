//! `PostgreSQL`-backed order store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use clementine_core::{Email, OrderId, OrderStatus, ProductId};

use super::{OrderStore, RepositoryError};
use crate::models::{Order, OrderItem};

#[derive(sqlx::FromRow)]
struct OrderRow {
    id: i64,
    user_email: Email,
    total: Decimal,
    status: String,
    created_at: DateTime<Utc>,
}

#[derive(sqlx::FromRow)]
struct ItemRow {
    product_id: i64,
    name: String,
    price: Decimal,
    quantity: i32,
}

impl ItemRow {
    fn into_item(self) -> Result<OrderItem, RepositoryError> {
        let quantity = u32::try_from(self.quantity).map_err(|_| {
            RepositoryError::DataCorruption("negative quantity in database".to_string())
        })?;

        Ok(OrderItem {
            product_id: ProductId::new(self.product_id),
            name: self.name,
            price: self.price,
            quantity,
        })
    }
}

fn parse_status(s: &str) -> Result<OrderStatus, RepositoryError> {
    match s {
        "CREATED" => Ok(OrderStatus::Created),
        other => Err(RepositoryError::DataCorruption(format!(
            "unknown order status in database: {other}"
        ))),
    }
}

/// Order store backed by the service's `PostgreSQL` database.
#[derive(Clone)]
pub struct PgOrderStore {
    pool: PgPool,
}

impl PgOrderStore {
    /// Create a new store over a connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OrderStore for PgOrderStore {
    async fn create(
        &self,
        owner: &Email,
        total: Decimal,
        items: Vec<OrderItem>,
    ) -> Result<Order, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let (id, created_at): (i64, DateTime<Utc>) = sqlx::query_as(
            r"
            INSERT INTO orders (user_email, total, status)
            VALUES ($1, $2, $3)
            RETURNING id, created_at
            ",
        )
        .bind(owner)
        .bind(total)
        .bind(OrderStatus::Created.as_str())
        .fetch_one(&mut *tx)
        .await?;

        for item in &items {
            let quantity = i32::try_from(item.quantity).map_err(|_| {
                RepositoryError::DataCorruption("quantity out of range".to_string())
            })?;

            sqlx::query(
                r"
                INSERT INTO order_items (order_id, product_id, name, price, quantity)
                VALUES ($1, $2, $3, $4, $5)
                ",
            )
            .bind(id)
            .bind(item.product_id)
            .bind(&item.name)
            .bind(item.price)
            .bind(quantity)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(Order {
            id: OrderId::new(id),
            owner_email: owner.clone(),
            total,
            status: OrderStatus::Created,
            items,
            created_at,
        })
    }

    async fn list_for_owner(&self, owner: &Email) -> Result<Vec<Order>, RepositoryError> {
        let rows = sqlx::query_as::<_, OrderRow>(
            r"
            SELECT id, user_email, total, status, created_at
            FROM orders
            WHERE user_email = $1
            ORDER BY created_at DESC
            ",
        )
        .bind(owner)
        .fetch_all(&self.pool)
        .await?;

        let mut orders = Vec::with_capacity(rows.len());
        for row in rows {
            let item_rows = sqlx::query_as::<_, ItemRow>(
                r"
                SELECT product_id, name, price, quantity
                FROM order_items
                WHERE order_id = $1
                ORDER BY id ASC
                ",
            )
            .bind(row.id)
            .fetch_all(&self.pool)
            .await?;

            let items = item_rows
                .into_iter()
                .map(ItemRow::into_item)
                .collect::<Result<Vec<_>, _>>()?;

            orders.push(Order {
                id: OrderId::new(row.id),
                owner_email: row.user_email,
                total: row.total,
                status: parse_status(&row.status)?,
                items,
                created_at: row.created_at,
            });
        }

        Ok(orders)
    }
}
