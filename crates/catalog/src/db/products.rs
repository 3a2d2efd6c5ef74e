//! Product repository for database operations.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use clementine_core::ProductId;

use super::RepositoryError;
use crate::models::Product;

/// Row shape shared by the product queries.
#[derive(sqlx::FromRow)]
struct ProductRow {
    id: i64,
    name: String,
    description: String,
    price: Decimal,
    stock: i32,
    created_at: DateTime<Utc>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Self {
            id: ProductId::new(row.id),
            name: row.name,
            description: row.description,
            price: row.price,
            stock: row.stock,
            created_at: row.created_at,
        }
    }
}

/// Fields accepted when creating or replacing a product.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub stock: i32,
}

/// Outcome of a stock reservation attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReserveOutcome {
    /// Stock was decremented and committed.
    Reserved,
    /// Available stock is below the requested quantity; nothing changed.
    InsufficientStock,
    /// No product with this id.
    NotFound,
}

/// Repository for product database operations.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all products, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<Product>, RepositoryError> {
        let rows = sqlx::query_as::<_, ProductRow>(
            r"
            SELECT id, name, description, price, stock, created_at
            FROM products
            ORDER BY id DESC
            ",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Product::from).collect())
    }

    /// Get a product by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(
            r"
            SELECT id, name, description, price, stock, created_at
            FROM products
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Product::from))
    }

    /// Create a new product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(&self, new: &NewProduct) -> Result<Product, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(
            r"
            INSERT INTO products (name, description, price, stock)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, description, price, stock, created_at
            ",
        )
        .bind(&new.name)
        .bind(&new.description)
        .bind(new.price)
        .bind(new.stock)
        .fetch_one(self.pool)
        .await?;

        Ok(row.into())
    }

    /// Replace a product's fields.
    ///
    /// Returns `None` when the product doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the update fails.
    pub async fn update(
        &self,
        id: ProductId,
        new: &NewProduct,
    ) -> Result<Option<Product>, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(
            r"
            UPDATE products
            SET name = $2, description = $3, price = $4, stock = $5
            WHERE id = $1
            RETURNING id, name, description, price, stock, created_at
            ",
        )
        .bind(id)
        .bind(&new.name)
        .bind(&new.description)
        .bind(new.price)
        .bind(new.stock)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Product::from))
    }

    /// Delete a product.
    ///
    /// # Returns
    ///
    /// Returns `true` if the product was deleted, `false` if it didn't exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(&self, id: ProductId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Atomically check and decrement a product's stock.
    ///
    /// The row is locked for the duration of the transaction, serializing
    /// concurrent reservations for the same product: stock is read, checked
    /// against the requested quantity, and only then decremented, so it can
    /// never go negative. On insufficient stock nothing is written.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if any statement fails.
    pub async fn reserve(
        &self,
        id: ProductId,
        quantity: i32,
    ) -> Result<ReserveOutcome, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let row: Option<(i32,)> =
            sqlx::query_as("SELECT stock FROM products WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;

        let Some((stock,)) = row else {
            return Ok(ReserveOutcome::NotFound);
        };

        if stock < quantity {
            return Ok(ReserveOutcome::InsufficientStock);
        }

        sqlx::query("UPDATE products SET stock = stock - $2 WHERE id = $1")
            .bind(id)
            .bind(quantity)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(ReserveOutcome::Reserved)
    }
}
