//! Order persistence.
//!
//! # Tables
//!
//! - `orders` - One row per order
//! - `order_items` - Item snapshots, cascading with their order
//!
//! The [`OrderStore`] trait is the seam between the checkout saga and
//! storage: production uses [`PgOrderStore`], tests use
//! [`memory::InMemoryOrderStore`]. Queries use sqlx's runtime API so the
//! crate builds without a live database.

pub mod memory;
pub mod orders;

use std::time::Duration;

use async_trait::async_trait;
use rust_decimal::Decimal;
use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

use clementine_core::Email;

use crate::models::{Order, OrderItem};

pub use memory::InMemoryOrderStore;
pub use orders::PgOrderStore;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),
}

/// Transactional storage for order aggregates.
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Persist an order with all of its items atomically.
    ///
    /// Either the order and every item commit together, or nothing does;
    /// a partially written order is impossible.
    async fn create(
        &self,
        owner: &Email,
        total: Decimal,
        items: Vec<OrderItem>,
    ) -> Result<Order, RepositoryError>;

    /// List the owner's orders, newest first.
    async fn list_for_owner(&self, owner: &Email) -> Result<Vec<Order>, RepositoryError>;
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
