//! Application state shared across handlers.

use std::sync::Arc;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use thiserror::Error;

use clementine_core::{TokenCodec, TokenError};

use crate::catalog::{CatalogApi, HttpCatalogClient};
use crate::config::OrdersConfig;
use crate::db::{OrderStore, PgOrderStore};

/// Error creating application state.
#[derive(Debug, Error)]
pub enum StateError {
    #[error("token codec: {0}")]
    Token(#[from] TokenError),
    #[error("catalog client: {0}")]
    CatalogClient(#[from] reqwest::Error),
}

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`. The catalog client and order store sit
/// behind trait objects so tests can swap in in-memory implementations
/// while exercising the real router.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: OrdersConfig,
    pool: Option<PgPool>,
    catalog: Arc<dyn CatalogApi>,
    store: Arc<dyn OrderStore>,
    tokens: TokenCodec,
}

impl AppState {
    /// Create the production state: HTTP catalog client, Postgres store.
    ///
    /// # Errors
    ///
    /// Returns an error if the verification secret is unusable or the HTTP
    /// client fails to build; the service must not start in either case.
    pub fn new(config: OrdersConfig, pool: PgPool) -> Result<Self, StateError> {
        let tokens = TokenCodec::from_base64_secret(config.jwt_secret.expose_secret())?;
        let catalog = HttpCatalogClient::new(&config.product_base_url, config.catalog_timeout)?;
        let store = PgOrderStore::new(pool.clone());

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                pool: Some(pool),
                catalog: Arc::new(catalog),
                store: Arc::new(store),
                tokens,
            }),
        })
    }

    /// Create a state with injected catalog and store implementations.
    ///
    /// Used by tests to drive the real router against in-memory components;
    /// readiness reports unavailable since there is no pool.
    ///
    /// # Errors
    ///
    /// Returns an error if the verification secret is unusable.
    pub fn with_components(
        config: OrdersConfig,
        catalog: Arc<dyn CatalogApi>,
        store: Arc<dyn OrderStore>,
    ) -> Result<Self, StateError> {
        let tokens = TokenCodec::from_base64_secret(config.jwt_secret.expose_secret())?;

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                pool: None,
                catalog,
                store,
                tokens,
            }),
        })
    }

    /// Get a reference to the service configuration.
    #[must_use]
    pub fn config(&self) -> &OrdersConfig {
        &self.inner.config
    }

    /// Get the database connection pool, if the state has one.
    #[must_use]
    pub fn pool(&self) -> Option<&PgPool> {
        self.inner.pool.as_ref()
    }

    /// Get the catalog client.
    #[must_use]
    pub fn catalog(&self) -> Arc<dyn CatalogApi> {
        Arc::clone(&self.inner.catalog)
    }

    /// Get the order store.
    #[must_use]
    pub fn store(&self) -> Arc<dyn OrderStore> {
        Arc::clone(&self.inner.store)
    }

    /// Get a reference to the token codec.
    #[must_use]
    pub fn tokens(&self) -> &TokenCodec {
        &self.inner.tokens
    }
}
