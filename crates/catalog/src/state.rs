//! Application state shared across handlers.

use std::sync::Arc;

use secrecy::ExposeSecret;
use sqlx::PgPool;

use clementine_core::{TokenCodec, TokenError};

use crate::config::CatalogConfig;

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: CatalogConfig,
    pool: PgPool,
    tokens: TokenCodec,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured verification secret is unusable;
    /// the service must not start in that case.
    pub fn new(config: CatalogConfig, pool: PgPool) -> Result<Self, TokenError> {
        let tokens = TokenCodec::from_base64_secret(config.jwt_secret.expose_secret())?;

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                tokens,
            }),
        })
    }

    /// Get a reference to the service configuration.
    #[must_use]
    pub fn config(&self) -> &CatalogConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Get a reference to the token codec.
    #[must_use]
    pub fn tokens(&self) -> &TokenCodec {
        &self.inner.tokens
    }
}
