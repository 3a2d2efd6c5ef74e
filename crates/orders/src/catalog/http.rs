//! HTTP catalog client over reqwest.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;

use clementine_core::ProductId;

use super::{CatalogApi, CatalogError, ProductSnapshot};

/// Synchronous-in-effect catalog client: one request per call, blocking the
/// calling task until the catalog answers or the timeout fires.
///
/// The timeout lives here, at the transport layer; the saga imposes none of
/// its own.
#[derive(Clone)]
pub struct HttpCatalogClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpCatalogClient {
    /// Create a new catalog client.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client fails to build.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_owned(),
        })
    }
}

#[async_trait]
impl CatalogApi for HttpCatalogClient {
    async fn fetch_product(&self, id: ProductId) -> Result<ProductSnapshot, CatalogError> {
        let url = format!("{}/api/products/{}", self.base_url, id);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| CatalogError::Unavailable(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            response
                .json::<ProductSnapshot>()
                .await
                .map_err(|e| CatalogError::Unavailable(format!("bad product payload: {e}")))
        } else if status == StatusCode::NOT_FOUND {
            Err(CatalogError::NotFound)
        } else {
            Err(CatalogError::Unavailable(format!(
                "catalog returned {status}"
            )))
        }
    }

    async fn reserve_stock(&self, id: ProductId, quantity: u32) -> Result<(), CatalogError> {
        let url = format!(
            "{}/api/products/{}/reserve?qty={}",
            self.base_url, id, quantity
        );

        let response = self
            .client
            .post(&url)
            .send()
            .await
            .map_err(|e| CatalogError::Unavailable(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else if status == StatusCode::CONFLICT {
            Err(CatalogError::Conflict)
        } else {
            // 404 at reserve time (product deleted mid-checkout) lands here
            // too, matching the fetch-then-reserve contract
            Err(CatalogError::Unavailable(format!(
                "catalog returned {status}"
            )))
        }
    }
}
