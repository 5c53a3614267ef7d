//! Catalog client speaking JSON over HTTP to the product service.

use std::time::Duration;

use async_trait::async_trait;
use domain::{Product, ProductCatalog};
use reqwest::Client;

use super::catalog::CatalogClient;
use crate::error::PlacementError;

/// Client for the product service's `/products` endpoints.
///
/// Every request is bounded by the client-level timeout; a timeout surfaces
/// as the same error as any other transport failure.
#[derive(Debug, Clone)]
pub struct HttpCatalogClient {
    client: Client,
    base_url: String,
}

impl HttpCatalogClient {
    /// Creates a client for the product service at `base_url`.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Returns the base URL requests are sent to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn products_url(&self) -> String {
        format!("{}/products", self.base_url)
    }
}

fn describe(err: &reqwest::Error) -> String {
    if err.is_timeout() {
        format!("request timed out: {err}")
    } else if err.is_connect() {
        format!("cannot connect: {err}")
    } else {
        err.to_string()
    }
}

#[async_trait]
impl CatalogClient for HttpCatalogClient {
    #[tracing::instrument(skip(self), fields(url = %self.products_url()))]
    async fn fetch_catalog(&self) -> Result<Vec<Product>, PlacementError> {
        metrics::counter!("catalog_requests_total", "op" => "fetch").increment(1);

        let response = self
            .client
            .get(self.products_url())
            .send()
            .await
            .map_err(|e| PlacementError::CatalogUnavailable(describe(&e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(PlacementError::CatalogUnavailable(format!(
                "get products request failed with status: {status}"
            )));
        }

        let catalog: ProductCatalog = response
            .json()
            .await
            .map_err(|e| PlacementError::CatalogUnavailable(describe(&e)))?;

        tracing::debug!(products = catalog.products.len(), "catalog fetched");
        Ok(catalog.products)
    }

    #[tracing::instrument(skip(self, products), fields(url = %self.products_url(), count = products.len()))]
    async fn apply_inventory(&self, products: Vec<Product>) -> Result<(), PlacementError> {
        metrics::counter!("catalog_requests_total", "op" => "apply").increment(1);

        let response = self
            .client
            .patch(self.products_url())
            .json(&products)
            .send()
            .await
            .map_err(|e| PlacementError::CatalogUpdateFailed(describe(&e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PlacementError::CatalogUpdateFailed(format!(
                "update product request failed with status: {status} {body}"
            )));
        }

        Ok(())
    }
}
