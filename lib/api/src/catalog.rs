// Catalog source: one GET against the product-listing endpoint per session
use std::time::Duration;

use aisearch_core::{Catalog, Error, Result};
use tracing::info;

pub const DEFAULT_CATALOG_URL: &str = "https://fakestoreapi.com/products/";

pub struct CatalogSource {
    client: reqwest::Client,
    url: String,
}

impl CatalogSource {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Transport(e.to_string()))?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Fetch the full listing, in provider order. No pagination.
    pub async fn fetch(&self) -> Result<Catalog> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| Error::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Transport(format!("Catalog source returned HTTP {}", status)));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| Error::Transport(e.to_string()))?;
        let catalog = decode_catalog(&body)?;
        info!(url = %self.url, products = catalog.len(), "Catalog loaded");
        Ok(catalog)
    }
}

fn decode_catalog(body: &[u8]) -> Result<Catalog> {
    serde_json::from_slice(body).map_err(|e| Error::Decode(format!("Invalid catalog: {}", e)))
}
