//! HTTP client for the ai-search endpoint
//!
//! Implements [`RelevanceBackend`] so a [`SearchSession`](aisearch_core::SearchSession)
//! can drive searches against a running server.

use std::time::Duration;

use aisearch_core::{Error, ProductId, RelevanceBackend, Result, SearchRequest};
use aisearch_relevance::SearchResponse;
use async_trait::async_trait;
use tracing::debug;

pub const SEARCH_PATH: &str = "/api/v1/ai-search";

pub struct HttpRelevanceClient {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpRelevanceClient {
    /// `base_url` is the server root, e.g. `http://localhost:4001`
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Transport(e.to_string()))?;
        Ok(Self {
            client,
            endpoint: endpoint_url(base_url),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl RelevanceBackend for HttpRelevanceClient {
    async fn search(&self, request: &SearchRequest) -> Result<Vec<ProductId>> {
        debug!(endpoint = %self.endpoint, products = request.catalog.len(), "Sending AI search");
        let response = self
            .client
            .post(&self.endpoint)
            .json(request)
            .send()
            .await
            .map_err(|e| Error::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| Error::Transport(e.to_string()))?;
        interpret(status, &body)
    }
}

fn endpoint_url(base_url: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), SEARCH_PATH)
}

/// The envelope decides the outcome; the status only helps describe
/// bodies that are not an envelope at all.
fn interpret(status: u16, body: &[u8]) -> Result<Vec<ProductId>> {
    let envelope: SearchResponse = serde_json::from_slice(body)
        .map_err(|e| Error::Decode(format!("HTTP {} with unreadable body: {}", status, e)))?;
    envelope.into_result().map_err(Error::Rejected)
}
