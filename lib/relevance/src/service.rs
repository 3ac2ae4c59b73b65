use std::sync::Arc;

use aisearch_core::ProductId;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{error, info};

use crate::error::{Result, SearchError};
use crate::parse::parse_ids;
use crate::prompt::build_prompt;
use crate::provider::CompletionProvider;

/// Decoding temperature for every relevance call
pub const TEMPERATURE: f32 = 0.0;

/// Wire envelope for `POST /api/v1/ai-search` responses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ids: Option<Vec<ProductId>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SearchResponse {
    pub fn ok(ids: Vec<ProductId>) -> Self {
        Self {
            success: true,
            ids: Some(ids),
            message: None,
            error: None,
        }
    }

    /// Turn a decoded envelope back into a tagged result
    pub fn into_result(self) -> std::result::Result<Vec<ProductId>, String> {
        match (self.success, self.ids) {
            (true, Some(ids)) => Ok(ids),
            (true, None) => Err("Response reported success without ids".to_string()),
            (false, _) => Err(self
                .message
                .or(self.error)
                .unwrap_or_else(|| "AI search failed".to_string())),
        }
    }
}

impl From<&SearchError> for SearchResponse {
    fn from(err: &SearchError) -> Self {
        let (message, error) = match err {
            SearchError::Validation(_) | SearchError::PayloadTooLarge(_) | SearchError::UpstreamFormat => {
                (Some(err.to_string()), None)
            }
            SearchError::Provider(_) | SearchError::MissingCredential(_) => (None, Some(err.to_string())),
        };
        Self {
            success: false,
            ids: None,
            message,
            error,
        }
    }
}

/// Raw request shape. Both fields are optional here so that a missing
/// field becomes a validation error instead of a framework rejection.
#[derive(Debug, Deserialize)]
struct RawSearchRequest {
    query: Option<Value>,
    products: Option<Value>,
}

/// Ranks a catalog against a query by delegating to a completion provider.
/// Stateless per request.
#[derive(Clone)]
pub struct RelevanceService {
    provider: Arc<dyn CompletionProvider>,
}

impl RelevanceService {
    pub fn new(provider: Arc<dyn CompletionProvider>) -> Self {
        Self { provider }
    }

    pub fn model(&self) -> &str {
        self.provider.model()
    }

    /// Validate a raw JSON request body and evaluate it.
    pub async fn evaluate_body(&self, body: &[u8]) -> Result<Vec<ProductId>> {
        let (query, products) = decode_request(body)?;
        self.evaluate(&query, &products).await
    }

    /// Ask the provider which of `products` match `query`, most relevant
    /// first. Entries may be typed products or raw JSON values; either way
    /// they reach the prompt as they serialize. The returned ids are not
    /// checked against `products`.
    pub async fn evaluate<T>(&self, query: &str, products: &[T]) -> Result<Vec<ProductId>>
    where
        T: Serialize + Sync,
    {
        if query.trim().is_empty() {
            return Err(SearchError::blank_query());
        }

        info!(query, products = products.len(), model = self.provider.model(), "AI search");
        let prompt = build_prompt(query, products)?;

        let raw = self.provider.complete(&prompt, TEMPERATURE).await.map_err(|e| {
            error!(error = %e, "AI search provider error");
            e
        })?;

        let ids = parse_ids(&raw)?;
        info!(returned = ids.len(), "AI search ranked");
        Ok(ids)
    }
}

/// Only the request shape is checked: a non-blank string `query` and an
/// array `products`. Entries are forwarded as sent.
fn decode_request(body: &[u8]) -> Result<(String, Vec<Value>)> {
    let raw: RawSearchRequest =
        serde_json::from_slice(body).map_err(|_| SearchError::invalid_request())?;

    let query = match raw.query {
        Some(Value::String(query)) if query.trim().is_empty() => {
            return Err(SearchError::blank_query())
        }
        Some(Value::String(query)) => query,
        _ => return Err(SearchError::invalid_request()),
    };
    let products = match raw.products {
        Some(Value::Array(products)) => products,
        _ => return Err(SearchError::invalid_request()),
    };

    Ok((query, products))
}

#[cfg(test)]
mod tests {
    use super::*;
    use aisearch_core::Product;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Mutex;

    /// Replays a fixed reply and records every prompt and temperature it sees
    struct StubProvider {
        reply: Result<String>,
        calls: Mutex<Vec<(String, f32)>>,
    }

    impl StubProvider {
        fn replying(reply: Result<String>) -> Arc<Self> {
            Arc::new(Self { reply, calls: Mutex::new(Vec::new()) })
        }

        fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl CompletionProvider for StubProvider {
        async fn complete(&self, prompt: &str, temperature: f32) -> Result<String> {
            self.calls.lock().unwrap().push((prompt.to_string(), temperature));
            self.reply.clone()
        }

        fn model(&self) -> &str {
            "stub"
        }
    }

    fn products() -> Vec<Product> {
        vec![
            Product::new(1, "Brown Leather Handbag", 55.0).with_category("bags"),
            Product::new(2, "Notebook Case", 25.0).with_category("bags"),
            Product::new(3, "Cotton T-Shirt", 12.0).with_category("men's clothing"),
        ]
    }

    #[tokio::test]
    async fn test_evaluate_returns_ids_in_model_order() {
        let provider = StubProvider::replying(Ok("[2, 1]".to_string()));
        let service = RelevanceService::new(provider.clone());

        let ids = service.evaluate("laptop bag", &products()).await.unwrap();
        assert_eq!(ids, vec![2, 1]);

        let calls = provider.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].1, 0.0);
        assert!(calls[0].0.contains("User query: \"laptop bag\""));
    }

    #[tokio::test]
    async fn test_malformed_output_is_generic_failure() {
        let provider = StubProvider::replying(Ok("not json".to_string()));
        let service = RelevanceService::new(provider);

        let err = service.evaluate("bag", &products()).await.unwrap_err();
        assert_eq!(err, SearchError::UpstreamFormat);
        assert_eq!(err.status_code(), 500);
    }

    #[tokio::test]
    async fn test_provider_error_surfaces_as_is() {
        let provider = StubProvider::replying(Err(SearchError::Provider(
            "Incorrect API key provided".to_string(),
        )));
        let service = RelevanceService::new(provider);

        let err = service.evaluate("bag", &products()).await.unwrap_err();
        assert_eq!(
            SearchResponse::from(&err),
            SearchResponse {
                success: false,
                ids: None,
                message: None,
                error: Some("Incorrect API key provided".to_string()),
            }
        );
    }

    #[tokio::test]
    async fn test_missing_products_never_reaches_provider() {
        let provider = StubProvider::replying(Ok("[1]".to_string()));
        let service = RelevanceService::new(provider.clone());

        let body = json!({ "query": "x" }).to_string();
        let err = service.evaluate_body(body.as_bytes()).await.unwrap_err();

        assert_eq!(err, SearchError::invalid_request());
        assert_eq!(err.status_code(), 400);
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn test_request_validation() {
        let provider = StubProvider::replying(Ok("[1]".to_string()));
        let service = RelevanceService::new(provider.clone());

        let bad_bodies = [
            json!({ "products": [] }).to_string(),
            json!({ "query": "", "products": [] }).to_string(),
            json!({ "query": 7, "products": [] }).to_string(),
            json!({ "query": "x", "products": { "id": 1 } }).to_string(),
            json!({ "query": "x", "products": "[]" }).to_string(),
            "not even json".to_string(),
        ];
        for body in bad_bodies {
            let err = service.evaluate_body(body.as_bytes()).await.unwrap_err();
            assert_eq!(err.status_code(), 400, "body {} should be rejected", body);
        }
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn test_evaluate_body_accepts_listing_products() {
        let provider = StubProvider::replying(Ok("[1]".to_string()));
        let service = RelevanceService::new(provider);

        let body = json!({
            "query": "handbag",
            "products": serde_json::to_value(products()).unwrap(),
        })
        .to_string();
        assert_eq!(service.evaluate_body(body.as_bytes()).await.unwrap(), vec![1]);
    }

    #[tokio::test]
    async fn test_blank_query_has_its_own_message() {
        let provider = StubProvider::replying(Ok("[1]".to_string()));
        let service = RelevanceService::new(provider.clone());

        let body = json!({ "query": "   ", "products": [] }).to_string();
        let err = service.evaluate_body(body.as_bytes()).await.unwrap_err();
        assert_eq!(err, SearchError::blank_query());
        assert_ne!(err, SearchError::invalid_request());

        let err = service.evaluate("\t", &products()).await.unwrap_err();
        assert_eq!(err, SearchError::blank_query());
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn test_partial_entries_reach_the_prompt_verbatim() {
        let provider = StubProvider::replying(Ok("[1]".to_string()));
        let service = RelevanceService::new(provider.clone());

        let body = r#"{"query":"leather bag","products":[{"id":1,"title":"Brown Leather Handbag","description":"Premium leather","category":"bags","price":1.50,"colour":"tan"},{"id":"two"}]}"#;
        assert_eq!(service.evaluate_body(body.as_bytes()).await.unwrap(), vec![1]);

        let calls = provider.calls.lock().unwrap();
        assert!(calls[0].0.contains(
            r#"[{"id":1,"title":"Brown Leather Handbag","description":"Premium leather","category":"bags","price":1.5,"colour":"tan"},{"id":"two"}]"#
        ));
    }

    #[test]
    fn test_response_envelope_round_trip() {
        assert_eq!(
            serde_json::to_value(SearchResponse::ok(vec![2, 1])).unwrap(),
            json!({ "success": true, "ids": [2, 1] })
        );

        let failure: SearchResponse =
            serde_json::from_value(json!({ "success": false, "message": "Invalid AI response format" }))
                .unwrap();
        assert_eq!(failure.into_result(), Err("Invalid AI response format".to_string()));
    }
}
