//! # aisearch
//!
//! Free-text product search where a large language model, not keyword
//! matching, decides which catalog entries are relevant.
//!
//! ## Quick Start
//!
//! ### As a Server
//!
//! ```bash
//! export OPENAI_API_KEY=sk-...
//! aisearch serve --port 4001
//! ```
//!
//! ### As a Client
//!
//! ```bash
//! aisearch search "warm jacket" --max-price 80 --sort rating-desc
//! ```
//!
//! ### As a Library
//!
//! ```rust
//! use aisearch::prelude::*;
//!
//! let catalog = Catalog::new(vec![
//!     Product::new(1, "Brown Leather Handbag", 55.0),
//!     Product::new(2, "Notebook Case", 25.0),
//!     Product::new(3, "Cotton T-Shirt", 12.0),
//! ]);
//!
//! // Ids come back from the relevance service in ranked order; unknown ids are dropped
//! let shown: Vec<u64> = reconcile(&catalog, &[2, 99, 1]).iter().map(|p| p.id).collect();
//! assert_eq!(shown, vec![2, 1]);
//! ```
//!
//! ## Crate Structure
//!
//! - `aisearch-core` - catalog model, reconciliation, filters, client search session
//! - `aisearch-relevance` - prompt construction, completion provider, output validation
//! - `aisearch-api` - the `POST /api/v1/ai-search` endpoint and its HTTP clients

// Re-export core types
pub use aisearch_core::{
    Catalog, Product, ProductId, Rating,
    FilterState, PriceRange, SortOption,
    SearchPlan, SearchRequest, SearchRequestBuilder,
    SearchSession, SharedSession, SearchOutcome, DisplaySource, RelevanceBackend,
    reconcile, Error, Result,
};

// Re-export relevance
pub use aisearch_relevance::{
    CompletionProvider, OpenAiProvider, ProviderConfig,
    RelevanceService, SearchError, SearchResponse,
};

// Re-export API
pub use aisearch_api::{CatalogSource, HttpRelevanceClient, RestApi};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        Catalog, Product, ProductId,
        FilterState, SortOption,
        SearchSession, SearchOutcome, RelevanceBackend,
        reconcile,
        RelevanceService, CompletionProvider, SearchError,
        CatalogSource, HttpRelevanceClient, RestApi,
    };
}
