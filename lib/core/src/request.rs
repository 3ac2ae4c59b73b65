use std::sync::Arc;

use serde::ser::{Serialize, SerializeStruct, Serializer};

use crate::product::Catalog;

/// Outbound AI-search payload: `{"query": ..., "products": [...]}`
///
/// The whole catalog travels with every request.
#[derive(Debug, Clone)]
pub struct SearchRequest {
    pub query: String,
    pub catalog: Arc<Catalog>,
}

impl Serialize for SearchRequest {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("SearchRequest", 2)?;
        state.serialize_field("query", &self.query)?;
        state.serialize_field("products", self.catalog.as_ref())?;
        state.end()
    }
}

/// What the client should do for a given query
#[derive(Debug, Clone)]
pub enum SearchPlan {
    /// Blank query: skip the network and show the full catalog
    ShowAll,
    /// Send the request to the relevance service
    Remote(SearchRequest),
}

impl SearchPlan {
    #[inline]
    pub fn is_remote(&self) -> bool {
        matches!(self, SearchPlan::Remote(_))
    }
}

/// Holds a catalog snapshot and a raw query, and turns them into a [`SearchPlan`]
#[derive(Debug, Clone)]
pub struct SearchRequestBuilder {
    catalog: Arc<Catalog>,
    query: String,
}

impl SearchRequestBuilder {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self {
            catalog,
            query: String::new(),
        }
    }

    #[must_use]
    pub fn query(mut self, query: impl Into<String>) -> Self {
        self.query = query.into();
        self
    }

    pub fn build(self) -> SearchPlan {
        let query = self.query.trim();
        if query.is_empty() {
            return SearchPlan::ShowAll;
        }
        SearchPlan::Remote(SearchRequest {
            query: query.to_string(),
            catalog: self.catalog,
        })
    }
}
