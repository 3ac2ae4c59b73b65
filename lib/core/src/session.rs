//! Client-side search session
//!
//! Owns the catalog snapshot, the most recent relevance result and the
//! user's filter state, and derives the display set from the three.

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use tracing::{debug, error, info};

use crate::error::Result;
use crate::filter::FilterState;
use crate::product::{Catalog, Product, ProductId};
use crate::reconcile::{matched_count, reconcile};
use crate::request::{SearchPlan, SearchRequest, SearchRequestBuilder};

/// Anything that can turn a search request into a ranked id list
#[async_trait]
pub trait RelevanceBackend: Send + Sync {
    async fn search(&self, request: &SearchRequest) -> Result<Vec<ProductId>>;
}

/// Where the display set is drawn from before filtering
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DisplaySource {
    #[default]
    Catalog,
    /// Ranked ids from the last successful AI search
    Matches(Vec<ProductId>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// Blank query, display reset to the full catalog
    Reset,
    /// Results applied; `matched` ids resolved against the catalog
    Applied { matched: usize },
    /// Search failed and the display set was left as it was
    Failed { reason: String },
    /// A newer search started before this one finished
    Stale,
}

/// A remote search that has been started but not completed
#[derive(Debug, Clone)]
pub struct PendingSearch {
    pub ticket: u64,
    pub request: SearchRequest,
}

#[derive(Debug, Clone)]
pub struct SearchSession {
    catalog: Arc<Catalog>,
    source: DisplaySource,
    filter: FilterState,
    latest_ticket: u64,
}

impl SearchSession {
    pub fn new(catalog: Catalog) -> Self {
        Self {
            catalog: Arc::new(catalog),
            source: DisplaySource::Catalog,
            filter: FilterState::default(),
            latest_ticket: 0,
        }
    }

    #[inline]
    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    #[inline]
    pub fn source(&self) -> &DisplaySource {
        &self.source
    }

    #[inline]
    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    #[inline]
    pub fn filter_mut(&mut self) -> &mut FilterState {
        &mut self.filter
    }

    /// Swap in a freshly fetched catalog. Results from searches issued
    /// against the old catalog are discarded when they arrive.
    pub fn replace_catalog(&mut self, catalog: Catalog) {
        self.catalog = Arc::new(catalog);
        self.source = DisplaySource::Catalog;
        self.latest_ticket += 1;
    }

    pub fn show_all(&mut self) {
        self.source = DisplaySource::Catalog;
    }

    /// Start a search for `query`. Returns `None` when the query is blank,
    /// in which case the display has already been reset.
    pub fn begin_search(&mut self, query: &str) -> Option<PendingSearch> {
        self.latest_ticket += 1;
        match SearchRequestBuilder::new(self.catalog.clone()).query(query).build() {
            SearchPlan::ShowAll => {
                self.show_all();
                None
            }
            SearchPlan::Remote(request) => Some(PendingSearch {
                ticket: self.latest_ticket,
                request,
            }),
        }
    }

    pub fn complete_search(
        &mut self,
        ticket: u64,
        result: Result<Vec<ProductId>>,
    ) -> SearchOutcome {
        if ticket != self.latest_ticket {
            debug!(ticket, latest = self.latest_ticket, "Discarding superseded search response");
            return SearchOutcome::Stale;
        }

        match result {
            Ok(ids) => {
                let matched = matched_count(&self.catalog, &ids);
                info!(ticket, returned = ids.len(), matched, "AI search applied");
                self.source = DisplaySource::Matches(ids);
                SearchOutcome::Applied { matched }
            }
            Err(e) => {
                error!(ticket, error = %e, "AI search failed, keeping current results");
                SearchOutcome::Failed { reason: e.to_string() }
            }
        }
    }

    pub async fn search(&mut self, query: &str, backend: &dyn RelevanceBackend) -> SearchOutcome {
        let Some(pending) = self.begin_search(query) else {
            return SearchOutcome::Reset;
        };
        let result = backend.search(&pending.request).await;
        self.complete_search(pending.ticket, result)
    }

    /// The derived display set: source, then price/category filter, then sort.
    pub fn display(&self) -> Vec<&Product> {
        match &self.source {
            DisplaySource::Catalog => self.filter.apply(self.catalog.iter()),
            DisplaySource::Matches(ids) => self.filter.apply(reconcile(&self.catalog, ids)),
        }
    }
}

/// A session shared between concurrent searches; the newest search wins.
#[derive(Debug, Clone)]
pub struct SharedSession {
    inner: Arc<Mutex<SearchSession>>,
}

impl SharedSession {
    pub fn new(session: SearchSession) -> Self {
        Self {
            inner: Arc::new(Mutex::new(session)),
        }
    }

    pub fn with<R>(&self, f: impl FnOnce(&mut SearchSession) -> R) -> R {
        f(&mut self.inner.lock())
    }

    /// Owned snapshot of the current display set
    pub fn display(&self) -> Vec<Product> {
        self.inner.lock().display().into_iter().cloned().collect()
    }

    pub async fn search(&self, query: &str, backend: &dyn RelevanceBackend) -> SearchOutcome {
        let pending = self.inner.lock().begin_search(query);
        let Some(pending) = pending else {
            return SearchOutcome::Reset;
        };
        let result = backend.search(&pending.request).await;
        self.inner.lock().complete_search(pending.ticket, result)
    }
}
