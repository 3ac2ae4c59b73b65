//! # aisearch API
//!
//! HTTP surface for the AI product search.
//!
//! - [`RestApi`] serves `POST /api/v1/ai-search` on top of a
//!   [`RelevanceService`](aisearch_relevance::RelevanceService)
//! - [`HttpRelevanceClient`] calls that endpoint from the client side
//! - [`CatalogSource`] loads the product listing the session searches over

pub mod rest;
pub mod client;
pub mod catalog;

pub use rest::{configure, RestApi, MAX_BODY_BYTES};
pub use client::{HttpRelevanceClient, SEARCH_PATH};
pub use catalog::{CatalogSource, DEFAULT_CATALOG_URL};
