//! # aisearch Core
//!
//! Client-side half of the AI product search pipeline.
//!
//! - [`Catalog`] / [`Product`] - the session's product list, kept in provider order
//! - [`SearchRequestBuilder`] - turns a query and catalog into a [`SearchPlan`]
//! - [`reconcile`] - maps a ranked id list back onto the catalog
//! - [`FilterState`] - price range, category and sort applied after relevance
//! - [`SearchSession`] - ties the above together and derives the display set
//!
//! ## Example
//!
//! ```rust
//! use aisearch_core::{Catalog, Product, SearchSession, SortOption};
//!
//! let catalog = Catalog::new(vec![
//!     Product::new(1, "Leather Handbag", 55.0).with_rating(4.2, 10),
//!     Product::new(2, "Notebook Case", 25.0).with_rating(4.8, 31),
//!     Product::new(3, "Cotton T-Shirt", 12.0).with_rating(3.1, 7),
//! ]);
//! let mut session = SearchSession::new(catalog);
//!
//! // Pretend the relevance service ranked 2 above 1 for "laptop bag"
//! let pending = session.begin_search("laptop bag").unwrap();
//! session.complete_search(pending.ticket, Ok(vec![2, 1]));
//!
//! session.filter_mut().set_sort(SortOption::PriceAsc);
//! let shown: Vec<u64> = session.display().iter().map(|p| p.id).collect();
//! assert_eq!(shown, vec![2, 1]);
//! ```

pub mod error;
pub mod product;
pub mod filter;
pub mod reconcile;
pub mod request;
pub mod session;

pub use error::{Error, Result};
pub use product::{Catalog, Product, ProductId, Rating};
pub use filter::{Filter, FilterState, PriceRange, SortOption};
pub use reconcile::{matched_count, reconcile};
pub use request::{SearchPlan, SearchRequest, SearchRequestBuilder};
pub use session::{DisplaySource, PendingSearch, RelevanceBackend, SearchOutcome, SearchSession, SharedSession};
