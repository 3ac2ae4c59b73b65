//! Result reconciliation
//!
//! Maps an identifier list produced by the relevance service back onto the
//! locally held catalog. The list is untrusted: unknown ids are dropped and
//! repeated ids only contribute their first occurrence.

use ahash::AHashSet;

use crate::product::{Catalog, Product, ProductId};

/// Resolve `ids` against `catalog`, keeping the order of `ids`.
pub fn reconcile<'a>(catalog: &'a Catalog, ids: &[ProductId]) -> Vec<&'a Product> {
    let mut seen = AHashSet::with_capacity(ids.len());
    ids.iter()
        .filter(|id| seen.insert(**id))
        .filter_map(|&id| catalog.get(id))
        .collect()
}

/// Number of ids in `ids` that resolve to a catalog entry
pub fn matched_count(catalog: &Catalog, ids: &[ProductId]) -> usize {
    let mut seen = AHashSet::with_capacity(ids.len());
    ids.iter()
        .filter(|id| seen.insert(**id) && catalog.contains(**id))
        .count()
}
