// Validation of raw model output
use aisearch_core::ProductId;
use tracing::{debug, warn};

use crate::error::{Result, SearchError};

/// Parse completion text into an id list.
///
/// Accepts exactly one JSON array of non-negative integers, optionally
/// surrounded by whitespace. Anything else is `UpstreamFormat`; parser
/// detail is logged, never returned. Ids are not checked against the
/// catalog here.
pub fn parse_ids(raw: &str) -> Result<Vec<ProductId>> {
    match serde_json::from_str::<Vec<ProductId>>(raw.trim()) {
        Ok(ids) => Ok(ids),
        Err(e) => {
            warn!(error = %e, len = raw.len(), "Model output is not a JSON id array");
            debug!(output = raw, "Rejected model output");
            Err(SearchError::UpstreamFormat)
        }
    }
}
