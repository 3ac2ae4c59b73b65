//! Prompt construction
//!
//! The prompt is a fixed instruction block, one worked example, then the
//! live query and the full catalog fenced as JSON. Identical inputs always
//! produce an identical prompt.

use serde::Serialize;

use crate::error::{Result, SearchError};

const INSTRUCTIONS: &str = "\
You are an intelligent search assistant for an e-commerce store.

Your task:
Given a user query and a product catalog, select the products that best match the intent of the query.
Only consider the product's title, description, category, and price when deciding relevance.

Instructions:
1. Only return a JSON array of product IDs, nothing else. No text before or after the array.
2. If no products match, return an empty array: []
3. Rank matches by relevance to the query, not just by keyword matching.
4. Include products even if synonyms or related concepts match (e.g., \"laptop bag\" can match \"notebook case\").
5. Be strict. Do not include unrelated products, even under a loose interpretation of the query.
";

const EXAMPLE: &str = "\
Example:
User query: \"leather bag\"
Catalog: [{\"id\":1,\"title\":\"Brown Leather Handbag\",\"description\":\"Premium leather\",\"category\":\"bags\"}, {\"id\":2,\"title\":\"Cotton T-Shirt\",\"description\":\"Casual wear\",\"category\":\"men's clothing\"}]
Expected output: [1]
";

/// Build the completion prompt for `query` over `products`. Entries are
/// embedded exactly as they serialize, so raw JSON values pass through with
/// their fields and key order intact.
pub fn build_prompt<T: Serialize>(query: &str, products: &[T]) -> Result<String> {
    // Quoting through serde keeps stray quotes in the query from ending the string early
    let query = serde_json::to_string(query)
        .map_err(|e| SearchError::Validation(format!("Query could not be encoded: {}", e)))?;
    let catalog = serde_json::to_string(products)
        .map_err(|e| SearchError::Validation(format!("Products could not be encoded: {}", e)))?;

    Ok(format!(
        "{INSTRUCTIONS}\n{EXAMPLE}\nUser query: {query}\nCatalog (JSON array) between triple backticks:\n```\n{catalog}\n```\nReturn the JSON array now:\n"
    ))
}
