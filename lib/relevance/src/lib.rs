//! # aisearch Relevance
//!
//! Server-side relevance ranking backed by a large language model.
//!
//! A query and a catalog go in; an ordered list of product ids comes out.
//! The model's answer is treated as untrusted text: it must parse as a bare
//! JSON array of ids or the request fails with a generic message.
//!
//! ```text
//! ┌──────────────┐    ┌──────────────┐    ┌──────────────┐    ┌──────────────┐
//! │ request body │───>│    prompt    │───>│   provider   │───>│  parse_ids   │
//! │ (validated)  │    │ (fixed text) │    │ (temp = 0.0) │    │ (strict JSON)│
//! └──────────────┘    └──────────────┘    └──────────────┘    └──────────────┘
//! ```

pub mod error;
pub mod prompt;
pub mod parse;
pub mod provider;
pub mod service;

pub use error::{Result, SearchError, BLANK_QUERY_MESSAGE, INVALID_REQUEST_MESSAGE};
pub use prompt::build_prompt;
pub use parse::parse_ids;
pub use provider::{
    CompletionProvider, OpenAiProvider, ProviderConfig,
    DEFAULT_API_KEY_ENV, DEFAULT_BASE_URL, DEFAULT_MODEL, DEFAULT_TIMEOUT_SECS,
};
pub use service::{RelevanceService, SearchResponse, TEMPERATURE};
