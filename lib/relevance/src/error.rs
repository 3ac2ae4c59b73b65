use thiserror::Error;

pub type Result<T> = std::result::Result<T, SearchError>;

pub const INVALID_REQUEST_MESSAGE: &str =
    "Request must include 'query' (string) and 'products' (array)";
pub const BLANK_QUERY_MESSAGE: &str = "'query' must contain at least one non-whitespace character";

/// Everything that can end an AI-search request early. Each variant is
/// terminal for the request; nothing is retried.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    /// Malformed request body, never forwarded to the provider
    #[error("{0}")]
    Validation(String),

    /// Request body over the accepted size
    #[error("Request body exceeds {0} bytes")]
    PayloadTooLarge(usize),

    /// The model answered with something other than a JSON array of ids.
    /// Carries no detail so provider output never reaches the caller.
    #[error("Invalid AI response format")]
    UpstreamFormat,

    /// Network, auth, quota or timeout failure talking to the provider
    #[error("{0}")]
    Provider(String),

    #[error("Missing provider credential: environment variable {0} is not set")]
    MissingCredential(String),
}

impl SearchError {
    pub fn invalid_request() -> Self {
        SearchError::Validation(INVALID_REQUEST_MESSAGE.to_string())
    }

    pub fn blank_query() -> Self {
        SearchError::Validation(BLANK_QUERY_MESSAGE.to_string())
    }

    pub fn status_code(&self) -> u16 {
        match self {
            SearchError::Validation(_) => 400,
            SearchError::PayloadTooLarge(_) => 413,
            SearchError::UpstreamFormat
            | SearchError::Provider(_)
            | SearchError::MissingCredential(_) => 500,
        }
    }
}
