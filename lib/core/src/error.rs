use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Invalid sort option: {0}")]
    InvalidSortOption(String),

    #[error("Invalid price: {0}")]
    InvalidPrice(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Search rejected: {0}")]
    Rejected(String),

    #[error("Decode error: {0}")]
    Decode(String),
}
