//! Error types for the jeju-barrier library.

use thiserror::Error;

/// Main error type for jeju-barrier operations
#[derive(Debug, Error)]
pub enum Error {
    /// The spreadsheet backing the record set could not be read
    #[error("sheet data unavailable: {0}")]
    SheetUnavailable(String),

    /// HTTP-specific error from an upstream service
    #[error("HTTP error: {0}")]
    Http(String),

    /// Network connectivity issues (connect failure, timeout)
    #[error("network error: {0}")]
    Network(String),

    /// Invalid configuration or query parameters
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_connect() || err.is_timeout() {
            Error::Network(err.to_string())
        } else {
            Error::Http(err.to_string())
        }
    }
}

/// Convenience result type for jeju-barrier operations
pub type Result<T> = std::result::Result<T, Error>;
