//! Error types for document store access

use marblfa_core::CoreError;
use thiserror::Error;

/// Errors a document store can report
#[derive(Error, Debug)]
pub enum StoreError {
    /// The store could not be reached or failed internally
    #[error("Document store unavailable: {0}")]
    Unavailable(String),

    /// The store rejected the query or returned something unparsable
    #[error("Query syntax error: {0}")]
    QuerySyntax(String),

    /// A corpus file could not be read or parsed
    #[error("Corpus error in {path}: {source}")]
    Corpus {
        path: String,
        #[source]
        source: CoreError,
    },
}

impl From<reqwest::Error> for StoreError {
    fn from(err: reqwest::Error) -> Self {
        StoreError::Unavailable(err.to_string())
    }
}

/// Result type for store operations
pub type Result<T> = std::result::Result<T, StoreError>;
