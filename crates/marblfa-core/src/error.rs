//! Error types for records, queries and settings

use thiserror::Error;

/// Rejected request input, raised before anything touches the store
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Letter filter is not a single ASCII letter or digit (or `all`)
    #[error("Invalid letter filter: {0:?}")]
    InvalidLetter(String),

    /// Search term contains control characters or is too long
    #[error("Invalid search term: {0:?}")]
    InvalidTerm(String),

    /// Too many search terms in one request
    #[error("Too many search terms: {count} (maximum {max})")]
    TooManyTerms { count: usize, max: usize },

    /// Search requested without any terms
    #[error("No search terms given")]
    EmptySearch,

    /// Record identifier is empty, too long or contains control characters
    #[error("Invalid record identifier: {0:?}")]
    InvalidIdentifier(String),
}

/// Errors that can occur while reading records, documents and settings
#[derive(Error, Debug)]
pub enum CoreError {
    /// Request input failed validation
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// XML could not be parsed
    #[error("XML error: {0}")]
    Xml(String),

    /// A required element or attribute is missing
    #[error("Missing {0}")]
    Missing(String),

    /// Settings file could not be parsed
    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for core operations
pub type Result<T> = std::result::Result<T, CoreError>;
