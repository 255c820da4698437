//! Error types for transform chains

use marblfa_core::CoreError;
use thiserror::Error;

/// Errors raised while binding or applying a transform chain
#[derive(Error, Debug)]
pub enum TransformError {
    /// A stage names a template the registry does not have
    #[error("Template not found: {0}")]
    StageNotFound(String),

    /// A chain needs at least one stage
    #[error("Transform chain has no stages")]
    EmptyChain,

    /// A stage passes a parameter its template does not declare
    #[error("Template '{template}' does not accept parameter '{parameter}'")]
    UnknownParameter { template: String, parameter: String },

    /// A parameter value is outside what the template supports
    #[error("Template '{template}' parameter '{parameter}' = {value:?}: expected {expected}")]
    InvalidParameter {
        template: String,
        parameter: String,
        value: String,
        expected: String,
    },

    /// The stage input is not a well-formed document
    #[error("Stage {stage} ({template}) input is malformed: {source}")]
    MalformedInput {
        stage: usize,
        template: String,
        #[source]
        source: CoreError,
    },

    /// The template could not handle the input document
    #[error("Template '{template}' failed: {reason}")]
    Failed { template: String, reason: String },
}

/// Result type for transform operations
pub type Result<T> = std::result::Result<T, TransformError>;
