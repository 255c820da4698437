//! Pipeline error taxonomy and response status mapping

use marblfa_core::{CoreError, ValidationError};
use marblfa_pdf::PdfError;
use marblfa_store::StoreError;
use marblfa_transform::TransformError;
use thiserror::Error;

use crate::stage::PdfStage;

/// Result type for pipeline operations
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Everything a browse, search or PDF request can fail with
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Request parameters were rejected before reaching the store
    #[error("Invalid request: {0}")]
    Validation(#[from] ValidationError),

    /// The lookup matched no finding aid
    #[error("Finding aid not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Transform(#[from] TransformError),

    #[error(transparent)]
    Pdf(#[from] PdfError),

    /// Site data (letter index) could not be loaded
    #[error("Site data error: {0}")]
    SiteData(#[from] CoreError),

    /// Writing the response body failed
    #[error("Cannot write response: {0}")]
    Stream(#[source] std::io::Error),
}

impl PipelineError {
    /// HTTP status for this error
    ///
    /// Client errors are 400/404; an unreachable store is 503; everything
    /// else is a server fault.
    pub fn status(&self) -> u16 {
        match self {
            PipelineError::Validation(_) => 400,
            PipelineError::NotFound(_) => 404,
            PipelineError::Store(_) => 503,
            PipelineError::Transform(_)
            | PipelineError::Pdf(_)
            | PipelineError::SiteData(_)
            | PipelineError::Stream(_) => 500,
        }
    }

    /// True for errors caused by the request rather than the system
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status())
    }
}

/// A PDF request that stopped before completing
#[derive(Error, Debug)]
#[error("PDF generation failed at {stage}: {error}")]
pub struct PdfFailure {
    /// The stage that could not be reached
    pub stage: PdfStage,
    /// Whether a persisted artifact was removed before the failure surfaced
    pub cleaned_up: bool,
    #[source]
    pub error: PipelineError,
}

impl PdfFailure {
    pub fn new(stage: PdfStage, error: impl Into<PipelineError>) -> Self {
        Self {
            stage,
            cleaned_up: false,
            error: error.into(),
        }
    }

    pub fn status(&self) -> u16 {
        self.error.status()
    }
}
