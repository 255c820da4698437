//! Error types for artifacts and rendering

use std::path::PathBuf;

use thiserror::Error;

/// Result type for PDF operations
pub type Result<T> = std::result::Result<T, PdfError>;

/// Errors from persisting or rendering a document
#[derive(Error, Debug)]
pub enum PdfError {
    #[error(transparent)]
    Persist(#[from] PersistError),

    #[error(transparent)]
    Render(#[from] RenderError),
}

/// The working area could not hold an artifact
#[derive(Error, Debug)]
pub enum PersistError {
    /// The working area directory could not be created
    #[error("Cannot create working area {}: {source}", path.display())]
    WorkingArea {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Writing, syncing or renaming the artifact failed
    #[error("Cannot write artifact {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Removing the artifact failed
    #[error("Cannot remove artifact {}: {source}", path.display())]
    Remove {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// The renderer did not produce a PDF
#[derive(Error, Debug)]
pub enum RenderError {
    /// The renderer program could not be started
    #[error("Cannot start renderer '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The renderer exited unsuccessfully
    #[error("Renderer '{renderer}' failed ({status}): {stderr}")]
    Failed {
        renderer: String,
        status: String,
        stderr: String,
    },

    /// The renderer succeeded but produced nothing
    #[error("Renderer '{0}' produced no output")]
    EmptyOutput(String),

    /// The renderer ran past its deadline and was killed
    #[error("Renderer '{renderer}' timed out after {secs}s")]
    Timeout { renderer: String, secs: u64 },

    /// HTTP renderer transport error
    #[error("Renderer request failed: {0}")]
    Http(String),

    #[error("Renderer I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<reqwest::Error> for RenderError {
    fn from(err: reqwest::Error) -> Self {
        RenderError::Http(err.to_string())
    }
}
