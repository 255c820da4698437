//! marblfa-pdf - working-area artifacts and PDF renderers
//!
//! PDF generation hands an XSL-FO document to an external formatter by
//! path. This crate owns both halves of that handoff:
//!
//! 1. **[`ArtifactStore`]** writes the document into the working area under
//!    a unique name and returns a [`PersistedArtifact`] guard that removes
//!    the file exactly once.
//! 2. **[`Renderer`]** reads the file and returns PDF bytes:
//!    [`CommandRenderer`] runs a local program such as Apache FOP,
//!    [`HttpRenderer`] asks a FOP servlet, and [`RetryingRenderer`] retries
//!    either once.
//!
//! # Example
//!
//! ```no_run
//! use marblfa_core::Document;
//! use marblfa_pdf::{ArtifactStore, CommandRenderer, Renderer};
//!
//! let store = ArtifactStore::new("/tmp/marblfa");
//! let renderer = CommandRenderer::new(
//!     "fop",
//!     vec!["-fo".into(), "{input}".into(), "-pdf".into(), "{output}".into()],
//! );
//!
//! let artifact = store.persist(&Document::new("<fo:root/>"), "abbey244")?;
//! let pdf = renderer.render(artifact.path());
//! artifact.cleanup()?;
//! let pdf = pdf?;
//! # Ok::<(), marblfa_pdf::PdfError>(())
//! ```

mod artifact;
mod command;
mod error;
mod http;
mod renderer;

pub use artifact::{ArtifactStore, PersistedArtifact, FO_EXTENSION};
pub use command::{CommandRenderer, INPUT_PLACEHOLDER, OUTPUT_PLACEHOLDER};
pub use error::{PdfError, PersistError, RenderError, Result};
pub use http::HttpRenderer;
pub use renderer::{from_settings, Renderer, RetryingRenderer, PDF_CONTENT_TYPE};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
