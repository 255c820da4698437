//! marblfa-pipeline - finding-aid requests end to end
//!
//! [`FindingAidService`] ties the workspace together: validated queries go
//! to a [`DocumentStore`](marblfa_store::DocumentStore), results go through
//! template chains, and PDF requests hand an artifact in the working area to
//! a [`Renderer`](marblfa_pdf::Renderer) before [`ResultStreamer`] writes the
//! bytes out.
//!
//! # Example
//!
//! ```
//! use marblfa_core::{LetterIndex, Settings};
//! use marblfa_pdf::CommandRenderer;
//! use marblfa_pipeline::FindingAidService;
//! use marblfa_store::MemoryStore;
//!
//! let store = MemoryStore::from_xml([
//!     r#"<ead id="r1"><archdesc><did><origination><persname>Adams, J.</persname></origination></did></archdesc></ead>"#,
//! ])?;
//! let service = FindingAidService::new(
//!     &Settings::default(),
//!     Box::new(store),
//!     Box::new(CommandRenderer::new("fop", vec![])),
//!     LetterIndex::new(["A", "B"]),
//! );
//!
//! let page = service.browse(Some("A"), None)?;
//! assert!(page.html.as_str().contains("Adams, J."));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod error;
mod service;
mod stage;
mod stream;

pub use error::{PdfFailure, PipelineError, Result};
pub use service::{FindingAidService, HtmlPage, PdfReport, SEARCH_LINK};
pub use stage::PdfStage;
pub use stream::{
    content_disposition, ResponseHead, ResultStreamer, CONTENT_DISPOSITION, CONTENT_LENGTH,
    CONTENT_TYPE, HTML_CONTENT_TYPE,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
