//! # marblfa-transform
//!
//! Ordered template chains over finding-aid documents.
//!
//! A chain is an explicit list of [`TransformStage`]s, each naming a
//! registered [`Template`] and carrying its own parameters. Stages are bound
//! and applied in one call; stage *i*'s output is the only input of stage
//! *i + 1*.
//!
//! ## Built-in templates
//!
//! - `results`: browse/search listing to an HTML fragment
//! - `finding-aid`: EAD to an intermediate print layout
//! - `xsl-fo`: print layout to XSL-FO for the PDF formatter
//!
//! ## Example
//!
//! ```
//! use marblfa_core::Document;
//! use marblfa_transform::{TemplateRegistry, TransformStage};
//!
//! let ead = Document::new(
//!     r#"<ead id="r1"><archdesc><did><unittitle>Adams papers</unittitle></did></archdesc></ead>"#,
//! );
//! let stages = [
//!     TransformStage::new("finding-aid").param("mode", "summary"),
//!     TransformStage::new("xsl-fo").param("page_size", "a4"),
//! ];
//! let fo = TemplateRegistry::with_builtins().apply(&ead, &stages)?;
//! assert!(fo.as_str().starts_with("<fo:root"));
//! # Ok::<(), marblfa_transform::TransformError>(())
//! ```

pub mod chain;
pub mod error;
pub mod stage;
pub mod template;
pub mod templates;

pub use chain::{TemplateRegistry, TransformChain};
pub use error::{Result, TransformError};
pub use stage::TransformStage;
pub use template::{Params, Template};
pub use templates::{FindingAidLayout, ResultsListing, XslFo};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
