//! marblfa-core - finding-aid records and queries
//!
//! Shared vocabulary for the marblfa workspace:
//!
//! - [`Record`]: one archival collection summary, parsed from EAD
//! - [`QueryBuilder`]/[`Query`]: validated, escaped store queries
//! - [`LetterIndex`]: the static browse letter list
//! - [`Paginator`]: browse paging rules
//! - [`sanitize_filename`]: safe names for artifacts and downloads
//! - [`Document`]/[`Element`]: XML text and the tree every stage reads
//! - [`Settings`]: site configuration
//!
//! # Example
//!
//! ```
//! use marblfa_core::{Element, QueryBuilder, Record};
//!
//! let ead = Element::parse(
//!     r#"<ead id="abbey244"><archdesc><did>
//!          <origination><corpname>Abbey Theatre.</corpname></origination>
//!          <unittitle>Abbey Theatre collection</unittitle>
//!        </did></archdesc></ead>"#,
//! )?;
//! let record = Record::from_ead(&ead)?;
//! assert_eq!(record.first_letter(), Some('A'));
//!
//! let query = QueryBuilder::new("/db/findingaids").lookup(&record.id)?;
//! assert!(query.to_xquery().contains("abbey244"));
//! # Ok::<(), marblfa_core::CoreError>(())
//! ```

pub mod config;
pub mod document;
pub mod error;
pub mod letters;
pub mod paginate;
pub mod query;
pub mod record;
pub mod sanitize;
pub mod terms;
pub mod xml;

pub use config::{
    BrowseSettings, PdfSettings, RendererKind, RendererSettings, Settings, StoreSettings,
    WorkingAreaSettings,
};
pub use document::Document;
pub use error::{CoreError, Result, ValidationError};
pub use letters::LetterIndex;
pub use paginate::{Page, Paginator};
pub use query::{Letter, LetterFilter, Query, QueryBuilder, Selection, SortSpec, ALL};
pub use record::{Origination, OriginationKind, Record};
pub use sanitize::{download_name, sanitize_filename};
pub use terms::{normalize, split_terms};
pub use xml::{Element, Node};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
