//! marblfa-store - document store access
//!
//! The finding-aid corpus lives in an XML database that this workspace only
//! consumes. [`DocumentStore`] is the seam: it takes a validated
//! [`Query`](marblfa_core::Query) and returns the result document, already
//! ordered as the query asks.
//!
//! - [`ExistStore`]: eXist-db over its REST interface
//! - [`MemoryStore`]: a corpus held in memory, for tests and offline runs
//!
//! # Example
//!
//! ```
//! use marblfa_core::QueryBuilder;
//! use marblfa_store::{DocumentStore, MemoryStore};
//!
//! let store = MemoryStore::from_xml([
//!     r#"<ead id="r1"><archdesc><did><unittitle>Abbey papers</unittitle></did></archdesc></ead>"#,
//! ])?;
//! let query = QueryBuilder::new("/db/findingaids").build(Some("A"), None)?;
//! let doc = store.execute(&query)?;
//! assert!(doc.as_str().contains(r#"<record id="r1">"#));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod error;
mod exist;
mod memory;

pub use error::{Result, StoreError};
pub use exist::ExistStore;
pub use memory::MemoryStore;

use marblfa_core::{Document, Query};

/// A service that executes structured queries
///
/// Implementations must be `Send + Sync`; one store instance serves every
/// request of the process.
pub trait DocumentStore: Send + Sync {
    /// Short name for logs
    fn name(&self) -> &'static str;

    /// Run a query and return its result document
    fn execute(&self, query: &Query) -> Result<Document>;
}

impl<T: DocumentStore + ?Sized> DocumentStore for Box<T> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn execute(&self, query: &Query) -> Result<Document> {
        (**self).execute(query)
    }
}
