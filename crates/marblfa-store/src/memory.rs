//! In-process document store
//!
//! Holds a corpus of EAD documents and evaluates typed [`Query`] values with
//! the same selection and ordering the XQuery form asks of a real store.

use std::fs;
use std::path::Path;

use marblfa_core::{
    CoreError, Document, Element, LetterFilter, Query, Record, Selection, SortSpec,
};
use tracing::{debug, warn};

use crate::error::{Result, StoreError};
use crate::DocumentStore;

/// Corpus of EAD documents held in memory
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    documents: Vec<Element>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from parsed `<ead>` roots
    pub fn from_documents(documents: Vec<Element>) -> Self {
        Self { documents }
    }

    /// Build from EAD XML strings
    pub fn from_xml<I, S>(documents: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut store = Self::new();
        for (index, xml) in documents.into_iter().enumerate() {
            let root = Element::parse(xml.as_ref()).map_err(|source| StoreError::Corpus {
                path: format!("document #{}", index),
                source,
            })?;
            store.insert(root);
        }
        Ok(store)
    }

    /// Load every `*.xml` file in a directory, in file name order
    pub fn load_dir(dir: impl AsRef<Path>) -> Result<Self> {
        let pattern = dir.as_ref().join("*.xml");
        let pattern = pattern.to_string_lossy();
        let paths = glob::glob(&pattern).map_err(|e| StoreError::Unavailable(e.to_string()))?;

        let mut files: Vec<_> = paths.filter_map(|entry| entry.ok()).collect();
        files.sort();

        let mut store = Self::new();
        for path in files {
            let corpus_error = |source: CoreError| StoreError::Corpus {
                path: path.display().to_string(),
                source,
            };
            let xml = fs::read_to_string(&path).map_err(|e| corpus_error(e.into()))?;
            let root = Element::parse(&xml).map_err(corpus_error)?;
            store.insert(root);
        }
        debug!(documents = store.len(), dir = %dir.as_ref().display(), "loaded corpus");
        Ok(store)
    }

    /// Add a document
    pub fn insert(&mut self, ead: Element) {
        self.documents.push(ead);
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    fn lookup(&self, id: &str) -> Element {
        let mut results = Element::new("results");
        let found = self.documents.iter().find(|ead| {
            ead.attr("id") == Some(id)
                || (ead.attr("id").is_none()
                    && ead.find_text("eadheader/eadid").as_deref() == Some(id))
        });
        if let Some(ead) = found {
            results.push(ead.clone());
        }
        results
    }

    fn browse(&self, letter: &LetterFilter, terms: &[String], sort: SortSpec) -> Element {
        let needles: Vec<String> = terms.iter().map(|t| t.to_lowercase()).collect();

        let mut matches: Vec<Record> = Vec::new();
        for ead in &self.documents {
            let record = match Record::from_ead(ead) {
                Ok(record) => record,
                Err(e) => {
                    warn!("skipping corpus document: {}", e);
                    continue;
                }
            };
            if let LetterFilter::Letter(letter) = letter {
                if !record.starts_with_letter(*letter) {
                    continue;
                }
            }
            if !needles.is_empty() {
                let haystack = ead.text().to_lowercase();
                if !needles.iter().all(|needle| haystack.contains(needle.as_str())) {
                    continue;
                }
            }
            matches.push(record);
        }

        if sort == SortSpec::SortKey {
            matches.sort_by_cached_key(Record::sort_key);
        }

        let mut records = Element::new("records");
        for record in &matches {
            records.push(record.to_result_element());
        }
        records
    }
}

impl DocumentStore for MemoryStore {
    fn name(&self) -> &'static str {
        "memory"
    }

    fn execute(&self, query: &Query) -> Result<Document> {
        let root = match query.selection() {
            Selection::Lookup { id } => self.lookup(id),
            Selection::Browse { letter, terms } => self.browse(letter, terms, query.sort()),
        };
        Ok(Document::from_element(&root))
    }
}
