//! Working-area artifacts
//!
//! An artifact is a document written to the shared working area so an
//! external renderer can read it by path. Names are unique per call
//! (sanitized hint + UUID) and files only appear under their final name once
//! fully written: the body goes to a temporary file in the same directory,
//! is synced, then renamed without clobbering.
//!
//! [`PersistedArtifact`] is a guard. [`PersistedArtifact::cleanup`] removes
//! the file explicitly; dropping the guard without it removes the file too.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, OnceLock};

use marblfa_core::{sanitize_filename, Document};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::{PersistError, Result};

/// Extension for XSL-FO artifacts
pub const FO_EXTENSION: &str = "fo";

/// Writes documents into the working area
#[derive(Debug)]
pub struct ArtifactStore {
    root: PathBuf,
    extension: String,
    ready: OnceLock<()>,
    live: Arc<AtomicUsize>,
}

impl ArtifactStore {
    /// Store for XSL-FO artifacts under `root`
    ///
    /// Nothing touches the disk until the first [`persist`](Self::persist).
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            extension: FO_EXTENSION.to_string(),
            ready: OnceLock::new(),
            live: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Builder: use another file extension
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into().trim_start_matches('.').to_string();
        self
    }

    pub fn working_area(&self) -> &Path {
        &self.root
    }

    /// Artifacts persisted and not yet cleaned up
    pub fn live_count(&self) -> usize {
        self.live.load(Ordering::SeqCst)
    }

    fn ensure_working_area(&self) -> Result<&Path> {
        if self.ready.get().is_none() {
            fs::create_dir_all(&self.root).map_err(|source| PersistError::WorkingArea {
                path: self.root.clone(),
                source,
            })?;
            if self.ready.set(()).is_ok() {
                debug!(path = %self.root.display(), "working area ready");
            }
        }
        Ok(&self.root)
    }

    /// Write `document` under a unique name derived from `name_hint`
    pub fn persist(&self, document: &Document, name_hint: &str) -> Result<PersistedArtifact> {
        let dir = self.ensure_working_area()?;
        let name = format!(
            "{}-{}.{}",
            sanitize_filename(name_hint),
            Uuid::new_v4(),
            self.extension
        );
        let path = dir.join(&name);
        let write_error = |source| PersistError::Write {
            path: path.clone(),
            source,
        };

        let mut partial = tempfile::Builder::new()
            .prefix(".partial-")
            .tempfile_in(dir)
            .map_err(write_error)?;
        partial.write_all(document.as_bytes()).map_err(write_error)?;
        partial.as_file().sync_all().map_err(write_error)?;
        partial
            .persist_noclobber(&path)
            .map_err(|e| write_error(e.error))?;

        self.live.fetch_add(1, Ordering::SeqCst);
        debug!(path = %path.display(), bytes = document.len(), "persisted artifact");
        Ok(PersistedArtifact {
            path,
            name,
            len: document.len(),
            live: Arc::clone(&self.live),
            released: false,
        })
    }
}

/// A file in the working area, removed exactly once
#[derive(Debug)]
#[must_use = "dropping the artifact removes its file"]
pub struct PersistedArtifact {
    path: PathBuf,
    name: String,
    len: usize,
    live: Arc<AtomicUsize>,
    released: bool,
}

impl PersistedArtifact {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Final file name within the working area
    pub fn file_name(&self) -> &str {
        &self.name
    }

    /// Size in bytes as written
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Remove the file
    ///
    /// A file that is already gone is logged and not an error.
    pub fn cleanup(mut self) -> Result<()> {
        self.release()
    }

    fn release(&mut self) -> Result<()> {
        if self.released {
            return Ok(());
        }
        self.released = true;
        self.live.fetch_sub(1, Ordering::SeqCst);

        match fs::remove_file(&self.path) {
            Ok(()) => {
                debug!(path = %self.path.display(), "removed artifact");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                warn!(path = %self.path.display(), "artifact already removed");
                Ok(())
            }
            Err(source) => Err(PersistError::Remove {
                path: self.path.clone(),
                source,
            }
            .into()),
        }
    }
}

impl Drop for PersistedArtifact {
    fn drop(&mut self) {
        if let Err(e) = self.release() {
            warn!("{}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_working_area_created_on_first_use() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("nested").join("work");
        let store = ArtifactStore::new(&root);
        assert!(!root.exists());

        let artifact = store.persist(&Document::new("<fo:root/>"), "r1").unwrap();
        assert!(root.is_dir());
        assert_eq!(artifact.path().parent(), Some(root.as_path()));
        assert_eq!(fs::read_to_string(artifact.path()).unwrap(), "<fo:root/>");
        artifact.cleanup().unwrap();
    }

    #[test]
    fn test_name_is_sanitized_and_unique() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(dir.path());
        let doc = Document::new("<x/>");

        let first = store.persist(&doc, "../coll 42").unwrap();
        let second = store.persist(&doc, "../coll 42").unwrap();
        assert_ne!(first.path(), second.path());
        for artifact in [&first, &second] {
            let name = artifact.file_name();
            assert!(name.ends_with(".fo"), "{name}");
            assert!(!name.contains('/') && !name.contains(' '), "{name}");
            assert_eq!(artifact.path().parent(), Some(dir.path()));
        }
        assert_eq!(store.live_count(), 2);
    }

    #[test]
    fn test_cleanup_and_drop_remove_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(dir.path());
        let doc = Document::new("<x/>");

        let explicit = store.persist(&doc, "a").unwrap();
        let path = explicit.path().to_path_buf();
        explicit.cleanup().unwrap();
        assert!(!path.exists());

        let dropped = store.persist(&doc, "b").unwrap();
        let path = dropped.path().to_path_buf();
        drop(dropped);
        assert!(!path.exists());
        assert_eq!(store.live_count(), 0);
    }

    #[test]
    fn test_cleanup_of_missing_file_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(dir.path());
        let artifact = store.persist(&Document::new("<x/>"), "gone").unwrap();
        fs::remove_file(artifact.path()).unwrap();
        assert!(artifact.cleanup().is_ok());
        assert_eq!(store.live_count(), 0);
    }

    #[test]
    fn test_no_partial_files_left_behind() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(dir.path()).with_extension(".xml");
        let artifact = store.persist(&Document::new("<x/>"), "r").unwrap();

        let names: HashSet<String> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names.len(), 1);
        assert!(names.contains(artifact.file_name()));
        assert!(artifact.file_name().ends_with(".xml"));
    }

    #[test]
    fn test_working_area_failure() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        fs::write(&blocker, "not a directory").unwrap();
        let store = ArtifactStore::new(blocker.join("work"));
        let err = store.persist(&Document::new("<x/>"), "r").unwrap_err();
        assert!(matches!(
            err,
            crate::PdfError::Persist(PersistError::WorkingArea { .. })
        ));
    }
}
