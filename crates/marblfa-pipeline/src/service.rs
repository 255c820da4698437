//! Finding-aid request handling
//!
//! One synchronous path per request. Browse and search run a query, page the
//! records and render the listing template. PDF requests walk the
//! [`PdfStage`] states: look the document up, apply the two-stage layout
//! chain, persist the result to the working area, hand the path to the
//! renderer, stream the bytes, and remove the artifact. Once an artifact
//! exists it is removed on every exit path.

use std::io::Write;
use std::path::Path;

use marblfa_core::{
    download_name, Document, Element, LetterIndex, Page, Paginator, PdfSettings, Query,
    QueryBuilder, Selection, Settings,
};
use marblfa_pdf::{ArtifactStore, PersistedArtifact, Renderer};
use marblfa_store::{DocumentStore, StoreError};
use marblfa_transform::{
    FindingAidLayout, ResultsListing, TemplateRegistry, TransformChain, TransformError,
    TransformStage, XslFo,
};
use tracing::{debug, info, warn};

use crate::error::{PdfFailure, PipelineError, Result};
use crate::stage::PdfStage;
use crate::stream::{ResponseHead, ResultStreamer};

/// Link target for search result paging
pub const SEARCH_LINK: &str = "search";

/// A rendered listing page
#[derive(Debug, Clone)]
pub struct HtmlPage {
    pub html: Document,
    pub page: Page,
}

/// A completed PDF request
#[derive(Debug, Clone)]
pub struct PdfReport {
    pub id: String,
    /// Download name, without extension
    pub filename: String,
    pub head: ResponseHead,
    pub bytes: usize,
    /// States passed through, in order
    pub stages: Vec<PdfStage>,
}

/// Browse, search and PDF generation over one store
pub struct FindingAidService {
    store: Box<dyn DocumentStore>,
    queries: QueryBuilder,
    registry: TemplateRegistry,
    artifacts: ArtifactStore,
    renderer: Box<dyn Renderer>,
    letters: LetterIndex,
    paginator: Paginator,
    settings: Settings,
}

impl std::fmt::Debug for FindingAidService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FindingAidService")
            .field("store", &self.store.name())
            .field("renderer", &self.renderer.name())
            .field("working_area", &self.artifacts.working_area())
            .finish()
    }
}

impl FindingAidService {
    pub fn new(
        settings: &Settings,
        store: Box<dyn DocumentStore>,
        renderer: Box<dyn Renderer>,
        letters: LetterIndex,
    ) -> Self {
        Self {
            store,
            queries: QueryBuilder::new(&settings.store.collection),
            registry: TemplateRegistry::with_builtins(),
            artifacts: ArtifactStore::new(&settings.working_area.path),
            renderer,
            letters,
            paginator: Paginator::new(settings.browse.per_page),
            settings: settings.clone(),
        }
    }

    /// Build with the renderer and letter index named in `settings`
    ///
    /// A missing letter index file falls back to `A`-`Z`.
    pub fn from_settings(settings: &Settings, store: Box<dyn DocumentStore>) -> Result<Self> {
        let renderer = marblfa_pdf::from_settings(&settings.renderer)?;
        let letters = load_letters(&settings.browse.letter_index)?;
        Ok(Self::new(settings, store, renderer, letters))
    }

    pub fn artifacts(&self) -> &ArtifactStore {
        &self.artifacts
    }

    pub fn letters(&self) -> &LetterIndex {
        &self.letters
    }

    /// Records starting with `letter` (`all` for everything)
    pub fn browse(&self, letter: Option<&str>, page: Option<&str>) -> Result<HtmlPage> {
        let query = self.queries.build(letter, None)?;
        self.listing(&query, "browse", &self.settings.browse.base_link, page)
    }

    /// Records matching every keyword in `terms`
    pub fn search(&self, terms: &str, page: Option<&str>) -> Result<HtmlPage> {
        let query = self.queries.search(terms)?;
        self.listing(&query, "search", SEARCH_LINK, page)
    }

    fn listing(
        &self,
        query: &Query,
        mode: &str,
        base_link: &str,
        page: Option<&str>,
    ) -> Result<HtmlPage> {
        let result = self.store.execute(query)?;
        let root = result
            .root()
            .map_err(|e| StoreError::QuerySyntax(format!("malformed store response: {}", e)))?;
        let records: Vec<&Element> = root.children_named("record").collect();
        let page = self.paginator.page(records.len(), page);

        let mut listing = Element::new("records");
        if let Selection::Browse { letter, terms } = query.selection() {
            if terms.is_empty() {
                listing.set_attr("letter", letter.as_param());
            } else {
                listing.set_attr("terms", terms.join(" "));
            }
        }
        listing.set_attr("page", page.number.to_string());
        listing.set_attr("pages", page.num_pages.to_string());
        listing.set_attr("total", page.total.to_string());
        for record in page.slice(&records) {
            listing.push((*record).clone());
        }

        let input = Element::new("results")
            .with_child(self.letters.to_element())
            .with_child(listing);
        let stages = [TransformStage::new(ResultsListing::NAME)
            .param("mode", mode)
            .param("label_text", &self.settings.browse.label_text)
            .param("base_link", base_link)
            .param("pdf_link", &self.settings.browse.pdf_link)];
        let html = self
            .registry
            .apply(&Document::from_element(&input), &stages)?;

        info!(
            store = self.store.name(),
            mode,
            total = page.total,
            page = page.number,
            "listing rendered"
        );
        Ok(HtmlPage { html, page })
    }

    fn pdf_stages(pdf: &PdfSettings) -> [TransformStage; 2] {
        [
            TransformStage::new(FindingAidLayout::NAME).param("mode", &pdf.mode),
            TransformStage::new(XslFo::NAME)
                .param("page_size", &pdf.page_size)
                .param("font_family", &pdf.font_family),
        ]
    }

    /// Generate the PDF for finding aid `id` and write it to `sink`
    pub fn pdf<W: Write>(&self, id: &str, sink: W) -> std::result::Result<PdfReport, PdfFailure> {
        let mut stages = Vec::with_capacity(8);

        let query = self
            .queries
            .lookup(id)
            .map_err(|e| PdfFailure::new(PdfStage::QueryBuilt, e))?;
        stages.push(PdfStage::QueryBuilt);

        let ead = self
            .lookup(&query, id)
            .map_err(|e| PdfFailure::new(PdfStage::Queried, e))?;
        stages.push(PdfStage::Queried);
        let filename = suggested_filename(&ead, id);

        let chain = self
            .registry
            .bind(&Self::pdf_stages(&self.settings.pdf))
            .map_err(|e| PdfFailure::new(PdfStage::Transformed(1), e))?;
        let fo = chain
            .apply(&Document::from_element(&ead))
            .map_err(|e| PdfFailure::new(PdfStage::Transformed(failed_stage(&chain, &e)), e))?;
        stages.extend([PdfStage::Transformed(1), PdfStage::Transformed(2)]);

        let artifact = self
            .artifacts
            .persist(&fo, &filename)
            .map_err(|e| PdfFailure::new(PdfStage::Persisted, e))?;
        stages.push(PdfStage::Persisted);
        debug!(id, artifact = %artifact.path().display(), "artifact persisted");

        let pdf = match self.renderer.render(artifact.path()) {
            Ok(pdf) => pdf,
            Err(e) => return Err(abort(artifact, PdfStage::Rendered, e.into())),
        };
        stages.push(PdfStage::Rendered);

        let mut streamer = ResultStreamer::new(sink);
        let head = match streamer.emit(&pdf, self.renderer.content_type(), Some(&filename)) {
            Ok(head) => head,
            Err(e) => return Err(abort(artifact, PdfStage::Streamed, e)),
        };
        stages.push(PdfStage::Streamed);

        artifact
            .cleanup()
            .map_err(|e| PdfFailure::new(PdfStage::CleanedUp, e))?;
        stages.push(PdfStage::CleanedUp);

        info!(id, filename = %filename, bytes = pdf.len(), renderer = self.renderer.name(), "pdf streamed");
        Ok(PdfReport {
            id: id.to_string(),
            filename,
            head,
            bytes: pdf.len(),
            stages,
        })
    }

    /// The `<ead>` a lookup query returns, or `NotFound`
    fn lookup(&self, query: &Query, id: &str) -> Result<Element> {
        let result = self.store.execute(query)?;
        let root = result
            .root()
            .map_err(|e| StoreError::QuerySyntax(format!("malformed store response: {}", e)))?;
        let ead = if root.is("ead") {
            Some(root)
        } else {
            root.child("ead").cloned()
        };
        ead.ok_or_else(|| PipelineError::NotFound(id.to_string()))
    }
}

/// Remove the artifact, then report the failure
fn abort(artifact: PersistedArtifact, stage: PdfStage, error: PipelineError) -> PdfFailure {
    let cleaned_up = match artifact.cleanup() {
        Ok(()) => true,
        Err(e) => {
            warn!("cleanup after failure at {}: {}", stage, e);
            false
        }
    };
    PdfFailure {
        stage,
        cleaned_up,
        error,
    }
}

/// 1-based number of the chain stage an error came from
fn failed_stage(chain: &TransformChain, error: &TransformError) -> u8 {
    let number = match error {
        TransformError::MalformedInput { stage, .. } => *stage,
        TransformError::Failed { template, .. }
        | TransformError::InvalidParameter { template, .. } => chain
            .template_names()
            .iter()
            .position(|name| *name == template.as_str())
            .map_or(1, |index| index + 1),
        _ => 1,
    };
    u8::try_from(number).unwrap_or(u8::MAX)
}

/// Download name: the EAD file identifier, else the requested id
fn suggested_filename(ead: &Element, id: &str) -> String {
    let eadid = ead.find_text("eadheader/eadid");
    download_name(eadid.as_deref().unwrap_or(id))
}

fn load_letters(path: &Path) -> Result<LetterIndex> {
    if path.exists() {
        return Ok(LetterIndex::load(path)?);
    }
    warn!(path = %path.display(), "letter index not found, using A-Z");
    Ok(LetterIndex::new(('A'..='Z').map(String::from)))
}
