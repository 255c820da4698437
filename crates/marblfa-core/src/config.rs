//! Site settings
//!
//! Loaded once at startup and handed to each component's constructor. Every
//! section has defaults, so an empty file (or no file) is a valid
//! configuration.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::paginate::DEFAULT_PER_PAGE;

/// Top-level settings structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Settings {
    pub store: StoreSettings,
    pub working_area: WorkingAreaSettings,
    pub renderer: RendererSettings,
    pub browse: BrowseSettings,
    pub pdf: PdfSettings,
}

impl Settings {
    /// Parse settings from a TOML string
    pub fn from_toml_str(toml_str: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(toml_str)
    }

    /// Load settings from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Ok(Self::from_toml_str(&text)?)
    }
}

/// XML database connection
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreSettings {
    /// REST endpoint of the XML database
    pub url: String,
    /// Collection holding the EAD documents
    pub collection: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            url: "http://localhost:8080/exist/rest".to_string(),
            collection: "/db/findingaids".to_string(),
            timeout_secs: 30,
        }
    }
}

/// Directory for short-lived render inputs
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkingAreaSettings {
    pub path: PathBuf,
}

impl Default for WorkingAreaSettings {
    fn default() -> Self {
        Self {
            path: std::env::temp_dir().join("marblfa"),
        }
    }
}

/// Which renderer turns print layouts into PDF
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RendererKind {
    /// Spawn a local program (e.g. Apache FOP)
    #[default]
    Command,
    /// Fetch from a FOP servlet
    Http,
}

/// External renderer invocation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RendererSettings {
    pub kind: RendererKind,
    /// Program to run for [`RendererKind::Command`]
    pub program: String,
    /// Arguments; `{input}` and `{output}` are replaced with paths
    pub args: Vec<String>,
    /// Servlet base URL for [`RendererKind::Http`]; the input path is appended
    pub url: String,
    /// Deadline for one render, in seconds
    pub timeout_secs: u64,
    /// Retry a failed render once
    pub retry_once: bool,
}

impl Default for RendererSettings {
    fn default() -> Self {
        Self {
            kind: RendererKind::Command,
            program: "fop".to_string(),
            args: vec![
                "-fo".to_string(),
                "{input}".to_string(),
                "-pdf".to_string(),
                "{output}".to_string(),
            ],
            url: "http://localhost:8080/fop/fop?fo=".to_string(),
            timeout_secs: 120,
            retry_once: false,
        }
    }
}

/// Alphabetical browse listing
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowseSettings {
    /// Precomputed letter index file
    pub letter_index: PathBuf,
    pub per_page: usize,
    pub label_text: String,
    /// Link target for letter and page links
    pub base_link: String,
    /// Link target for PDF downloads
    pub pdf_link: String,
}

impl Default for BrowseSettings {
    fn default() -> Self {
        Self {
            letter_index: PathBuf::from("browse-ndx.xml"),
            per_page: DEFAULT_PER_PAGE,
            label_text: "Browse Collections Alphabetically:".to_string(),
            base_link: "browse".to_string(),
            pdf_link: "pdf".to_string(),
        }
    }
}

/// PDF layout options
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PdfSettings {
    /// Content layout mode: `full` or `summary`
    pub mode: String,
    /// `letter` or `a4`
    pub page_size: String,
    pub font_family: String,
}

impl Default for PdfSettings {
    fn default() -> Self {
        Self {
            mode: "full".to_string(),
            page_size: "letter".to_string(),
            font_family: "serif".to_string(),
        }
    }
}
