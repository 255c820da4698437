//! Response framing and body output
//!
//! [`ResultStreamer`] writes a response body to any [`Write`] sink and
//! returns the status line and headers that frame it. The transport that
//! puts those on the wire is not part of this crate.

use std::io::Write;

use marblfa_core::sanitize_filename;
use marblfa_pdf::PDF_CONTENT_TYPE;
use tracing::debug;

use crate::error::{PipelineError, Result};

pub const CONTENT_TYPE: &str = "Content-Type";
pub const CONTENT_DISPOSITION: &str = "Content-Disposition";
pub const CONTENT_LENGTH: &str = "Content-Length";

/// Content type of rendered listings
pub const HTML_CONTENT_TYPE: &str = "text/html; charset=utf-8";

const TEXT_CONTENT_TYPE: &str = "text/plain; charset=utf-8";

/// Status and headers of an emitted response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseHead {
    pub status: u16,
    pub headers: Vec<(String, String)>,
}

impl ResponseHead {
    fn new(status: u16) -> Self {
        Self {
            status,
            headers: Vec::new(),
        }
    }

    fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.push((name.to_string(), value.into()));
        self
    }

    /// Header value, matched case-insensitively
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// `inline; filename="<name>.<ext>"` with the name sanitized
pub fn content_disposition(suggested_filename: &str, content_type: &str) -> String {
    let name = sanitize_filename(suggested_filename);
    match extension_for(content_type) {
        Some(ext) if !name.ends_with(&format!(".{}", ext)) => {
            format!("inline; filename=\"{}.{}\"", name, ext)
        }
        _ => format!("inline; filename=\"{}\"", name),
    }
}

fn extension_for(content_type: &str) -> Option<&'static str> {
    match content_type.split(';').next().map(str::trim) {
        Some(PDF_CONTENT_TYPE) => Some("pdf"),
        Some("text/html") => Some("html"),
        _ => None,
    }
}

/// Writes response bodies to a sink
#[derive(Debug)]
pub struct ResultStreamer<W> {
    sink: W,
}

impl<W: Write> ResultStreamer<W> {
    pub fn new(sink: W) -> Self {
        Self { sink }
    }

    /// Write a successful body
    ///
    /// With a suggested filename the response carries a
    /// `Content-Disposition: inline` header naming it.
    pub fn emit(
        &mut self,
        body: &[u8],
        content_type: &str,
        suggested_filename: Option<&str>,
    ) -> Result<ResponseHead> {
        let mut head = ResponseHead::new(200).with_header(CONTENT_TYPE, content_type);
        if let Some(name) = suggested_filename {
            head = head.with_header(CONTENT_DISPOSITION, content_disposition(name, content_type));
        }
        let head = head.with_header(CONTENT_LENGTH, body.len().to_string());

        self.write_body(body)?;
        debug!(status = head.status, bytes = body.len(), "emitted response");
        Ok(head)
    }

    /// Write a plain-text error body with the error's status
    pub fn emit_error(&mut self, error: &PipelineError) -> Result<ResponseHead> {
        let body = format!("{}\n", error);
        let head = ResponseHead::new(error.status())
            .with_header(CONTENT_TYPE, TEXT_CONTENT_TYPE)
            .with_header(CONTENT_LENGTH, body.len().to_string());

        self.write_body(body.as_bytes())?;
        debug!(status = head.status, "emitted error response");
        Ok(head)
    }

    fn write_body(&mut self, body: &[u8]) -> Result<()> {
        self.sink.write_all(body).map_err(PipelineError::Stream)?;
        self.sink.flush().map_err(PipelineError::Stream)
    }

    pub fn into_inner(self) -> W {
        self.sink
    }
}
