//! FOP servlet renderer
//!
//! The servlet is given the artifact's path on a shared filesystem,
//! form-encoded and appended to the configured URL (e.g.
//! `http://host/fop/fop?fo=`), and answers with the PDF.

use std::path::Path;
use std::time::Duration;

use reqwest::blocking::Client;
use tracing::debug;
use url::form_urlencoded;

use crate::error::{RenderError, Result};
use crate::renderer::Renderer;

/// Renders by asking a FOP servlet for the artifact's path
#[derive(Debug, Clone)]
pub struct HttpRenderer {
    base_url: String,
    client: Client,
    timeout: Duration,
}

impl HttpRenderer {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(RenderError::from)?;
        Ok(Self {
            base_url: base_url.into(),
            client,
            timeout,
        })
    }

    /// Request URL for an input path
    pub fn request_url(&self, input: &Path) -> String {
        let path = input.to_string_lossy();
        let encoded: String = form_urlencoded::byte_serialize(path.as_bytes()).collect();
        format!("{}{}", self.base_url, encoded)
    }
}

impl Renderer for HttpRenderer {
    fn name(&self) -> &str {
        "http"
    }

    fn render(&self, input: &Path) -> Result<Vec<u8>> {
        let url = self.request_url(input);
        debug!(url = %url, "requesting render");

        let response = self.client.get(&url).send().map_err(|e| {
            if e.is_timeout() {
                RenderError::Timeout {
                    renderer: self.name().to_string(),
                    secs: self.timeout.as_secs(),
                }
            } else {
                RenderError::from(e)
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(RenderError::Failed {
                renderer: url,
                status: format!("HTTP {}", status.as_u16()),
                stderr: body.trim().to_string(),
            }
            .into());
        }

        let pdf = response.bytes().map_err(RenderError::from)?.to_vec();
        if pdf.is_empty() {
            return Err(RenderError::EmptyOutput(url).into());
        }
        Ok(pdf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PdfError;

    #[test]
    fn test_request_url_appends_path() {
        let renderer =
            HttpRenderer::new("http://fop.example.org/fop/fop?fo=", Duration::from_secs(5)).unwrap();
        assert_eq!(
            renderer.request_url(Path::new("/tmp/marblfa/r1-abc.fo")),
            "http://fop.example.org/fop/fop?fo=%2Ftmp%2Fmarblfa%2Fr1-abc.fo"
        );
    }

    #[test]
    fn test_request_url_encodes_reserved_characters() {
        let renderer =
            HttpRenderer::new("http://fop.example.org/fop?fo=", Duration::from_secs(5)).unwrap();
        let url = renderer.request_url(Path::new("/srv/work area/x&y=1#%/r1-abc.fo"));
        assert_eq!(
            url,
            "http://fop.example.org/fop?fo=%2Fsrv%2Fwork+area%2Fx%26y%3D1%23%25%2Fr1-abc.fo"
        );
        let query = url.split_once('?').unwrap().1;
        let pairs: Vec<(String, String)> = form_urlencoded::parse(query.as_bytes())
            .into_owned()
            .collect();
        assert_eq!(
            pairs,
            vec![("fo".to_string(), "/srv/work area/x&y=1#%/r1-abc.fo".to_string())]
        );
    }

    #[test]
    fn test_unreachable_servlet() {
        let renderer = HttpRenderer::new("http://127.0.0.1:1/fop?fo=", Duration::from_secs(2)).unwrap();
        assert!(matches!(
            renderer.render(Path::new("/tmp/x.fo")),
            Err(PdfError::Render(_))
        ));
    }
}
