//! Renderer trait and construction from settings
//!
//! A renderer turns a file in the working area into PDF bytes. It reads the
//! file by path and never owns, moves or deletes it.

use std::path::Path;
use std::time::Duration;

use marblfa_core::{RendererKind, RendererSettings};
use tracing::warn;

use crate::command::CommandRenderer;
use crate::error::Result;
use crate::http::HttpRenderer;

/// MIME type of rendered output
pub const PDF_CONTENT_TYPE: &str = "application/pdf";

/// Converts a formatter input file to PDF
pub trait Renderer: Send + Sync {
    /// Name used in logs and errors
    fn name(&self) -> &str;

    /// MIME type of the bytes [`render`](Self::render) returns
    fn content_type(&self) -> &'static str {
        PDF_CONTENT_TYPE
    }

    /// Render the file at `input`
    fn render(&self, input: &Path) -> Result<Vec<u8>>;
}

impl<T: Renderer + ?Sized> Renderer for Box<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn content_type(&self) -> &'static str {
        (**self).content_type()
    }

    fn render(&self, input: &Path) -> Result<Vec<u8>> {
        (**self).render(input)
    }
}

/// Retries a failed render exactly once
#[derive(Debug)]
pub struct RetryingRenderer<R> {
    inner: R,
}

impl<R: Renderer> RetryingRenderer<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Renderer> Renderer for RetryingRenderer<R> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn content_type(&self) -> &'static str {
        self.inner.content_type()
    }

    fn render(&self, input: &Path) -> Result<Vec<u8>> {
        match self.inner.render(input) {
            Ok(bytes) => Ok(bytes),
            Err(e) => {
                warn!(renderer = self.inner.name(), "render failed, retrying once: {}", e);
                self.inner.render(input)
            }
        }
    }
}

/// Build the renderer described by `settings`
pub fn from_settings(settings: &RendererSettings) -> Result<Box<dyn Renderer>> {
    let timeout = Duration::from_secs(settings.timeout_secs.max(1));
    let renderer: Box<dyn Renderer> = match settings.kind {
        RendererKind::Command => Box::new(
            CommandRenderer::new(&settings.program, settings.args.clone()).with_timeout(timeout),
        ),
        RendererKind::Http => Box::new(HttpRenderer::new(&settings.url, timeout)?),
    };

    if settings.retry_once {
        Ok(Box::new(RetryingRenderer::new(renderer)))
    } else {
        Ok(renderer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{PdfError, RenderError};
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Fails the first `failures` calls
    struct Flaky {
        failures: usize,
        calls: AtomicUsize,
    }

    impl Renderer for Flaky {
        fn name(&self) -> &str {
            "flaky"
        }

        fn render(&self, _input: &Path) -> Result<Vec<u8>> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if call < self.failures {
                Err(RenderError::EmptyOutput("flaky".to_string()).into())
            } else {
                Ok(b"%PDF-1.4".to_vec())
            }
        }
    }

    fn flaky(failures: usize) -> RetryingRenderer<Flaky> {
        RetryingRenderer::new(Flaky {
            failures,
            calls: AtomicUsize::new(0),
        })
    }

    #[test]
    fn test_retry_recovers_from_one_failure() {
        let renderer = flaky(1);
        assert_eq!(renderer.render(Path::new("x.fo")).unwrap(), b"%PDF-1.4");
        assert_eq!(renderer.into_inner().calls.into_inner(), 2);
    }

    #[test]
    fn test_retry_is_single() {
        let renderer = flaky(2);
        assert!(matches!(
            renderer.render(Path::new("x.fo")),
            Err(PdfError::Render(RenderError::EmptyOutput(_)))
        ));
        assert_eq!(renderer.into_inner().calls.into_inner(), 2);
    }

    #[test]
    fn test_from_settings() {
        let settings = RendererSettings::default();
        let renderer = from_settings(&settings).unwrap();
        assert_eq!(renderer.name(), "fop");
        assert_eq!(renderer.content_type(), PDF_CONTENT_TYPE);

        let http = RendererSettings {
            kind: RendererKind::Http,
            retry_once: true,
            ..RendererSettings::default()
        };
        assert_eq!(from_settings(&http).unwrap().name(), "http");
    }
}
