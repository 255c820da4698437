//! Local renderer process (Apache FOP and compatible tools)
//!
//! Arguments may contain `{input}` and `{output}` placeholders. With an
//! `{output}` placeholder the PDF is read back from that path; without one
//! the program's stdout is the PDF. Output and stderr are captured in a
//! scratch directory that is removed when the render returns.

use std::fs::{self, File};
use std::io::ErrorKind;
use std::path::Path;
use std::process::{Command, ExitStatus, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::error::{RenderError, Result};
use crate::renderer::Renderer;

pub const INPUT_PLACEHOLDER: &str = "{input}";
pub const OUTPUT_PLACEHOLDER: &str = "{output}";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Longest stderr excerpt carried in an error
const STDERR_EXCERPT: usize = 2000;

/// Renders by running a local program
#[derive(Debug, Clone)]
pub struct CommandRenderer {
    program: String,
    args: Vec<String>,
    timeout: Duration,
}

impl CommandRenderer {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Builder: deadline for one render
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    fn writes_output_file(&self) -> bool {
        self.args.iter().any(|a| a.contains(OUTPUT_PLACEHOLDER))
    }

    fn expand_args(&self, input: &Path, output: &Path) -> Vec<String> {
        let input = input.to_string_lossy();
        let output = output.to_string_lossy();
        self.args
            .iter()
            .map(|a| {
                a.replace(INPUT_PLACEHOLDER, &input)
                    .replace(OUTPUT_PLACEHOLDER, &output)
            })
            .collect()
    }

    /// Wait for the child, killing it at the deadline
    fn wait(&self, child: &mut std::process::Child) -> Result<ExitStatus> {
        let started = Instant::now();
        loop {
            match child.try_wait().map_err(RenderError::from)? {
                Some(status) => return Ok(status),
                None if started.elapsed() > self.timeout => {
                    if let Err(e) = child.kill() {
                        warn!(program = %self.program, "kill after timeout failed: {}", e);
                    }
                    child.wait().map_err(RenderError::from)?;
                    return Err(RenderError::Timeout {
                        renderer: self.program.clone(),
                        secs: self.timeout.as_secs(),
                    }
                    .into());
                }
                None => thread::sleep(POLL_INTERVAL),
            }
        }
    }
}

fn read_capture(path: &Path) -> std::io::Result<Vec<u8>> {
    match fs::read(path) {
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(Vec::new()),
        other => other,
    }
}

fn stderr_excerpt(bytes: &[u8]) -> String {
    let text = String::from_utf8_lossy(bytes);
    let text = text.trim();
    match text.char_indices().nth(STDERR_EXCERPT) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

impl Renderer for CommandRenderer {
    fn name(&self) -> &str {
        &self.program
    }

    fn render(&self, input: &Path) -> Result<Vec<u8>> {
        let scratch = tempfile::Builder::new()
            .prefix("marblfa-render-")
            .tempdir()
            .map_err(RenderError::from)?;
        let output_path = scratch.path().join("output.pdf");
        let stdout_path = scratch.path().join("stdout");
        let stderr_path = scratch.path().join("stderr");

        let args = self.expand_args(input, &output_path);
        debug!(program = %self.program, ?args, "starting renderer");

        let mut child = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::from(File::create(&stdout_path).map_err(RenderError::from)?))
            .stderr(Stdio::from(File::create(&stderr_path).map_err(RenderError::from)?))
            .spawn()
            .map_err(|source| RenderError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        let started = Instant::now();
        let status = self.wait(&mut child)?;
        let stderr = read_capture(&stderr_path).map_err(RenderError::from)?;
        if !status.success() {
            return Err(RenderError::Failed {
                renderer: self.program.clone(),
                status: status.to_string(),
                stderr: stderr_excerpt(&stderr),
            }
            .into());
        }

        let pdf = if self.writes_output_file() {
            read_capture(&output_path)
        } else {
            read_capture(&stdout_path)
        }
        .map_err(RenderError::from)?;
        if pdf.is_empty() {
            return Err(RenderError::EmptyOutput(self.program.clone()).into());
        }

        debug!(
            program = %self.program,
            bytes = pdf.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "renderer finished"
        );
        Ok(pdf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PdfError;

    #[test]
    fn test_expand_args() {
        let renderer = CommandRenderer::new(
            "fop",
            vec!["-fo".into(), "{input}".into(), "-pdf".into(), "{output}".into()],
        );
        assert!(renderer.writes_output_file());
        assert_eq!(
            renderer.expand_args(Path::new("/w/a.fo"), Path::new("/s/output.pdf")),
            vec!["-fo", "/w/a.fo", "-pdf", "/s/output.pdf"]
        );
    }

    #[test]
    fn test_missing_program() {
        let renderer = CommandRenderer::new("marblfa-no-such-renderer", vec![]);
        assert!(matches!(
            renderer.render(Path::new("in.fo")),
            Err(PdfError::Render(RenderError::Spawn { .. }))
        ));
    }

    #[test]
    fn test_stderr_excerpt_is_bounded() {
        let long = "x".repeat(STDERR_EXCERPT + 10);
        let excerpt = stderr_excerpt(long.as_bytes());
        assert_eq!(excerpt.len(), STDERR_EXCERPT + 3);
        assert_eq!(stderr_excerpt(b"  boom \n"), "boom");
    }
}
