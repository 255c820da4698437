//! Command renderer against real processes
//!
//! Uses `sh` as a stand-in formatter.

#![cfg(unix)]

use std::fs;
use std::path::Path;
use std::time::{Duration, Instant};

use marblfa_core::Document;
use marblfa_pdf::{ArtifactStore, CommandRenderer, PdfError, RenderError, Renderer};

fn sh(script: &str, extra: &[&str]) -> CommandRenderer {
    let mut args = vec!["-c".to_string(), script.to_string(), "sh".to_string()];
    args.extend(extra.iter().map(|a| a.to_string()));
    CommandRenderer::new("sh", args)
}

fn input(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("input.fo");
    fs::write(&path, "%PDF-1.4 fake").unwrap();
    path
}

#[test]
fn output_placeholder_file_is_returned() {
    let dir = tempfile::tempdir().unwrap();
    let renderer = sh(r#"cp "$1" "$2""#, &["{input}", "{output}"]);
    let pdf = renderer.render(&input(dir.path())).unwrap();
    assert_eq!(pdf, b"%PDF-1.4 fake");
}

#[test]
fn stdout_is_returned_without_output_placeholder() {
    let dir = tempfile::tempdir().unwrap();
    let renderer = sh(r#"cat "$1""#, &["{input}"]);
    assert_eq!(renderer.render(&input(dir.path())).unwrap(), b"%PDF-1.4 fake");
}

#[test]
fn renderer_does_not_touch_its_input() {
    let dir = tempfile::tempdir().unwrap();
    let path = input(dir.path());
    sh(r#"cat "$1""#, &["{input}"]).render(&path).unwrap();
    assert_eq!(fs::read_to_string(&path).unwrap(), "%PDF-1.4 fake");
}

#[test]
fn nonzero_exit_carries_stderr() {
    let dir = tempfile::tempdir().unwrap();
    let renderer = sh("echo 'SEVERE: bad fo' >&2; exit 3", &[]);
    match renderer.render(&input(dir.path())) {
        Err(PdfError::Render(RenderError::Failed { stderr, .. })) => {
            assert_eq!(stderr, "SEVERE: bad fo");
        }
        other => panic!("expected failure, got {other:?}"),
    }
}

#[test]
fn empty_output_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let renderer = sh("true", &[]);
    assert!(matches!(
        renderer.render(&input(dir.path())),
        Err(PdfError::Render(RenderError::EmptyOutput(_)))
    ));
}

#[test]
fn deadline_kills_the_process() {
    let dir = tempfile::tempdir().unwrap();
    let renderer = sh("sleep 10", &[]).with_timeout(Duration::from_millis(200));
    let started = Instant::now();
    assert!(matches!(
        renderer.render(&input(dir.path())),
        Err(PdfError::Render(RenderError::Timeout { .. }))
    ));
    assert!(started.elapsed() < Duration::from_secs(5));
}

#[test]
fn renders_a_persisted_artifact() {
    let dir = tempfile::tempdir().unwrap();
    let store = ArtifactStore::new(dir.path().join("work"));
    let artifact = store
        .persist(&Document::new("<fo:root/>"), "coll 42")
        .unwrap();

    let pdf = sh(r#"cat "$1""#, &["{input}"]).render(artifact.path()).unwrap();
    assert_eq!(pdf, b"<fo:root/>");
    assert!(artifact.path().exists());

    artifact.cleanup().unwrap();
    assert_eq!(store.live_count(), 0);
}
