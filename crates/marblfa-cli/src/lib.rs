//! marblfa CLI - Command-line interface library
//!
//! - Browse: list collections by first letter
//! - Search: keyword search across collections
//! - Pdf: render one finding aid to PDF
//! - Letters: show the browse letter index
//!
//! # Binary Usage
//!
//! ```bash
//! # Collections starting with B, second page
//! marblfa browse --letter B --page 2
//!
//! # Keyword search against a local directory of EAD files
//! marblfa --corpus eads/ search irish drama
//!
//! # PDF for one finding aid
//! marblfa --config site.toml pdf leverette135 --output leverette135.pdf
//! ```

pub mod app;

pub use app::{
    browse_command, build_service, letters_command, pdf_command, run_cli, search_command,
};
