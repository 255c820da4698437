//! CLI Application logic
//!
//! Each subcommand is a function over a [`FindingAidService`] and an output
//! sink, so the same code paths run from the binary and from tests.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{debug, info};

use marblfa_core::Settings;
use marblfa_pipeline::{FindingAidService, HtmlPage, ResultStreamer, HTML_CONTENT_TYPE};
use marblfa_store::{DocumentStore, ExistStore, MemoryStore};

/// Config files looked for when `--config` is not given
const CONFIG_CANDIDATES: [&str; 2] = ["marblfa.toml", ".marblfa.toml"];

#[derive(Parser)]
#[command(name = "marblfa")]
#[command(author, version, about = "Browse archival finding aids and render them to PDF", long_about = None)]
struct Cli {
    /// Settings file (TOML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Directory of EAD files to serve instead of the XML database
    #[arg(long, global = true)]
    corpus: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List collections by first letter
    Browse {
        /// Single letter or `all`
        #[arg(short, long)]
        letter: Option<String>,

        /// Page number
        #[arg(short, long)]
        page: Option<String>,
    },

    /// Keyword search across all collections
    Search {
        /// Search terms
        #[arg(required = true)]
        terms: Vec<String>,

        /// Page number
        #[arg(short, long)]
        page: Option<String>,
    },

    /// Render one finding aid to PDF
    Pdf {
        /// Finding aid identifier
        id: String,

        /// Output file (defaults to `<identifier>.pdf`)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show the browse letter index
    Letters,
}

/// Run the CLI application
pub fn run_cli() -> Result<()> {
    let cli = Cli::parse();
    let settings = load_settings(cli.config.as_deref())?;
    let service = build_service(&settings, cli.corpus.as_deref())?;
    let mut stdout = std::io::stdout().lock();

    match cli.command {
        Commands::Browse { letter, page } => {
            browse_command(&service, letter.as_deref(), page.as_deref(), &mut stdout)?;
        }
        Commands::Search { terms, page } => {
            search_command(&service, &terms.join(" "), page.as_deref(), &mut stdout)?;
        }
        Commands::Pdf { id, output } => {
            let path = pdf_command(&service, &id, output.as_deref())?;
            writeln!(stdout, "{}", path.display())?;
        }
        Commands::Letters => {
            letters_command(&service, &mut stdout)?;
        }
    }

    Ok(())
}

/// Build the service over a corpus directory or the configured store
pub fn build_service(settings: &Settings, corpus: Option<&Path>) -> Result<FindingAidService> {
    let store: Box<dyn DocumentStore> = match corpus {
        Some(dir) => Box::new(
            MemoryStore::load_dir(dir)
                .with_context(|| format!("Failed to load corpus: {}", dir.display()))?,
        ),
        None => Box::new(
            ExistStore::new(&settings.store)
                .with_context(|| format!("Failed to create store client: {}", settings.store.url))?,
        ),
    };
    FindingAidService::from_settings(settings, store).context("Failed to set up service")
}

/// Execute the browse command
pub fn browse_command(
    service: &FindingAidService,
    letter: Option<&str>,
    page: Option<&str>,
    out: &mut dyn Write,
) -> Result<()> {
    let listing = service.browse(letter, page).context("Browse failed")?;
    emit_listing(&listing, out)
}

/// Execute the search command
pub fn search_command(
    service: &FindingAidService,
    terms: &str,
    page: Option<&str>,
    out: &mut dyn Write,
) -> Result<()> {
    let listing = service.search(terms, page).context("Search failed")?;
    emit_listing(&listing, out)
}

fn emit_listing(listing: &HtmlPage, out: &mut dyn Write) -> Result<()> {
    let head = ResultStreamer::new(&mut *out)
        .emit(listing.html.as_bytes(), HTML_CONTENT_TYPE, None)
        .context("Failed to write listing")?;
    writeln!(out)?;
    debug!(
        status = head.status,
        page = listing.page.number,
        pages = listing.page.num_pages,
        "listing written"
    );
    Ok(())
}

/// Execute the pdf command; returns the file written
pub fn pdf_command(service: &FindingAidService, id: &str, output: Option<&Path>) -> Result<PathBuf> {
    let mut pdf = Vec::new();
    let report = service
        .pdf(id, &mut pdf)
        .with_context(|| format!("Failed to render finding aid '{}'", id))?;

    let path = match output {
        Some(path) => path.to_path_buf(),
        None => PathBuf::from(format!("{}.pdf", report.filename)),
    };
    fs::write(&path, &pdf).with_context(|| format!("Failed to write {}", path.display()))?;
    info!(id, path = %path.display(), bytes = report.bytes, "pdf written");
    Ok(path)
}

/// Execute the letters command
pub fn letters_command(service: &FindingAidService, out: &mut dyn Write) -> Result<()> {
    writeln!(out, "{}", service.letters().letters().join(" "))?;
    Ok(())
}

/// Load settings from a config file or use defaults
fn load_settings(config_path: Option<&Path>) -> Result<Settings> {
    match config_path {
        Some(path) => {
            if !path.exists() {
                anyhow::bail!("Config file not found: {}", path.display());
            }
            Settings::load(path)
                .with_context(|| format!("Failed to load config: {}", path.display()))
        }
        None => {
            for candidate in CONFIG_CANDIDATES {
                if Path::new(candidate).exists() {
                    return Settings::load(candidate)
                        .with_context(|| format!("Failed to load config: {}", candidate));
                }
            }
            Ok(Settings::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_browse() {
        let args = vec!["marblfa", "browse", "--letter", "B", "--page", "2"];
        let cli = Cli::try_parse_from(args).unwrap();

        match cli.command {
            Commands::Browse { letter, page } => {
                assert_eq!(letter.as_deref(), Some("B"));
                assert_eq!(page.as_deref(), Some("2"));
            }
            _ => panic!("Expected Browse command"),
        }
    }

    #[test]
    fn test_cli_parse_search_terms() {
        let args = vec!["marblfa", "search", "irish", "drama", "-p", "3"];
        let cli = Cli::try_parse_from(args).unwrap();

        match cli.command {
            Commands::Search { terms, page } => {
                assert_eq!(terms, vec!["irish", "drama"]);
                assert_eq!(page.as_deref(), Some("3"));
            }
            _ => panic!("Expected Search command"),
        }
    }

    #[test]
    fn test_cli_parse_search_requires_terms() {
        assert!(Cli::try_parse_from(vec!["marblfa", "search"]).is_err());
    }

    #[test]
    fn test_cli_parse_pdf_with_globals() {
        let args = vec![
            "marblfa", "pdf", "coll 42", "-o", "out.pdf", "--corpus", "eads", "--config",
            "site.toml",
        ];
        let cli = Cli::try_parse_from(args).unwrap();

        assert_eq!(cli.corpus, Some(PathBuf::from("eads")));
        assert_eq!(cli.config, Some(PathBuf::from("site.toml")));
        match cli.command {
            Commands::Pdf { id, output } => {
                assert_eq!(id, "coll 42");
                assert_eq!(output, Some(PathBuf::from("out.pdf")));
            }
            _ => panic!("Expected Pdf command"),
        }
    }

    #[test]
    fn test_load_settings_missing_file() {
        assert!(load_settings(Some(Path::new("/nonexistent/marblfa.toml"))).is_err());
    }

    #[test]
    fn test_load_settings_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("marblfa.toml");
        fs::write(&path, "[browse]\nper_page = 25\n").unwrap();
        let settings = load_settings(Some(&path)).unwrap();
        assert_eq!(settings.browse.per_page, 25);
    }
}
