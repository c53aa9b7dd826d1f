use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::Context;
use ev_core::config::DEFAULT_SOURCE;
use ev_data::reader::SourceLocator;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

// ── Logging bootstrap ──────────────────────────────────────────────────────────

/// Map a CLI level name to a tracing filter directive.
fn filter_directive(log_level: &str) -> &'static str {
    match log_level.to_uppercase().as_str() {
        "DEBUG" => "debug",
        "WARNING" | "WARN" => "warn",
        "ERROR" => "error",
        _ => "info",
    }
}

/// Initialise the global `tracing` subscriber.
///
/// `log_level` is mapped to a [`tracing_subscriber::EnvFilter`] directive.
/// Output goes to `log_file` (appended, without ANSI colours) when given,
/// otherwise to stderr.
pub fn setup_logging(log_level: &str, log_file: Option<&Path>) -> anyhow::Result<()> {
    let filter = EnvFilter::try_new(filter_directive(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let (file_layer, stderr_layer) = match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("failed to open log file {}", path.display()))?;
            let layer = fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(Mutex::new(file));
            (Some(layer), None)
        }
        None => {
            let layer = fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr);
            (None, Some(layer))
        }
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(stderr_layer)
        .init();

    Ok(())
}

// ── Source discovery ───────────────────────────────────────────────────────────

/// Directories searched, relative to the working directory, for the default
/// CSV when no source is given.
const SEARCH_DIRS: [&str; 3] = [".", "public", "data"];

/// Find the default CSV under `base`, checking `base`, `base/public` and
/// `base/data` in that order.
pub fn discover_default_source(base: &Path) -> Option<PathBuf> {
    SEARCH_DIRS
        .iter()
        .map(|dir| base.join(dir).join(DEFAULT_SOURCE))
        .find(|p| p.is_file())
}

/// Resolve the locator to load.
///
/// An explicit source wins. Otherwise the default CSV is looked up from the
/// working directory; when it is nowhere to be found the bare default name is
/// used, so the load fails with the usual file error.
pub fn resolve_source(explicit: Option<&str>) -> SourceLocator {
    if let Some(source) = explicit {
        return SourceLocator::parse(source);
    }

    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    match discover_default_source(&cwd) {
        Some(path) => {
            tracing::debug!(path = %path.display(), "discovered default source");
            SourceLocator::File(path)
        }
        None => {
            tracing::warn!("{} not found in ., public/ or data/", DEFAULT_SOURCE);
            SourceLocator::File(PathBuf::from(DEFAULT_SOURCE))
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
