use clap::builder::RangedU64ValueParser;
use clap::Parser;
use std::path::PathBuf;

use crate::config::{
    InsightConfig, LoaderConfig, CHUNK_SIZE, MIN_MODEL_YEAR, PAGE_SIZE, SAMPLE_SIZE,
    TOP_MAKES_LIMIT,
};

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Electric vehicle population insights in the terminal
#[derive(Parser, Debug, Clone)]
#[command(
    name = "ev-dashboard",
    about = "Electric vehicle population insights in the terminal",
    version
)]
pub struct Settings {
    /// CSV source: a file path or an http(s) URL (discovered when omitted)
    #[arg(long, env = "EV_DASHBOARD_SOURCE")]
    pub source: Option<String>,

    /// View mode
    #[arg(long, default_value = "dashboard", value_parser = ["dashboard", "summary"])]
    pub view: String,

    /// Output format for the summary view
    #[arg(long, default_value = "text", value_parser = ["text", "json"])]
    pub format: String,

    /// Display theme
    #[arg(long, default_value = "auto", value_parser = ["light", "dark", "auto"])]
    pub theme: String,

    /// Number of leading valid records used for statistics
    #[arg(long, default_value_t = SAMPLE_SIZE)]
    pub sample_size: usize,

    /// Earliest model year counted in the year histogram
    #[arg(long, default_value_t = MIN_MODEL_YEAR, allow_negative_numbers = true)]
    pub min_year: i64,

    /// Number of manufacturers shown in the ranking
    #[arg(long, default_value_t = TOP_MAKES_LIMIT, value_parser = RangedU64ValueParser::<usize>::new().range(1..))]
    pub top_makes: usize,

    /// Table rows per page
    #[arg(long, default_value_t = PAGE_SIZE, value_parser = RangedU64ValueParser::<usize>::new().range(1..))]
    pub page_size: usize,

    /// CSV rows consumed per parser chunk
    #[arg(long, default_value_t = CHUNK_SIZE, value_parser = RangedU64ValueParser::<usize>::new().range(1..))]
    pub chunk_size: usize,

    /// Logging level
    #[arg(long, default_value = "INFO", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR"])]
    pub log_level: String,

    /// Log file path (logs go to stderr when omitted)
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

// ── Settings impl ──────────────────────────────────────────────────────────────

impl Settings {
    /// Parse the process arguments and resolve derived values.
    pub fn load() -> Self {
        Self::load_from_args(std::env::args_os())
    }

    /// Same as [`Settings::load`] but accepts an explicit argument list,
    /// enabling unit-testing without spawning subprocesses.
    pub fn load_from_args<I, T>(args: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Self::resolve(Settings::parse_from(args))
    }

    /// Apply the `--debug` override.
    fn resolve(mut settings: Settings) -> Settings {
        if settings.debug {
            settings.log_level = "DEBUG".to_string();
        }
        settings
    }

    /// Aggregation parameters selected on the command line.
    pub fn insight_config(&self) -> InsightConfig {
        InsightConfig {
            sample_size: self.sample_size,
            min_year: self.min_year,
            top_makes: self.top_makes,
        }
    }

    /// Loader parameters selected on the command line.
    pub fn loader_config(&self) -> LoaderConfig {
        LoaderConfig {
            chunk_size: self.chunk_size,
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
