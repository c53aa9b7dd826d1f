use std::path::PathBuf;
use thiserror::Error;

/// All errors produced while loading and summarising a vehicle dataset.
#[derive(Error, Debug)]
pub enum LoadError {
    /// A local CSV file could not be opened or read from disk.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A remote CSV resource could not be retrieved.
    #[error("Failed to fetch {locator}: {message}")]
    Fetch { locator: String, message: String },

    /// The CSV stream could not be parsed (unreadable header, invalid UTF-8).
    #[error("Failed to parse CSV: {0}")]
    Csv(#[from] csv::Error),

    /// The header row lacks columns the validity predicate depends on.
    #[error("Missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    /// Pass-through for any raw I/O error that does not carry a path.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Catch-all for errors from third-party crates via `anyhow`.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Convenience alias used throughout the dashboard crates.
pub type Result<T> = std::result::Result<T, LoadError>;
