use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the chat statistics crates.
#[derive(Error, Debug)]
pub enum ChatError {
    /// The chat export does not exist at the given path.
    #[error("Chat file not found at: {0}")]
    FileNotFound(PathBuf),

    /// A file could not be opened or read from disk.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A line matched the chat grammar but its date/time digits do not form a
    /// valid calendar value.
    #[error("Invalid timestamp on line {line}: {value}")]
    InvalidTimestamp { line: usize, value: String },

    /// A result table could not be folded into the summary table.
    #[error("Cannot merge table: {0}")]
    Merge(String),

    /// A report could not be serialized to JSON.
    #[error("Failed to serialize report: {0}")]
    Json(#[from] serde_json::Error),

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Convenience alias used throughout the chat statistics crates.
pub type Result<T> = std::result::Result<T, ChatError>;
