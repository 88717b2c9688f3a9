//! Error types for the Lodestar library.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for Lodestar operations.
#[derive(Debug, Error)]
pub enum LodestarError {
    /// Error reading or accessing a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error from the CSV library.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Invalid delimiter detected or specified.
    #[error("Invalid delimiter: {0}")]
    InvalidDelimiter(String),

    /// Empty table or no data to infer from.
    #[error("Empty table: {0}")]
    EmptyTable(String),

    /// A data row whose arity does not match the header.
    #[error("Ragged row {row}: expected {expected} cells, found {actual}")]
    RaggedRow {
        row: usize,
        expected: usize,
        actual: usize,
    },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Regex compilation error.
    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),
}

/// Result type alias for Lodestar operations.
pub type Result<T> = std::result::Result<T, LodestarError>;
