//! Domain-level error types for joke-rotator.
//!
//! All errors are typed with `thiserror` and provide meaningful context
//! without exposing internal details to HTTP callers.

use std::path::PathBuf;
use thiserror::Error;

/// Application-level errors shared by the server and the batch utilities.
#[derive(Error, Debug)]
pub enum AppError {
    /// Failed to open or query the database.
    #[error("Database error: {message}")]
    Database {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Input file could not be read as CSV, or export could not be written.
    #[error("CSV error in {path}: {message}")]
    Csv {
        path: PathBuf,
        message: String,
        #[source]
        source: Option<csv::Error>,
    },

    /// Invalid data supplied by the caller.
    #[error("Invalid data: {message}")]
    InvalidData { message: String },

    /// JSON parsing or serialization failed.
    #[error("JSON error: {message}")]
    JsonParse {
        message: String,
        #[source]
        source: Option<serde_json::Error>,
    },

    /// Configuration or environment error.
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// IO operation failed.
    #[error("IO error: {message}")]
    Io {
        message: String,
        #[source]
        source: Option<std::io::Error>,
    },
}

impl AppError {
    /// Create a database error from rusqlite error.
    pub fn database(err: rusqlite::Error) -> Self {
        Self::Database {
            message: err.to_string(),
            source: Some(Box::new(err)),
        }
    }

    /// Create a CSV error tied to the file being processed.
    pub fn csv(path: impl Into<PathBuf>, err: csv::Error) -> Self {
        Self::Csv {
            path: path.into(),
            message: err.to_string(),
            source: Some(err),
        }
    }

    /// Create a JSON parse error.
    pub fn json_parse(err: serde_json::Error) -> Self {
        Self::JsonParse {
            message: err.to_string(),
            source: Some(err),
        }
    }

    /// Create an IO error with context.
    pub fn io(message: impl Into<String>, err: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source: Some(err),
        }
    }
}

/// Result type alias using `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
