//! Error types for postgraph.
//!
//! Every fallible operation in the workspace returns [`Result`], whose error
//! side is the [`Error`] enum defined here.

use std::io;
use std::path::PathBuf;
use thiserror::Error as ThisError;

/// The core error type for corpus loading, configuration and lookups.
#[derive(ThisError, Debug)]
pub enum Error {
    /// File system error
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Content root or file not found
    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Path that cannot be turned into a document identifier
    #[error("Invalid file path: {reason}")]
    InvalidPath { reason: String },

    /// Front matter or other content parse failure
    #[error("Parse error: {reason}")]
    ParseError { reason: String },

    /// Invalid configuration
    #[error("Configuration error: {reason}")]
    ConfigError { reason: String },

    /// Serialization of an output artifact failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Document identifier not present in the corpus
    #[error("Document not found: {id}")]
    NotFound { id: String },

    /// Generic unclassified error
    #[error("Error: {0}")]
    Other(String),
}

/// Convenient Result type alias
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create an IO error
    pub fn io(err: io::Error) -> Self {
        Error::Io(err)
    }

    /// Create a file not found error
    pub fn file_not_found(path: impl Into<PathBuf>) -> Self {
        Error::FileNotFound { path: path.into() }
    }

    /// Create an invalid path error
    pub fn invalid_path(reason: impl Into<String>) -> Self {
        Error::InvalidPath {
            reason: reason.into(),
        }
    }

    /// Create a parse error
    pub fn parse_error(reason: impl Into<String>) -> Self {
        Error::ParseError {
            reason: reason.into(),
        }
    }

    /// Create a configuration error
    pub fn config_error(reason: impl Into<String>) -> Self {
        Error::ConfigError {
            reason: reason.into(),
        }
    }

    /// Create a not found error for a document id
    pub fn not_found(id: impl Into<String>) -> Self {
        Error::NotFound { id: id.into() }
    }

    /// Create a generic error
    pub fn other(msg: impl Into<String>) -> Self {
        Error::Other(msg.into())
    }
}
