//! Error types for Lodestar
//!
//! This module defines all error types used throughout the system.
//! We use `thiserror` for automatic `Display` and `Error` trait implementations.
//!
//! Every multi-step operation (reindex, rank, scan, maintenance) is fail-fast:
//! the first error from a collaborator terminates the whole call and is
//! returned unchanged. Empty results are never errors.

use std::io;
use thiserror::Error;

/// Result type alias for Lodestar operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for Lodestar
#[derive(Debug, Error)]
pub enum Error {
    /// A configured searchable field does not exist on the model's schema
    #[error("Field \"{field}\" does not exist on model {model}, can not add to search")]
    UnknownField {
        /// Model whose field list was being indexed
        model: String,
        /// Name of the missing field
        field: String,
    },

    /// Any failure reported by a storage collaborator
    #[error("Storage error: {0}")]
    Storage(String),

    /// Invalid configuration value or unparseable config file
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A match pattern could not be compiled
    #[error("Invalid pattern: {0}")]
    InvalidPattern(String),

    /// A worker pool could not be created
    #[error("Thread pool error: {0}")]
    ThreadPool(String),

    /// I/O error (config files)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl Error {
    /// Construct a storage error from anything displayable
    pub fn storage(msg: impl Into<String>) -> Self {
        Error::Storage(msg.into())
    }

    /// Check whether this is a configuration-class error
    ///
    /// Configuration errors are caused by the caller's setup, not by the
    /// data or the backing store, and retrying will not help.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Error::UnknownField { .. } | Error::InvalidConfig(_) | Error::InvalidPattern(_)
        )
    }
}

impl From<regex::Error> for Error {
    fn from(e: regex::Error) -> Self {
        Error::InvalidPattern(e.to_string())
    }
}
