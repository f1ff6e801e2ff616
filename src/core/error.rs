//! Error types and handling for indexd
//!
//! All fallible operations in the crate return [`Result`]. Failures in the
//! index subsystem are recoverable: a failed refresh leaves the previous
//! snapshot authoritative and the scheduler retries on its next tick.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Main result type used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for indexd
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Index subsystem errors
    #[error("Index error: {0}")]
    Index(#[from] IndexError),

    /// I/O errors from std
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Prometheus metrics errors
    #[error("Metrics error: {0}")]
    Metrics(#[from] prometheus::Error),

    /// Internal system errors
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Index-specific errors
#[derive(Error, Debug)]
pub enum IndexError {
    /// The dataset file could not be read
    #[error("dataset unavailable at {}: {source}", path.display())]
    SourceUnavailable {
        /// Configured dataset location
        path: PathBuf,
        /// Underlying read failure
        source: std::io::Error,
    },

    /// The dataset read exceeded the configured timeout
    #[error("dataset read timed out after {timeout:?}")]
    SourceTimeout {
        /// Configured read bound
        timeout: Duration,
    },
}

impl Error {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Check if this is a retryable error
    ///
    /// Index errors are retryable: the refresh scheduler picks them up again
    /// on its next tick.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::Index(_) | Error::Io(_))
    }
}
