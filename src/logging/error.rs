//! Logging error types.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while configuring emitters and destinations.
#[derive(Debug, Error)]
pub enum LogError {
    /// Pattern has an unknown field code or an unterminated `{`.
    #[error("invalid log pattern: {0:?}")]
    InvalidPattern(String),

    /// Destination definition is incomplete.
    #[error("invalid destination: {0}")]
    InvalidDestination(String),

    /// Log file could not be opened.
    #[error("cannot open log file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
