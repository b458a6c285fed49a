//! Error types surfaced to the user interface.

use std::{io, path::PathBuf};

use thiserror::Error;

/// Failure to turn a file into player records. The store is left untouched.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        /// File that was being read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// The content is not valid JSON or has an unexpected shape.
    #[error("invalid player export: {0}")]
    Json(#[from] serde_json::Error),
    /// The document is valid JSON but its top level is not an object.
    #[error("expected a JSON object at the top level")]
    NotAnObject,
    /// A `tsLastConnection` value does not map to a calendar date.
    #[error("timestamp {0} is out of range")]
    Timestamp(i64),
}

/// Failure to write the CSV export. No partial file is left at the destination.
#[derive(Debug, Error)]
pub enum ExportError {
    /// The temporary file could not be created or flushed.
    #[error("failed to write {}: {source}", path.display())]
    Io {
        /// Destination or temporary file involved.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// The CSV writer rejected a record.
    #[error("failed to encode CSV: {0}")]
    Csv(#[from] csv::Error),
    /// The finished file could not be moved into place.
    #[error("failed to save {}: {source}", path.display())]
    Persist {
        /// Destination path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
}

/// Failure to read the optional configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file exists but could not be parsed into [`crate::AppConfig`].
    #[error("invalid configuration in {}: {source}", path.display())]
    Invalid {
        /// Configuration file path.
        path: PathBuf,
        /// Underlying error from the `config` crate.
        #[source]
        source: config::ConfigError,
    },
}
