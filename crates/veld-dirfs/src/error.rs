//! Directory storage error types.

use std::path::PathBuf;

/// Result type for directory storage operations.
pub type DirfsResult<T> = Result<T, DirfsError>;

/// Errors that can occur while enumerating or resolving against a directory
/// tree.
///
/// Not-found conditions are handled in-band (empty enumerations, missing
/// resolutions) and never appear here.
#[derive(Debug, thiserror::Error)]
pub enum DirfsError {
    /// An I/O operation failed for a reason other than not-found.
    #[error("i/o failed at {path}: {source}")]
    Io {
        /// Path the operation touched.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A name escapes the storage root or is not expressible as a path.
    #[error("invalid name: {0}")]
    InvalidName(String),

    /// A persisted sidecar document could not be serialized.
    #[error("record serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl DirfsError {
    /// Creates a new I/O error for the given path.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Creates a new invalid name error.
    pub fn invalid_name(name: impl Into<String>) -> Self {
        Self::InvalidName(name.into())
    }
}
