//! Registry error types
//!
//! Failures loading a catalog from a frame source.

use std::path::PathBuf;

/// Error type for registry operations
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// Catalog file could not be read
    #[error("failed to read frame catalog {}: {source}", path.display())]
    Io {
        /// File that failed
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// HTTP request to the frame source failed
    #[error("frame source request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Frame source answered with a non-success status
    #[error("frame source {url} returned status {status}")]
    Status {
        /// Requested URL
        url: String,
        /// HTTP status code
        status: u16,
    },

    /// Catalog document was not valid
    #[error("malformed frame catalog: {0}")]
    Parse(#[from] serde_json::Error),
}
