//! Model file acquisition port.

use std::path::PathBuf;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::ModelCandidate;

/// Errors while resolving a candidate to a file on disk.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Not on disk and downloading is disabled or not permitted for this id.
    #[error("Model file not found: {0}")]
    NotFound(String),

    /// The download server answered with a non-success status.
    #[error("Download of {url} failed: HTTP {status}")]
    HttpStatus { url: String, status: u16 },

    /// Transport-level failure while downloading.
    #[error("Download failed: {0}")]
    Transport(String),

    /// Local filesystem failure.
    #[error("I/O error: {0}")]
    Io(String),
}

/// Port for turning a candidate id into a local model file.
#[async_trait]
pub trait ModelFetcherPort: Send + Sync {
    /// Return the path of a usable model file, downloading it if needed.
    async fn fetch(&self, candidate: &ModelCandidate) -> Result<PathBuf, FetchError>;
}
