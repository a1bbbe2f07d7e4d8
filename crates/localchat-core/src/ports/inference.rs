//! Inference backend port.
//!
//! The backend turns a [`ModelCandidate`] into a loaded model handle, and the
//! handle runs one generation per call. Each call is expected to open its own
//! generation session and release it before returning, whatever the outcome.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use super::model_fetch::FetchError;
use crate::domain::ModelCandidate;

/// Why a candidate could not be instantiated.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The model file could not be located or downloaded.
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// The inference library rejected the model file.
    #[error("Failed to load model: {0}")]
    Load(String),

    /// This build cannot run inference at all.
    #[error("Inference backend unavailable: {0}")]
    Unsupported(String),
}

/// Failure reported by the inference library during generation.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct GenerationError(pub String);

impl GenerationError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }
}

/// Port for instantiating models.
#[async_trait]
pub trait InferenceBackendPort: Send + Sync {
    /// Acquire and initialize the given candidate.
    async fn load(&self, candidate: &ModelCandidate)
    -> Result<Arc<dyn LoadedModelPort>, LoadError>;
}

/// Port for a model that is ready to generate.
#[async_trait]
pub trait LoadedModelPort: Send + Sync {
    /// Generate a completion for `prompt`, producing at most `max_tokens`
    /// tokens. The returned text is untrimmed.
    async fn generate(&self, prompt: &str, max_tokens: u32) -> Result<String, GenerationError>;
}
