//! Port definitions (trait abstractions) for external systems.
//!
//! Ports define the interfaces that the core domain expects from the
//! inference runtime. They contain no implementation details and use only
//! domain types.
//!
//! # Design Rules
//!
//! - No llama.cpp or reqwest types in any signature
//! - Errors carry messages, not library error values
//! - Blocking work is the adapter's concern; every port method is async

pub mod inference;
pub mod model_fetch;

use thiserror::Error;

pub use inference::{GenerationError, InferenceBackendPort, LoadError, LoadedModelPort};
pub use model_fetch::{FetchError, ModelFetcherPort};

/// Errors raised while assembling the service from settings.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Settings validation error.
    #[error(transparent)]
    Settings(#[from] crate::settings::SettingsError),

    /// Path resolution error.
    #[error(transparent)]
    Path(#[from] crate::paths::PathError),
}
