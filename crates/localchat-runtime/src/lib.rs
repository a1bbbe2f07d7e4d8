//! Inference runtime adapters for localchat.
//!
//! Implements the core ports:
//! - [`HttpModelFetcher`] resolves candidates to GGUF files, downloading and
//!   caching them on first use.
//! - `LlamaInferenceBackend` (feature `llama`) runs models in-process through
//!   llama.cpp.
//! - [`UnavailableBackend`] stands in when inference cannot run; every
//!   candidate fails with the reason, so the service reports unavailable
//!   instead of crashing.

#![deny(unsafe_code)]

mod config;
mod fetch;
#[cfg(feature = "llama")]
mod llama;
mod unavailable;

use std::sync::Arc;

use localchat_core::ports::{InferenceBackendPort, ModelFetcherPort};

pub use config::{LlamaConfig, SamplingConfig};
pub use fetch::HttpModelFetcher;
#[cfg(feature = "llama")]
pub use llama::LlamaInferenceBackend;
pub use unavailable::UnavailableBackend;

/// Whether this build can run inference.
pub const fn inference_compiled_in() -> bool {
    cfg!(feature = "llama")
}

/// Build the inference backend for this build.
///
/// Never fails: when llama.cpp is not compiled in or cannot initialize, an
/// [`UnavailableBackend`] carrying the reason is returned instead.
#[cfg(feature = "llama")]
pub fn build_backend(
    config: LlamaConfig,
    fetcher: Arc<dyn ModelFetcherPort>,
) -> Arc<dyn InferenceBackendPort> {
    match LlamaInferenceBackend::new(config, fetcher) {
        Ok(backend) => Arc::new(backend),
        Err(e) => {
            tracing::error!(error = %e, "Failed to initialize llama.cpp backend");
            Arc::new(UnavailableBackend::new(e.to_string()))
        }
    }
}

/// Build the inference backend for this build.
///
/// Never fails: when llama.cpp is not compiled in or cannot initialize, an
/// [`UnavailableBackend`] carrying the reason is returned instead.
#[cfg(not(feature = "llama"))]
pub fn build_backend(
    config: LlamaConfig,
    fetcher: Arc<dyn ModelFetcherPort>,
) -> Arc<dyn InferenceBackendPort> {
    let _ = (config, fetcher);
    tracing::warn!("Built without the `llama` feature; inference is disabled");
    Arc::new(UnavailableBackend::new(
        "this build has no inference support (rebuild with `--features llama`)",
    ))
}
