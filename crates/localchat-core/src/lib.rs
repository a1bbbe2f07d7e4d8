//! Core domain for localchat.
//!
//! Holds the domain types, the port traits implemented by the inference
//! runtime, the settings model, and [`ChatService`], which owns the model
//! lifecycle (loading → ready/unavailable) and the generation call.
//!
//! Nothing in this crate knows about HTTP or llama.cpp; adapters depend on it,
//! never the other way around.

pub mod domain;
pub mod paths;
pub mod ports;
pub mod services;
pub mod settings;

// Re-export commonly used types for convenience
pub use domain::{
    CandidateFailure, CandidateList, ChatError, ChatReply, ChatRequest, LoadOutcome, LoadState,
    ModelCandidate, ServiceStatus, TokenLimits,
};
pub use paths::{ModelsDirResolution, ModelsDirSource, PathError, resolve_models_dir};
pub use ports::{
    CoreError, FetchError, GenerationError, InferenceBackendPort, LoadError, LoadedModelPort,
    ModelFetcherPort,
};
pub use services::ChatService;
pub use settings::{
    DEFAULT_CANDIDATES, DEFAULT_DOWNLOAD_BASE_URL, DEFAULT_MAX_TOKENS, DEFAULT_MODEL_LABEL,
    DEFAULT_PORT, Settings, SettingsError, validate_settings,
};
