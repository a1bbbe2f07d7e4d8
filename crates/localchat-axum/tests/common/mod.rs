//! Shared fixtures: fake inference backends and ready-made contexts.

#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use localchat_axum::AxumContext;
use localchat_core::ports::{GenerationError, InferenceBackendPort, LoadError, LoadedModelPort};
use localchat_core::{CandidateList, ChatService, DEFAULT_MODEL_LABEL, ModelCandidate, TokenLimits};

pub const CANDIDATE: &str = "fake.gguf";

/// Replies with the prompt and token budget, padded with whitespace.
pub struct EchoModel;

#[async_trait]
impl LoadedModelPort for EchoModel {
    async fn generate(&self, prompt: &str, max_tokens: u32) -> Result<String, GenerationError> {
        Ok(format!("  echo: {prompt} ({max_tokens})\n"))
    }
}

/// Always fails.
pub struct FailingModel;

#[async_trait]
impl LoadedModelPort for FailingModel {
    async fn generate(&self, _prompt: &str, _max_tokens: u32) -> Result<String, GenerationError> {
        Err(GenerationError::new("boom"))
    }
}

/// Panics mid-generation.
pub struct PanickingModel;

#[async_trait]
impl LoadedModelPort for PanickingModel {
    async fn generate(&self, _prompt: &str, _max_tokens: u32) -> Result<String, GenerationError> {
        panic!("model exploded")
    }
}

/// Loads the given model for every candidate, or fails them all.
pub struct FakeBackend {
    model: Option<Arc<dyn LoadedModelPort>>,
}

#[async_trait]
impl InferenceBackendPort for FakeBackend {
    async fn load(
        &self,
        candidate: &ModelCandidate,
    ) -> Result<Arc<dyn LoadedModelPort>, LoadError> {
        self.model
            .clone()
            .ok_or_else(|| LoadError::Load(format!("{candidate}: no such file")))
    }
}

fn service(model: Option<Arc<dyn LoadedModelPort>>) -> Arc<ChatService> {
    Arc::new(ChatService::new(
        Arc::new(FakeBackend { model }),
        CandidateList::parse(CANDIDATE),
        DEFAULT_MODEL_LABEL,
        TokenLimits::default(),
    ))
}

/// Context whose model has loaded.
pub async fn ready_context(model: impl LoadedModelPort + 'static) -> AxumContext {
    let chat = service(Some(Arc::new(model)));
    chat.load_model().await;
    AxumContext::new(chat)
}

/// Context whose load has not started.
pub fn loading_context() -> AxumContext {
    AxumContext::new(service(None))
}

/// Context where every candidate failed.
pub async fn unavailable_context() -> AxumContext {
    let chat = service(None);
    chat.load_model().await;
    AxumContext::new(chat)
}
