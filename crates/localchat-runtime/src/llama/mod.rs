//! In-process llama.cpp backend.
//!
//! One [`LlamaBackend`] is initialized per process. Each candidate is fetched
//! to disk and loaded with `LlamaModel::load_from_file`; each generation opens
//! its own [`GenerationSession`] (a fresh `LlamaContext`) that is dropped when
//! the call returns.

mod session;

use std::sync::Arc;

use async_trait::async_trait;
use llama_cpp_2::llama_backend::LlamaBackend;
use llama_cpp_2::model::LlamaModel;
use llama_cpp_2::model::params::LlamaModelParams;
use tracing::{debug, info};

use localchat_core::ModelCandidate;
use localchat_core::ports::{
    GenerationError, InferenceBackendPort, LoadError, LoadedModelPort, ModelFetcherPort,
};

use crate::config::LlamaConfig;
use session::GenerationSession;

/// llama.cpp implementation of [`InferenceBackendPort`].
pub struct LlamaInferenceBackend {
    backend: Arc<LlamaBackend>,
    fetcher: Arc<dyn ModelFetcherPort>,
    config: Arc<LlamaConfig>,
}

impl LlamaInferenceBackend {
    /// Initialize llama.cpp. Fails if it was already initialized in this
    /// process.
    pub fn new(config: LlamaConfig, fetcher: Arc<dyn ModelFetcherPort>) -> Result<Self, LoadError> {
        let backend = LlamaBackend::init().map_err(|e| LoadError::Unsupported(e.to_string()))?;
        Ok(Self {
            backend: Arc::new(backend),
            fetcher,
            config: Arc::new(config),
        })
    }
}

#[async_trait]
impl InferenceBackendPort for LlamaInferenceBackend {
    async fn load(
        &self,
        candidate: &ModelCandidate,
    ) -> Result<Arc<dyn LoadedModelPort>, LoadError> {
        let path = self.fetcher.fetch(candidate).await?;
        info!(candidate = %candidate, path = %path.display(), "Loading GGUF model");

        let backend = Arc::clone(&self.backend);
        let gpu_layers = self.config.gpu_layers;
        let model = tokio::task::spawn_blocking(move || {
            let params = LlamaModelParams::default().with_n_gpu_layers(gpu_layers);
            LlamaModel::load_from_file(&backend, &path, &params)
        })
        .await
        .map_err(|e| LoadError::Load(format!("load task failed: {e}")))?
        .map_err(|e| LoadError::Load(e.to_string()))?;

        Ok(Arc::new(LlamaLoadedModel {
            backend: Arc::clone(&self.backend),
            model: Arc::new(model),
            config: Arc::clone(&self.config),
        }))
    }
}

/// A loaded GGUF model.
struct LlamaLoadedModel {
    backend: Arc<LlamaBackend>,
    model: Arc<LlamaModel>,
    config: Arc<LlamaConfig>,
}

#[async_trait]
impl LoadedModelPort for LlamaLoadedModel {
    async fn generate(&self, prompt: &str, max_tokens: u32) -> Result<String, GenerationError> {
        let backend = Arc::clone(&self.backend);
        let model = Arc::clone(&self.model);
        let config = Arc::clone(&self.config);
        let prompt = config.render_prompt(prompt);

        tokio::task::spawn_blocking(move || -> Result<String, GenerationError> {
            let mut session = GenerationSession::open(&backend, &model, &config, &prompt)?;
            let text = session.complete(max_tokens)?;
            debug!(chars = text.len(), "Generation session finished");
            Ok(text)
        })
        .await
        .map_err(|e| GenerationError::new(format!("generation task failed: {e}")))?
    }
}
