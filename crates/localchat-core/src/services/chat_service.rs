//! Chat service - owns the model lifecycle and the generation call.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::{Mutex, watch};
use tracing::{debug, error, info, warn};

use crate::domain::{
    CandidateFailure, CandidateList, ChatError, ChatReply, ChatRequest, LoadOutcome, LoadState,
    ServiceStatus, TokenLimits,
};
use crate::ports::InferenceBackendPort;

/// Service wrapping one model instance.
///
/// Built once in the composition root and shared behind an `Arc`. The state
/// lives in a watch channel: it starts as [`LoadState::Loading`] and is
/// replaced exactly once by [`ChatService::load_model`].
pub struct ChatService {
    backend: Arc<dyn InferenceBackendPort>,
    candidates: CandidateList,
    model_label: String,
    limits: TokenLimits,
    state: watch::Sender<LoadState>,
    load_started: AtomicBool,
    // Held for the duration of a generation; one inference at a time.
    generation: Mutex<()>,
}

impl ChatService {
    /// Create a new chat service in the `Loading` state.
    pub fn new(
        backend: Arc<dyn InferenceBackendPort>,
        candidates: CandidateList,
        model_label: impl Into<String>,
        limits: TokenLimits,
    ) -> Self {
        let (state, _) = watch::channel(LoadState::Loading);
        Self {
            backend,
            candidates,
            model_label: model_label.into(),
            limits,
            state,
            load_started: AtomicBool::new(false),
            generation: Mutex::new(()),
        }
    }

    /// Try each candidate in order until one loads.
    ///
    /// Runs once. Later calls return the outcome implied by the current state
    /// without touching the backend.
    pub async fn load_model(&self) -> LoadOutcome {
        if self.load_started.swap(true, Ordering::SeqCst) {
            debug!("Model load already started; not retrying");
            let settled = self.wait_until_settled().await;
            return match settled {
                LoadState::Ready { candidate, .. } => LoadOutcome::Loaded {
                    candidate,
                    failures: Vec::new(),
                },
                LoadState::Loading | LoadState::Unavailable => {
                    LoadOutcome::Exhausted { failures: Vec::new() }
                }
            };
        }

        info!(candidates = self.candidates.len(), "Loading model");
        let mut failures = Vec::new();

        for candidate in &self.candidates {
            info!(candidate = %candidate, "Trying to load model");
            match self.backend.load(candidate).await {
                Ok(model) => {
                    info!(candidate = %candidate, "Successfully loaded model");
                    self.state.send_replace(LoadState::Ready {
                        candidate: candidate.clone(),
                        model,
                    });
                    return LoadOutcome::Loaded {
                        candidate: candidate.clone(),
                        failures,
                    };
                }
                Err(e) => {
                    warn!(candidate = %candidate, error = %e, "Failed to load model");
                    failures.push(CandidateFailure {
                        candidate: candidate.clone(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        error!(
            attempted = failures.len(),
            "Failed to load any available model; service unavailable"
        );
        self.state.send_replace(LoadState::Unavailable);
        LoadOutcome::Exhausted { failures }
    }

    /// Validate raw request fields against the configured token limits.
    pub fn prepare(
        &self,
        prompt: Option<&str>,
        max_tokens: Option<i64>,
    ) -> Result<ChatRequest, ChatError> {
        ChatRequest::new(prompt, max_tokens, self.limits)
    }

    /// Generate a reply.
    ///
    /// Fails with [`ChatError::NotReady`] without calling the backend unless a
    /// model has loaded.
    pub async fn generate(&self, request: &ChatRequest) -> Result<ChatReply, ChatError> {
        let model = match &*self.state.borrow() {
            LoadState::Ready { model, .. } => Arc::clone(model),
            LoadState::Loading | LoadState::Unavailable => return Err(ChatError::NotReady),
        };

        let _slot = self.generation.lock().await;
        let preview: String = request.prompt().chars().take(50).collect();
        info!(
            prompt = %preview,
            max_tokens = request.max_tokens(),
            "Generating response"
        );

        match model.generate(request.prompt(), request.max_tokens()).await {
            Ok(text) => Ok(ChatReply {
                text: text.trim().to_string(),
                model_name: self.model_label.clone(),
                local: true,
            }),
            Err(e) => {
                error!(error = %e, "Error generating response");
                Err(ChatError::Generation(e.to_string()))
            }
        }
    }

    /// Current status snapshot.
    pub fn status(&self) -> ServiceStatus {
        ServiceStatus::from_state(&self.state.borrow(), &self.model_label)
    }

    /// Wait until loading has finished and return the terminal state.
    pub async fn wait_until_settled(&self) -> LoadState {
        let mut rx = self.state.subscribe();
        match rx.wait_for(|s| !s.is_loading()).await {
            Ok(state) => state.clone(),
            // The sender lives in `self`, so the channel cannot close here.
            Err(_) => self.state.borrow().clone(),
        }
    }
}
