//! Service lifecycle state.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use super::candidate::ModelCandidate;
use crate::ports::LoadedModelPort;

/// Lifecycle of the single model instance.
///
/// Starts as `Loading` and moves exactly once to `Ready` or `Unavailable`.
#[derive(Clone)]
pub enum LoadState {
    Loading,
    Ready {
        candidate: ModelCandidate,
        model: Arc<dyn LoadedModelPort>,
    },
    Unavailable,
}

impl LoadState {
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub const fn is_ready(&self) -> bool {
        matches!(self, Self::Ready { .. })
    }
}

impl fmt::Debug for LoadState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Loading => f.write_str("Loading"),
            Self::Ready { candidate, .. } => {
                f.debug_struct("Ready").field("candidate", candidate).finish()
            }
            Self::Unavailable => f.write_str("Unavailable"),
        }
    }
}

/// Snapshot returned by `GET /status`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceStatus {
    pub ready: bool,
    pub loading: bool,
    /// Public model label, present only when ready.
    pub model_name: Option<String>,
    /// Candidate that actually loaded, present only when ready.
    pub candidate: Option<String>,
}

impl ServiceStatus {
    pub fn from_state(state: &LoadState, model_label: &str) -> Self {
        match state {
            LoadState::Loading => Self {
                ready: false,
                loading: true,
                model_name: None,
                candidate: None,
            },
            LoadState::Ready { candidate, .. } => Self {
                ready: true,
                loading: false,
                model_name: Some(model_label.to_string()),
                candidate: Some(candidate.id().to_string()),
            },
            LoadState::Unavailable => Self {
                ready: false,
                loading: false,
                model_name: None,
                candidate: None,
            },
        }
    }
}

/// A candidate that could not be loaded, with the reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateFailure {
    pub candidate: ModelCandidate,
    pub reason: String,
}

/// Result of the one-shot load sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// A candidate loaded; the ones before it failed.
    Loaded {
        candidate: ModelCandidate,
        failures: Vec<CandidateFailure>,
    },
    /// Every candidate failed. The service stays unavailable.
    Exhausted { failures: Vec<CandidateFailure> },
}

impl LoadOutcome {
    pub const fn is_loaded(&self) -> bool {
        matches!(self, Self::Loaded { .. })
    }

    pub fn failures(&self) -> &[CandidateFailure] {
        match self {
            Self::Loaded { failures, .. } | Self::Exhausted { failures } => failures,
        }
    }
}
