//! Backend used when inference cannot run in this process.

use std::sync::Arc;

use async_trait::async_trait;
use localchat_core::ModelCandidate;
use localchat_core::ports::{InferenceBackendPort, LoadError, LoadedModelPort};

/// Fails every candidate with a fixed reason.
#[derive(Debug, Clone)]
pub struct UnavailableBackend {
    reason: String,
}

impl UnavailableBackend {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

#[async_trait]
impl InferenceBackendPort for UnavailableBackend {
    async fn load(
        &self,
        _candidate: &ModelCandidate,
    ) -> Result<Arc<dyn LoadedModelPort>, LoadError> {
        Err(LoadError::Unsupported(self.reason.clone()))
    }
}
