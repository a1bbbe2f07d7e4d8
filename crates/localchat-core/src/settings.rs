//! Settings domain types and validation.
//!
//! These are pure domain types with no infrastructure dependencies. The CLI
//! fills them from flags, environment variables and `.env`.

use serde::{Deserialize, Serialize};

use crate::domain::{CandidateList, TokenLimits};

/// Default HTTP port.
pub const DEFAULT_PORT: u16 = 8000;

/// Default bind address.
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Public label reported as `modelName`.
pub const DEFAULT_MODEL_LABEL: &str = "gpt4all-j";

/// Token budget used when a request omits `maxTokens`.
pub const DEFAULT_MAX_TOKENS: u32 = 200;

/// Largest `maxTokens` a request may ask for.
pub const DEFAULT_MAX_TOKENS_LIMIT: u32 = 4096;

/// Default llama.cpp context window.
pub const DEFAULT_CONTEXT_SIZE: u32 = 2048;

/// Candidates tried in order when none are configured.
pub const DEFAULT_CANDIDATES: [&str; 3] = [
    "orca-mini-3b-gguf2-q4_0.gguf",
    "gpt4all-falcon-q4_0.gguf",
    "orca-mini-3b-gguf2-q4_0",
];

/// Where missing model files are downloaded from.
pub const DEFAULT_DOWNLOAD_BASE_URL: &str = "https://gpt4all.io/models/gguf";

/// Prompt template applied inside each generation session. `{prompt}` is
/// replaced by the user prompt.
pub const DEFAULT_PROMPT_TEMPLATE: &str = "### User:\n{prompt}\n\n### Response:\n";

/// Service settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Address the HTTP server binds to.
    pub host: String,

    /// Port the HTTP server binds to.
    pub port: u16,

    /// Ordered model candidates.
    pub candidates: CandidateList,

    /// Label reported as `modelName` in replies and status.
    pub model_label: String,

    /// `maxTokens` used when a request omits it.
    pub default_max_tokens: u32,

    /// Upper bound accepted for `maxTokens`.
    pub max_tokens_limit: u32,

    /// Context window for each generation session.
    pub context_size: u32,

    /// Layers offloaded to the GPU (0 = CPU only).
    pub gpu_layers: u32,

    /// Inference threads; `None` lets the library decide.
    pub threads: Option<u32>,

    /// Prompt template with a `{prompt}` placeholder.
    pub prompt_template: String,

    /// Directory holding model files. `None` resolves to the platform default.
    pub models_dir: Option<String>,

    /// Base URL for downloading missing models. `None` disables downloads.
    pub download_base_url: Option<String>,

    /// Start listening before the model has loaded.
    pub background_load: bool,

    /// CORS origins allowed to call the API. Empty allows any origin.
    pub allowed_origins: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl Settings {
    /// Create settings with sensible defaults.
    pub fn with_defaults() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            candidates: CandidateList::new(DEFAULT_CANDIDATES),
            model_label: DEFAULT_MODEL_LABEL.to_string(),
            default_max_tokens: DEFAULT_MAX_TOKENS,
            max_tokens_limit: DEFAULT_MAX_TOKENS_LIMIT,
            context_size: DEFAULT_CONTEXT_SIZE,
            gpu_layers: 0,
            threads: None,
            prompt_template: DEFAULT_PROMPT_TEMPLATE.to_string(),
            models_dir: None,
            download_base_url: Some(DEFAULT_DOWNLOAD_BASE_URL.to_string()),
            background_load: false,
            allowed_origins: Vec::new(),
        }
    }

    /// Socket address string (`host:port`).
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Token bounds applied to requests.
    pub const fn token_limits(&self) -> TokenLimits {
        TokenLimits {
            default_max_tokens: self.default_max_tokens,
            max_tokens_limit: self.max_tokens_limit,
        }
    }
}

/// Settings validation error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    #[error("At least one model candidate is required")]
    NoCandidates,

    #[error("Port should be >= 1024 (privileged ports require root), got {0}")]
    InvalidPort(u16),

    #[error("Default max tokens must be between 1 and the limit ({limit}), got {value}")]
    InvalidDefaultMaxTokens { value: u32, limit: u32 },

    #[error("Max tokens limit must be at least 1")]
    InvalidMaxTokensLimit,

    #[error("Context size must be between 512 and 131072, got {0}")]
    InvalidContextSize(u32),

    #[error("Model label cannot be empty")]
    EmptyModelLabel,

    #[error("Prompt template must contain the {{prompt}} placeholder")]
    MissingPromptPlaceholder,

    #[error("Download base URL must start with http:// or https://, got {0}")]
    InvalidDownloadUrl(String),

    #[error("Models directory cannot be empty")]
    EmptyModelsDir,
}

/// Validate settings values.
pub fn validate_settings(settings: &Settings) -> Result<(), SettingsError> {
    if settings.candidates.is_empty() {
        return Err(SettingsError::NoCandidates);
    }

    if settings.port < 1024 {
        return Err(SettingsError::InvalidPort(settings.port));
    }

    if settings.max_tokens_limit == 0 {
        return Err(SettingsError::InvalidMaxTokensLimit);
    }

    if !(1..=settings.max_tokens_limit).contains(&settings.default_max_tokens) {
        return Err(SettingsError::InvalidDefaultMaxTokens {
            value: settings.default_max_tokens,
            limit: settings.max_tokens_limit,
        });
    }

    if !(512..=131_072).contains(&settings.context_size) {
        return Err(SettingsError::InvalidContextSize(settings.context_size));
    }

    if settings.model_label.trim().is_empty() {
        return Err(SettingsError::EmptyModelLabel);
    }

    if !settings.prompt_template.contains("{prompt}") {
        return Err(SettingsError::MissingPromptPlaceholder);
    }

    if let Some(url) = &settings.download_base_url {
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(SettingsError::InvalidDownloadUrl(url.clone()));
        }
    }

    if settings
        .models_dir
        .as_ref()
        .is_some_and(|p| p.trim().is_empty())
    {
        return Err(SettingsError::EmptyModelsDir);
    }

    Ok(())
}
