//! Chat request/response types.

use serde::Serialize;
use thiserror::Error;

/// Bounds applied to `maxTokens` on every request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenLimits {
    /// Used when the request omits `maxTokens`.
    pub default_max_tokens: u32,
    /// Largest accepted `maxTokens`.
    pub max_tokens_limit: u32,
}

impl Default for TokenLimits {
    fn default() -> Self {
        Self {
            default_max_tokens: crate::settings::DEFAULT_MAX_TOKENS,
            max_tokens_limit: crate::settings::DEFAULT_MAX_TOKENS_LIMIT,
        }
    }
}

/// A validated generation request.
///
/// Only constructible through [`ChatRequest::new`], so a value of this type
/// always carries a non-empty, trimmed prompt and an in-range token budget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatRequest {
    prompt: String,
    max_tokens: u32,
}

impl ChatRequest {
    /// Validate raw request fields.
    pub fn new(
        prompt: Option<&str>,
        max_tokens: Option<i64>,
        limits: TokenLimits,
    ) -> Result<Self, ChatError> {
        let prompt = prompt.map(str::trim).unwrap_or_default();
        if prompt.is_empty() {
            return Err(ChatError::Validation("Prompt is required".to_string()));
        }

        let max_tokens = match max_tokens {
            None => limits.default_max_tokens,
            Some(n) => u32::try_from(n)
                .ok()
                .filter(|n| (1..=limits.max_tokens_limit).contains(n))
                .ok_or_else(|| {
                    ChatError::Validation(format!(
                        "maxTokens must be between 1 and {}",
                        limits.max_tokens_limit
                    ))
                })?,
        };

        Ok(Self {
            prompt: prompt.to_string(),
            max_tokens,
        })
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub const fn max_tokens(&self) -> u32 {
        self.max_tokens
    }
}

/// Successful generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatReply {
    /// Generated text, surrounding whitespace trimmed.
    pub text: String,
    /// Public model label (not the candidate file name).
    pub model_name: String,
    /// Always `true`: generation never leaves the machine.
    pub local: bool,
}

/// Failure of a chat call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChatError {
    /// The request itself is unusable (missing prompt, bad `maxTokens`).
    #[error("{0}")]
    Validation(String),

    /// No model is loaded (still loading, or every candidate failed).
    #[error("Model not ready. Please wait for it to load.")]
    NotReady,

    /// The inference library failed during generation.
    #[error("Failed to generate response: {0}")]
    Generation(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    const LIMITS: TokenLimits = TokenLimits {
        default_max_tokens: 200,
        max_tokens_limit: 4096,
    };

    #[test]
    fn test_prompt_is_trimmed() {
        let req = ChatRequest::new(Some("  hello \n"), None, LIMITS).unwrap();
        assert_eq!(req.prompt(), "hello");
        assert_eq!(req.max_tokens(), 200);
    }

    #[test]
    fn test_missing_or_blank_prompt_rejected() {
        for prompt in [None, Some(""), Some("   \t")] {
            let err = ChatRequest::new(prompt, None, LIMITS).unwrap_err();
            assert_eq!(err, ChatError::Validation("Prompt is required".into()));
        }
    }

    #[test]
    fn test_max_tokens_bounds() {
        assert_eq!(
            ChatRequest::new(Some("hi"), Some(1), LIMITS)
                .unwrap()
                .max_tokens(),
            1
        );
        assert_eq!(
            ChatRequest::new(Some("hi"), Some(4096), LIMITS)
                .unwrap()
                .max_tokens(),
            4096
        );

        for bad in [0, -5, 4097, i64::MAX] {
            let err = ChatRequest::new(Some("hi"), Some(bad), LIMITS).unwrap_err();
            assert_eq!(
                err,
                ChatError::Validation("maxTokens must be between 1 and 4096".into())
            );
        }
    }

    #[test]
    fn test_reply_serializes_camel_case() {
        let reply = ChatReply {
            text: "hi".into(),
            model_name: "gpt4all-j".into(),
            local: true,
        };
        let json = serde_json::to_value(&reply).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"text": "hi", "modelName": "gpt4all-j", "local": true})
        );
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            ChatError::NotReady.to_string(),
            "Model not ready. Please wait for it to load."
        );
        assert_eq!(
            ChatError::Generation("boom".into()).to_string(),
            "Failed to generate response: boom"
        );
    }
}
