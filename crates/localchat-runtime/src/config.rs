//! Runtime configuration derived from [`Settings`].

use localchat_core::Settings;

/// Sampler parameters for each generation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplingConfig {
    pub temperature: f32,
    pub top_k: i32,
    pub top_p: f32,
    /// `u32::MAX` asks llama.cpp for a random seed.
    pub seed: u32,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            top_k: 40,
            top_p: 0.4,
            seed: u32::MAX,
        }
    }
}

/// Parameters for loading models and opening generation sessions.
#[derive(Debug, Clone, PartialEq)]
pub struct LlamaConfig {
    pub context_size: u32,
    pub gpu_layers: u32,
    pub threads: Option<u32>,
    pub prompt_template: String,
    pub sampling: SamplingConfig,
}

impl LlamaConfig {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            context_size: settings.context_size,
            gpu_layers: settings.gpu_layers,
            threads: settings.threads,
            prompt_template: settings.prompt_template.clone(),
            sampling: SamplingConfig::default(),
        }
    }

    /// Apply the prompt template.
    pub fn render_prompt(&self, prompt: &str) -> String {
        self.prompt_template.replace("{prompt}", prompt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_settings_copies_fields() {
        let settings = Settings {
            context_size: 4096,
            gpu_layers: 12,
            threads: Some(4),
            ..Settings::with_defaults()
        };
        let config = LlamaConfig::from_settings(&settings);
        assert_eq!(config.context_size, 4096);
        assert_eq!(config.gpu_layers, 12);
        assert_eq!(config.threads, Some(4));
        assert_eq!(config.sampling, SamplingConfig::default());
    }

    #[test]
    fn test_render_prompt() {
        let config = LlamaConfig::from_settings(&Settings::with_defaults());
        assert_eq!(
            config.render_prompt("Why is the sky blue?"),
            "### User:\nWhy is the sky blue?\n\n### Response:\n"
        );
    }
}
