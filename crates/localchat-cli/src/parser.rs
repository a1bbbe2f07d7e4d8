//! Command-line parser.
//!
//! Every flag can also be set through a `LOCALCHAT_*` environment variable
//! (or a `.env` file). Flags left unset keep the defaults from [`Settings`].

use clap::Parser;
use localchat_core::{CandidateList, Settings};

/// Local LLM chat server exposing `GET /status` and `POST /chat`.
#[derive(Debug, Parser)]
#[command(name = "localchat")]
#[command(about = "Serve a local GGUF model over a small JSON HTTP API")]
#[command(version)]
pub struct Cli {
    /// Address to bind
    #[arg(long, env = "LOCALCHAT_HOST")]
    pub host: Option<String>,

    /// Port to listen on
    #[arg(short, long, env = "LOCALCHAT_PORT")]
    pub port: Option<u16>,

    /// Model candidates to try in order (file names or paths, comma-separated)
    #[arg(long, env = "LOCALCHAT_CANDIDATES", value_delimiter = ',')]
    pub candidates: Vec<String>,

    /// Directory holding model files (also read from LOCALCHAT_MODELS_DIR)
    #[arg(long = "models-dir")]
    pub models_dir: Option<String>,

    /// Base URL to download missing models from
    #[arg(long = "download-url", env = "LOCALCHAT_DOWNLOAD_URL")]
    pub download_url: Option<String>,

    /// Never download models; only use files already on disk
    #[arg(long = "no-download", env = "LOCALCHAT_NO_DOWNLOAD")]
    pub no_download: bool,

    /// Model name reported to clients
    #[arg(long = "model-label", env = "LOCALCHAT_MODEL_LABEL")]
    pub model_label: Option<String>,

    /// Token budget when a request omits maxTokens
    #[arg(long = "max-tokens", env = "LOCALCHAT_MAX_TOKENS")]
    pub max_tokens: Option<u32>,

    /// Largest maxTokens a request may ask for
    #[arg(long = "max-tokens-limit", env = "LOCALCHAT_MAX_TOKENS_LIMIT")]
    pub max_tokens_limit: Option<u32>,

    /// Context window per generation
    #[arg(long = "ctx-size", env = "LOCALCHAT_CONTEXT_SIZE")]
    pub context_size: Option<u32>,

    /// Layers to offload to the GPU
    #[arg(long = "gpu-layers", env = "LOCALCHAT_GPU_LAYERS")]
    pub gpu_layers: Option<u32>,

    /// Inference threads (default: chosen by llama.cpp)
    #[arg(long, env = "LOCALCHAT_THREADS")]
    pub threads: Option<u32>,

    /// Restrict CORS to these origins (comma-separated; default: any origin)
    #[arg(long = "allowed-origin", env = "LOCALCHAT_ALLOWED_ORIGINS", value_delimiter = ',')]
    pub allowed_origins: Vec<String>,

    /// Start listening immediately and load the model in the background
    #[arg(long = "background-load", env = "LOCALCHAT_BACKGROUND_LOAD")]
    pub background_load: bool,

    /// Enable verbose/debug output
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

impl Cli {
    /// Overlay the parsed flags on the default settings.
    pub fn into_settings(self) -> Settings {
        let mut settings = Settings::with_defaults();

        if let Some(host) = self.host {
            settings.host = host;
        }
        if let Some(port) = self.port {
            settings.port = port;
        }
        if !self.candidates.is_empty() {
            settings.candidates = CandidateList::new(self.candidates);
        }
        if let Some(label) = self.model_label {
            settings.model_label = label;
        }
        if let Some(n) = self.max_tokens {
            settings.default_max_tokens = n;
        }
        if let Some(n) = self.max_tokens_limit {
            settings.max_tokens_limit = n;
        }
        if let Some(n) = self.context_size {
            settings.context_size = n;
        }
        if let Some(n) = self.gpu_layers {
            settings.gpu_layers = n;
        }

        settings.threads = self.threads.or(settings.threads);
        settings.models_dir = self.models_dir;
        if self.no_download {
            settings.download_base_url = None;
        } else if let Some(url) = self.download_url {
            settings.download_base_url = Some(url);
        }
        settings.allowed_origins = self.allowed_origins;
        settings.background_load = self.background_load;

        settings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use localchat_core::{DEFAULT_DOWNLOAD_BASE_URL, DEFAULT_PORT};

    #[test]
    fn test_cli_parser_builds() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_no_flags_keep_defaults() {
        let settings = Cli::parse_from(["localchat"]).into_settings();
        assert_eq!(settings.port, DEFAULT_PORT);
        assert_eq!(settings.candidates.len(), 3);
        assert_eq!(
            settings.download_base_url.as_deref(),
            Some(DEFAULT_DOWNLOAD_BASE_URL)
        );
        assert!(settings.allowed_origins.is_empty());
        assert!(!settings.background_load);
    }

    #[test]
    fn test_flags_override_settings() {
        let cli = Cli::parse_from([
            "localchat",
            "--port",
            "9001",
            "--candidates",
            "a.gguf, /models/b.gguf",
            "--models-dir",
            "/tmp/models",
            "--max-tokens",
            "64",
            "--background-load",
            "-v",
        ]);
        assert!(cli.verbose);

        let settings = cli.into_settings();
        assert_eq!(settings.port, 9001);
        assert_eq!(
            settings.candidates,
            CandidateList::new(["a.gguf", "/models/b.gguf"])
        );
        assert_eq!(settings.models_dir.as_deref(), Some("/tmp/models"));
        assert_eq!(settings.default_max_tokens, 64);
        assert!(settings.background_load);
    }

    #[test]
    fn test_no_download_wins_over_url() {
        let settings = Cli::parse_from([
            "localchat",
            "--download-url",
            "https://mirror.example/models",
            "--no-download",
        ])
        .into_settings();
        assert_eq!(settings.download_base_url, None);
    }

    #[test]
    fn test_allowed_origins_are_split() {
        let settings = Cli::parse_from([
            "localchat",
            "--allowed-origin",
            "http://localhost:5173,http://127.0.0.1:5173",
        ])
        .into_settings();
        assert_eq!(
            settings.allowed_origins,
            vec!["http://localhost:5173", "http://127.0.0.1:5173"]
        );
    }
}
