//! Axum server bootstrap - the composition root.
//!
//! This module is the only place where the inference backend, the model
//! fetcher and the chat service are wired together for the HTTP adapter.

use std::sync::Arc;

use anyhow::Result;
use localchat_core::ports::ModelFetcherPort;
use localchat_core::{
    ChatService, CoreError, LoadOutcome, Settings, resolve_models_dir, validate_settings,
};
use localchat_runtime::{HttpModelFetcher, LlamaConfig, build_backend, inference_compiled_in};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::routes::create_router;

/// CORS configuration for the web server.
#[derive(Debug, Clone, Default)]
pub enum CorsConfig {
    /// Allow all origins.
    #[default]
    AllowAll,
    /// Allow specific origins.
    AllowOrigins(Vec<String>),
}

/// Server configuration for the Axum adapter.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind.
    pub host: String,
    /// Port for the HTTP server.
    pub port: u16,
    /// Bind before the model has loaded instead of after.
    pub background_load: bool,
    /// CORS configuration.
    pub cors: CorsConfig,
}

impl ServerConfig {
    pub fn from_settings(settings: &Settings) -> Self {
        let config = Self {
            host: settings.host.clone(),
            port: settings.port,
            background_load: settings.background_load,
            cors: CorsConfig::default(),
        };
        if settings.allowed_origins.is_empty() {
            config
        } else {
            config.with_allowed_origins(settings.allowed_origins.clone())
        }
    }

    /// Set CORS to allow specific origins.
    #[must_use]
    pub fn with_allowed_origins(mut self, origins: Vec<String>) -> Self {
        self.cors = CorsConfig::AllowOrigins(origins);
        self
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Application context for the Axum adapter.
pub struct AxumContext {
    /// The chat service (model lifecycle and generation).
    pub chat: Arc<ChatService>,
}

impl AxumContext {
    pub const fn new(chat: Arc<ChatService>) -> Self {
        Self { chat }
    }
}

/// Validate settings and build the chat service.
///
/// The returned service is still `Loading`; [`start_server`] starts the load.
pub fn bootstrap(settings: &Settings) -> Result<AxumContext, CoreError> {
    validate_settings(settings)?;
    let models = resolve_models_dir(settings.models_dir.as_deref())?;

    info!(
        target: "localchat.paths",
        models_dir = %models.path.display(),
        models_source = ?models.source,
        downloads = settings.download_base_url.is_some(),
        inference = inference_compiled_in(),
        "Axum bootstrap resolved paths"
    );

    let fetcher: Arc<dyn ModelFetcherPort> = Arc::new(HttpModelFetcher::new(
        models.path,
        settings.download_base_url.clone(),
    ));
    let backend = build_backend(LlamaConfig::from_settings(settings), fetcher);

    let chat = ChatService::new(
        backend,
        settings.candidates.clone(),
        settings.model_label.clone(),
        settings.token_limits(),
    );

    Ok(AxumContext::new(Arc::new(chat)))
}

fn report_load(outcome: &LoadOutcome) {
    match outcome {
        LoadOutcome::Loaded { candidate, failures } => {
            info!(
                candidate = %candidate,
                skipped = failures.len(),
                "Model ready"
            );
        }
        LoadOutcome::Exhausted { failures } => {
            warn!(
                attempted = failures.len(),
                "No model could be loaded; /chat will answer 503"
            );
        }
    }
}

/// Serve on a pre-bound listener until `cancel` fires.
pub async fn serve(
    listener: TcpListener,
    ctx: AxumContext,
    cors: &CorsConfig,
    cancel: CancellationToken,
) -> Result<()> {
    let addr = listener.local_addr()?;
    let app = create_router(ctx, cors);

    info!("localchat server listening on http://{addr}");
    info!("Endpoints: GET /status, POST /chat");

    axum::serve(listener, app)
        .with_graceful_shutdown(cancel.cancelled_owned())
        .await?;

    info!("localchat server shut down");
    Ok(())
}

/// Bootstrap, load the model and serve until `cancel` fires.
///
/// The model is loaded before the port is bound, so the first request
/// already sees a settled state. With `background_load` the port is bound
/// immediately and `/chat` answers 503 until loading settles.
pub async fn start_server(settings: Settings, cancel: CancellationToken) -> Result<()> {
    let config = ServerConfig::from_settings(&settings);
    let ctx = bootstrap(&settings)?;

    let chat = Arc::clone(&ctx.chat);
    if config.background_load {
        tokio::spawn(async move {
            report_load(&chat.load_model().await);
        });
    } else {
        report_load(&chat.load_model().await);
    }

    let listener = TcpListener::bind(config.addr()).await?;
    serve(listener, ctx, &config.cors, cancel).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_config_from_settings() {
        let settings = Settings {
            host: "127.0.0.1".into(),
            port: 8123,
            background_load: true,
            ..Settings::with_defaults()
        };
        let config = ServerConfig::from_settings(&settings);
        assert_eq!(config.addr(), "127.0.0.1:8123");
        assert!(config.background_load);
        assert!(matches!(config.cors, CorsConfig::AllowAll));
    }

    #[test]
    fn test_allowed_origins_restrict_cors() {
        let settings = Settings {
            allowed_origins: vec!["http://localhost:5173".into()],
            ..Settings::with_defaults()
        };
        let config = ServerConfig::from_settings(&settings);
        assert!(matches!(
            config.cors,
            CorsConfig::AllowOrigins(ref origins) if origins == &["http://localhost:5173"]
        ));
    }

    #[test]
    fn test_bootstrap_starts_in_loading_state() {
        let dir = std::env::temp_dir().join("localchat-bootstrap-test");
        let settings = Settings {
            models_dir: Some(dir.to_string_lossy().into_owned()),
            download_base_url: None,
            ..Settings::with_defaults()
        };
        let ctx = bootstrap(&settings).unwrap();
        let status = ctx.chat.status();
        assert!(status.loading);
        assert!(!status.ready);
    }

    #[test]
    fn test_bootstrap_rejects_invalid_settings() {
        let settings = Settings {
            port: 80,
            ..Settings::with_defaults()
        };
        assert!(matches!(
            bootstrap(&settings),
            Err(CoreError::Settings(_))
        ));
    }
}
