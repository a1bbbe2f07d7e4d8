//! Model file resolution with download-and-cache on first use.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::Client;
use tokio::fs::{self, File};
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};

use localchat_core::ModelCandidate;
use localchat_core::ports::{FetchError, ModelFetcherPort};

/// Resolves candidates against a models directory, downloading missing files
/// from `base_url` when one is configured.
#[derive(Debug, Clone)]
pub struct HttpModelFetcher {
    client: Client,
    models_dir: PathBuf,
    base_url: Option<String>,
}

impl HttpModelFetcher {
    /// Create a fetcher. `base_url: None` disables downloads.
    pub fn new(models_dir: impl Into<PathBuf>, base_url: Option<String>) -> Self {
        Self {
            client: Client::new(),
            models_dir: models_dir.into(),
            base_url: base_url.map(|u| u.trim_end_matches('/').to_string()),
        }
    }

    fn cached_path(&self, candidate: &ModelCandidate) -> PathBuf {
        self.models_dir.join(candidate.file_name())
    }

    async fn download(&self, url: &str, dest: &Path) -> Result<(), FetchError> {
        fs::create_dir_all(&self.models_dir)
            .await
            .map_err(|e| FetchError::Io(format!("{}: {e}", self.models_dir.display())))?;

        let part = dest.with_extension("gguf.part");
        let result = self.stream_to(url, &part).await;

        match result {
            Ok(()) => fs::rename(&part, dest)
                .await
                .map_err(|e| FetchError::Io(format!("{}: {e}", dest.display()))),
            Err(e) => {
                if let Err(rm) = fs::remove_file(&part).await {
                    debug!(path = %part.display(), error = %rm, "No partial download to clean up");
                }
                Err(e)
            }
        }
    }

    async fn stream_to(&self, url: &str, part: &Path) -> Result<(), FetchError> {
        let response = self
            .client
            .get(url)
            .header("User-Agent", "localchat")
            .send()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            return Err(FetchError::HttpStatus {
                url: url.to_string(),
                status: response.status().as_u16(),
            });
        }

        let total_size = response.content_length().unwrap_or(0);
        let mut file = File::create(part)
            .await
            .map_err(|e| FetchError::Io(format!("{}: {e}", part.display())))?;

        let mut downloaded: u64 = 0;
        let mut last_logged_pct = 0;
        let mut stream = response.bytes_stream();

        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| FetchError::Transport(e.to_string()))?;
            file.write_all(&chunk)
                .await
                .map_err(|e| FetchError::Io(e.to_string()))?;
            downloaded += chunk.len() as u64;

            if total_size > 0 {
                let pct = downloaded * 100 / total_size;
                if pct >= last_logged_pct + 10 {
                    last_logged_pct = pct - pct % 10;
                    info!(url, downloaded, total_size, "Download {pct}% complete");
                }
            }
        }

        file.flush()
            .await
            .map_err(|e| FetchError::Io(e.to_string()))?;
        Ok(())
    }
}

#[async_trait]
impl ModelFetcherPort for HttpModelFetcher {
    async fn fetch(&self, candidate: &ModelCandidate) -> Result<PathBuf, FetchError> {
        if candidate.is_path() {
            let path = PathBuf::from(candidate.id());
            return if fs::metadata(&path).await.is_ok_and(|m| m.is_file()) {
                Ok(path)
            } else {
                Err(FetchError::NotFound(candidate.id().to_string()))
            };
        }

        let dest = self.cached_path(candidate);
        if fs::metadata(&dest).await.is_ok_and(|m| m.is_file()) {
            debug!(path = %dest.display(), "Using cached model file");
            return Ok(dest);
        }

        let Some(base_url) = self.base_url.as_deref() else {
            return Err(FetchError::NotFound(format!(
                "{} (not in {}, downloads disabled)",
                candidate,
                self.models_dir.display()
            )));
        };

        if !candidate.is_downloadable() {
            warn!(candidate = %candidate, "Refusing to download candidate with unsafe name");
            return Err(FetchError::NotFound(candidate.id().to_string()));
        }

        let url = format!("{base_url}/{}", candidate.file_name());
        info!(url = %url, dest = %dest.display(), "Downloading model (first run)");
        self.download(&url, &dest).await?;
        info!(path = %dest.display(), "Model download complete");
        Ok(dest)
    }
}
