//! Where model files live on disk.

use std::env;
use std::path::PathBuf;

use thiserror::Error;

const MODELS_DIR_ENV: &str = "LOCALCHAT_MODELS_DIR";

#[derive(Debug, Error)]
pub enum PathError {
    #[error("Cannot determine home directory")]
    NoHomeDir,

    #[error("Cannot determine system data directory")]
    NoDataDir,

    #[error("Path cannot be empty")]
    EmptyPath,
}

/// Which input the models directory came from. Logged at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelsDirSource {
    Explicit,
    EnvVar,
    Default,
}

#[derive(Debug, Clone)]
pub struct ModelsDirResolution {
    pub path: PathBuf,
    pub source: ModelsDirSource,
}

/// Pick the models directory: `explicit`, then `LOCALCHAT_MODELS_DIR`
/// (ignored when blank), then `<data_dir>/localchat/models`.
pub fn resolve_models_dir(explicit: Option<&str>) -> Result<ModelsDirResolution, PathError> {
    let from_env = env::var(MODELS_DIR_ENV)
        .ok()
        .filter(|value| !value.trim().is_empty());

    let (path, source) = match (explicit, from_env) {
        (Some(raw), _) => (normalize_user_path(raw)?, ModelsDirSource::Explicit),
        (None, Some(raw)) => (normalize_user_path(&raw)?, ModelsDirSource::EnvVar),
        (None, None) => {
            let data = dirs::data_dir().ok_or(PathError::NoDataDir)?;
            (data.join("localchat").join("models"), ModelsDirSource::Default)
        }
    };

    Ok(ModelsDirResolution { path, source })
}

fn normalize_user_path(raw: &str) -> Result<PathBuf, PathError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(PathError::EmptyPath);
    }

    match raw.strip_prefix('~') {
        Some("") => dirs::home_dir().ok_or(PathError::NoHomeDir),
        Some(rest) if rest.starts_with('/') => {
            let home = dirs::home_dir().ok_or(PathError::NoHomeDir)?;
            Ok(home.join(rest.trim_start_matches('/')))
        }
        _ => Ok(PathBuf::from(raw)),
    }
}

#[cfg(test)]
#[allow(unsafe_code)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_dir_wins() {
        let resolved = resolve_models_dir(Some(" /srv/models ")).unwrap();
        assert_eq!(resolved.source, ModelsDirSource::Explicit);
        assert_eq!(resolved.path, PathBuf::from("/srv/models"));
    }

    #[test]
    fn test_blank_explicit_dir_rejected() {
        assert!(matches!(
            resolve_models_dir(Some("   ")),
            Err(PathError::EmptyPath)
        ));
    }

    #[test]
    fn test_home_prefix_expanded() {
        let Some(home) = dirs::home_dir() else {
            return;
        };
        assert_eq!(normalize_user_path("~").unwrap(), home);
        assert_eq!(
            normalize_user_path("~/models").unwrap(),
            home.join("models")
        );
        assert_eq!(
            normalize_user_path("~other/models").unwrap(),
            PathBuf::from("~other/models")
        );
    }

    #[test]
    fn test_env_dir_used_without_explicit() {
        let previous = env::var(MODELS_DIR_ENV).ok();
        unsafe { env::set_var(MODELS_DIR_ENV, "/tmp/from-env") };

        let resolved = resolve_models_dir(None).unwrap();
        assert_eq!(resolved.source, ModelsDirSource::EnvVar);
        assert_eq!(resolved.path, PathBuf::from("/tmp/from-env"));

        match previous {
            Some(value) => unsafe { env::set_var(MODELS_DIR_ENV, value) },
            None => unsafe { env::remove_var(MODELS_DIR_ENV) },
        }
    }
}
