//! CLI-specific error types and exit codes.

use localchat_core::SettingsError;
use thiserror::Error;

/// CLI-specific error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Settings failed validation.
    #[error("Configuration error: {0}")]
    Config(#[from] SettingsError),

    /// The server could not start or stopped with an error.
    #[error("Server error: {0:#}")]
    Server(anyhow::Error),
}

impl CliError {
    /// Map error to an exit code (sysexits.h where one fits).
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) => 78, // EX_CONFIG
            Self::Server(_) => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        let config = CliError::from(SettingsError::NoCandidates);
        assert_eq!(config.exit_code(), 78);

        let server = CliError::Server(anyhow::anyhow!("address in use"));
        assert_eq!(server.exit_code(), 1);
        assert_eq!(server.to_string(), "Server error: address in use");
    }
}
