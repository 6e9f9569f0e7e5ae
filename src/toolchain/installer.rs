//! Installer trait for compiler toolchains

#[cfg(test)]
use mockall::automock;

use thiserror::Error;

use crate::version::semver::SemanticVersion;

#[derive(Debug, Error)]
pub enum InstallError {
    #[error("Failed to run `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{command}` exited with {status}: {stderr}")]
    CommandFailed {
        command: String,
        status: std::process::ExitStatus,
        stderr: String,
    },

    #[error("Failed to list installed versions: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum ActivateError {
    #[error("Failed to run `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{command}` exited with {status}: {stderr}")]
    CommandFailed {
        command: String,
        status: std::process::ExitStatus,
        stderr: String,
    },
}

/// Trait for installing and switching the active compiler
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait ToolchainInstaller: Send + Sync {
    /// Installs `version` unless it is already present
    async fn ensure_installed(&self, version: &SemanticVersion) -> Result<(), InstallError>;

    /// Makes `version` the active compiler
    async fn activate(&self, version: &SemanticVersion) -> Result<(), ActivateError>;
}
