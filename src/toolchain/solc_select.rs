//! `solc-select` backed installer
//!
//! Installed compilers are detected from files named `solc-v{version}` in the
//! binaries directory; installation and activation are delegated to the
//! `solc-select` program.

use std::path::{Path, PathBuf};
use std::process::Output;

use tokio::process::Command;
use tracing::{debug, info};

use crate::toolchain::installer::{ActivateError, InstallError, ToolchainInstaller};
use crate::version::semver::SemanticVersion;

/// Default program used to install and switch compilers
pub const DEFAULT_PROGRAM: &str = "solc-select";

const BINARY_PREFIX: &str = "solc-v";

pub struct SolcSelectInstaller {
    binary_dir: PathBuf,
    program: String,
}

impl SolcSelectInstaller {
    pub fn new(binary_dir: impl Into<PathBuf>, program: impl Into<String>) -> Self {
        Self {
            binary_dir: binary_dir.into(),
            program: program.into(),
        }
    }

    fn command_line(&self, args: &[&str]) -> String {
        std::iter::once(self.program.as_str())
            .chain(args.iter().copied())
            .collect::<Vec<_>>()
            .join(" ")
    }

    async fn run(&self, args: &[&str]) -> std::io::Result<Output> {
        debug!("Running {}", self.command_line(args));
        Command::new(&self.program).args(args).output().await
    }
}

/// Lists installed compiler versions, newest first.
///
/// A missing directory means nothing is installed.
pub fn installed_versions(binary_dir: &Path) -> std::io::Result<Vec<semver::Version>> {
    let entries = match std::fs::read_dir(binary_dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e),
    };

    let mut versions = Vec::new();
    for entry in entries {
        let name = entry?.file_name();
        let Some(name) = name.to_str() else {
            continue;
        };
        let Some(version) = name.strip_prefix(BINARY_PREFIX) else {
            continue;
        };
        let version = version.strip_suffix(".exe").unwrap_or(version);
        if let Ok(parsed) = version.parse::<SemanticVersion>() {
            versions.push(semver::Version::from(parsed));
        }
    }

    versions.sort_unstable_by(|a, b| b.cmp(a));
    versions.dedup();
    Ok(versions)
}

#[async_trait::async_trait]
impl ToolchainInstaller for SolcSelectInstaller {
    async fn ensure_installed(&self, version: &SemanticVersion) -> Result<(), InstallError> {
        let wanted = semver::Version::from(*version);
        if installed_versions(&self.binary_dir)?.contains(&wanted) {
            info!("solc {} is already installed", version);
            return Ok(());
        }

        info!("Installing solc {}", wanted);
        let version_arg = wanted.to_string();
        let args = ["install", version_arg.as_str()];
        let command = self.command_line(&args);

        let output = self
            .run(&args)
            .await
            .map_err(|source| InstallError::Spawn {
                command: command.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(InstallError::CommandFailed {
                command,
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        info!("solc {} installed successfully", version);
        Ok(())
    }

    async fn activate(&self, version: &SemanticVersion) -> Result<(), ActivateError> {
        let version_arg = semver::Version::from(*version).to_string();
        let args = ["use", version_arg.as_str()];
        let command = self.command_line(&args);

        let output = self
            .run(&args)
            .await
            .map_err(|source| ActivateError::Spawn {
                command: command.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(ActivateError::CommandFailed {
                command,
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        info!("Set solc {}", version);
        Ok(())
    }
}
