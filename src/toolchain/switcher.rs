//! Switches the active compiler to the version a source file asks for
//!
//! Groups the catalog provider and installer with the pragma extractor:
//! parse the directive, fetch the catalog if the directive needs it, select
//! a version, install, activate.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info};

use crate::pragma::extractor::PragmaExtractor;
use crate::selector::{SelectError, Selection, parse_source};
use crate::toolchain::installer::{ActivateError, InstallError, ToolchainInstaller};
use crate::version::catalog::VersionCatalog;
use crate::version::error::CatalogError;
use crate::version::provider::VersionCatalogProvider;

#[derive(Debug, Error)]
pub enum SwitchError {
    #[error("Failed to fetch catalog: {0}")]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Select(#[from] SelectError),

    #[error("Failed to install solc: {0}")]
    Install(#[from] InstallError),

    #[error("Failed to activate solc: {0}")]
    Activate(#[from] ActivateError),
}

pub struct ToolchainSwitcher {
    extractor: PragmaExtractor,
    provider: Arc<dyn VersionCatalogProvider>,
    installer: Arc<dyn ToolchainInstaller>,
}

impl ToolchainSwitcher {
    pub fn new(
        provider: Arc<dyn VersionCatalogProvider>,
        installer: Arc<dyn ToolchainInstaller>,
    ) -> Self {
        Self {
            extractor: PragmaExtractor::new(),
            provider,
            installer,
        }
    }

    /// Resolves the version for `source` without installing anything
    pub async fn select(&self, source: &str) -> Result<Selection, SwitchError> {
        let parsed = parse_source(&self.extractor, source)?;

        let catalog = if parsed.needs_catalog() {
            self.provider.fetch_catalog().await?
        } else {
            debug!("`{}` resolves without a catalog", parsed.clauses);
            VersionCatalog::default()
        };

        Ok(parsed.resolve(&catalog)?)
    }

    /// Resolves, installs and activates the version for `source`
    pub async fn switch(&self, source: &str) -> Result<Selection, SwitchError> {
        let selection = self.select(source).await?;
        info!(
            "pragma solidity {} resolved to {}",
            selection.clauses, selection.version
        );

        self.installer.ensure_installed(&selection.version).await?;
        self.installer.activate(&selection.version).await?;

        Ok(selection)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::toolchain::installer::MockToolchainInstaller;
    use crate::version::provider::MockVersionCatalogProvider;
    use crate::version::semver::SemanticVersion;
    use mockall::Sequence;
    use mockall::predicate::eq;

    fn v(s: &str) -> SemanticVersion {
        s.parse().unwrap()
    }

    fn provider_with(versions: &'static [&'static str]) -> MockVersionCatalogProvider {
        let mut provider = MockVersionCatalogProvider::new();
        provider
            .expect_name()
            .returning(|| "test".to_string());
        provider
            .expect_fetch_catalog()
            .returning(move || Ok(versions.iter().map(|s| v(s)).collect::<VersionCatalog>()));
        provider
    }

    #[tokio::test]
    async fn switch_installs_then_activates_resolved_version() {
        let provider = provider_with(&["0.8.21", "0.8.20", "0.7.6"]);

        let mut installer = MockToolchainInstaller::new();
        let mut seq = Sequence::new();
        installer
            .expect_ensure_installed()
            .with(eq(v("0.8.21")))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));
        installer
            .expect_activate()
            .with(eq(v("0.8.21")))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));

        let switcher = ToolchainSwitcher::new(Arc::new(provider), Arc::new(installer));
        let selection = switcher.switch("pragma solidity ^0.8.0;").await.unwrap();

        assert_eq!(selection.version, v("0.8.21"));
    }

    #[tokio::test]
    async fn switch_does_not_install_without_directive() {
        let provider = provider_with(&["0.8.21"]);
        let mut installer = MockToolchainInstaller::new();
        installer.expect_ensure_installed().never();
        installer.expect_activate().never();

        let switcher = ToolchainSwitcher::new(Arc::new(provider), Arc::new(installer));
        let result = switcher.switch("contract A {}").await;

        assert!(matches!(
            result,
            Err(SwitchError::Select(SelectError::NoDirectiveFound))
        ));
    }

    #[tokio::test]
    async fn switch_stops_when_install_fails() {
        let provider = provider_with(&["0.8.21"]);
        let mut installer = MockToolchainInstaller::new();
        installer.expect_ensure_installed().returning(|_| {
            Err(InstallError::Io(std::io::Error::other("disk full")))
        });
        installer.expect_activate().never();

        let switcher = ToolchainSwitcher::new(Arc::new(provider), Arc::new(installer));
        let result = switcher.switch("pragma solidity 0.8.21;").await;

        assert!(matches!(result, Err(SwitchError::Install(_))));
    }

    #[tokio::test]
    async fn select_propagates_catalog_errors() {
        let mut provider = MockVersionCatalogProvider::new();
        provider
            .expect_fetch_catalog()
            .returning(|| Err(CatalogError::NotFound("linux-amd64".to_string())));
        let installer = MockToolchainInstaller::new();

        let switcher = ToolchainSwitcher::new(Arc::new(provider), Arc::new(installer));

        assert!(matches!(
            switcher.select("pragma solidity ^0.8.0;").await,
            Err(SwitchError::Catalog(CatalogError::NotFound(_)))
        ));
    }

    fn unreachable_provider() -> MockVersionCatalogProvider {
        let mut provider = MockVersionCatalogProvider::new();
        provider
            .expect_fetch_catalog()
            .returning(|| Err(CatalogError::NotFound("offline, not cached".to_string())));
        provider
    }

    #[tokio::test]
    async fn missing_directive_is_reported_before_catalog_fetch() {
        let mut installer = MockToolchainInstaller::new();
        installer.expect_ensure_installed().never();

        let switcher = ToolchainSwitcher::new(Arc::new(unreachable_provider()), Arc::new(installer));
        let result = switcher.switch("contract NoPragma {}").await;

        assert!(matches!(
            result,
            Err(SwitchError::Select(SelectError::NoDirectiveFound))
        ));
    }

    #[tokio::test]
    async fn parse_error_is_reported_before_catalog_fetch() {
        let switcher = ToolchainSwitcher::new(
            Arc::new(unreachable_provider()),
            Arc::new(MockToolchainInstaller::new()),
        );

        assert!(matches!(
            switcher.select("pragma solidity || 0.8.0;").await,
            Err(SwitchError::Select(SelectError::Parse { .. }))
        ));
    }

    #[tokio::test]
    async fn literal_pragma_does_not_fetch_catalog() {
        let mut provider = MockVersionCatalogProvider::new();
        provider.expect_fetch_catalog().never();

        let switcher =
            ToolchainSwitcher::new(Arc::new(provider), Arc::new(MockToolchainInstaller::new()));
        let selection = switcher.select("pragma solidity >=0.5.0 <0.6.0;").await.unwrap();

        assert_eq!(selection.version, v("0.5.0"));
    }
}
