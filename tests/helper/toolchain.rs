//! Catalog and installer test doubles

use std::sync::Mutex;

use async_trait::async_trait;

use solc_pragma::toolchain::installer::{ActivateError, InstallError, ToolchainInstaller};
use solc_pragma::version::catalog::VersionCatalog;
use solc_pragma::version::error::CatalogError;
use solc_pragma::version::provider::VersionCatalogProvider;
use solc_pragma::version::semver::SemanticVersion;

/// Builds a catalog from newest-first version strings
pub fn catalog(versions: &[&str]) -> VersionCatalog {
    versions
        .iter()
        .map(|v| v.parse::<SemanticVersion>().unwrap())
        .collect()
}

/// Provider returning a fixed catalog
pub struct StaticCatalogProvider {
    catalog: VersionCatalog,
}

impl StaticCatalogProvider {
    pub fn new(versions: &[&str]) -> Self {
        Self {
            catalog: catalog(versions),
        }
    }
}

#[async_trait]
impl VersionCatalogProvider for StaticCatalogProvider {
    fn name(&self) -> String {
        "static".to_string()
    }

    async fn fetch_catalog(&self) -> Result<VersionCatalog, CatalogError> {
        Ok(self.catalog.clone())
    }
}

/// Provider that always fails, counting fetch attempts
#[derive(Default)]
pub struct UnavailableCatalogProvider {
    fetches: Mutex<usize>,
}

impl UnavailableCatalogProvider {
    pub fn fetches(&self) -> usize {
        *self.fetches.lock().unwrap()
    }
}

#[async_trait]
impl VersionCatalogProvider for UnavailableCatalogProvider {
    fn name(&self) -> String {
        "unavailable".to_string()
    }

    async fn fetch_catalog(&self) -> Result<VersionCatalog, CatalogError> {
        *self.fetches.lock().unwrap() += 1;
        Err(CatalogError::NotFound("offline, not cached".to_string()))
    }
}

/// Installer recording every call in order
#[derive(Default)]
pub struct RecordingInstaller {
    calls: Mutex<Vec<String>>,
}

impl RecordingInstaller {
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ToolchainInstaller for RecordingInstaller {
    async fn ensure_installed(&self, version: &SemanticVersion) -> Result<(), InstallError> {
        self.calls.lock().unwrap().push(format!("install {}", version));
        Ok(())
    }

    async fn activate(&self, version: &SemanticVersion) -> Result<(), ActivateError> {
        self.calls.lock().unwrap().push(format!("use {}", version));
        Ok(())
    }
}
