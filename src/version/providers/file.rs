//! Local catalog file provider
//!
//! The file lists one version per line. Blank lines and lines starting with `#`
//! are ignored. Lines may be in any order; the catalog is sorted on load.

use std::path::PathBuf;

use tracing::debug;

use crate::version::catalog::VersionCatalog;
use crate::version::error::CatalogError;
use crate::version::provider::VersionCatalogProvider;
use crate::version::semver::SemanticVersion;

pub struct FileCatalogProvider {
    path: PathBuf,
}

impl FileCatalogProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

/// Parses catalog file contents
pub fn parse_catalog_list(content: &str) -> Result<VersionCatalog, CatalogError> {
    let mut versions = Vec::new();

    for (line_num, line) in content.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let version = trimmed.parse::<SemanticVersion>().map_err(|e| {
            CatalogError::InvalidResponse(format!("line {}: {}", line_num + 1, e))
        })?;
        versions.push(version);
    }

    Ok(VersionCatalog::from_unsorted(versions))
}

#[async_trait::async_trait]
impl VersionCatalogProvider for FileCatalogProvider {
    fn name(&self) -> String {
        format!("file/{}", self.path.display())
    }

    async fn fetch_catalog(&self) -> Result<VersionCatalog, CatalogError> {
        debug!("Reading catalog from {:?}", self.path);
        let content = tokio::fs::read_to_string(&self.path).await?;
        parse_catalog_list(&content)
    }
}
