//! Resolves many source files against a single catalog fetch
//!
//! Files are read and parsed first. The catalog is fetched at most once, and only
//! when some directive needs it, so files without a directive never fail on an
//! unreachable catalog.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tokio::sync::OnceCell;
use tracing::debug;

use crate::pragma::extractor::PragmaExtractor;
use crate::selector::{SelectError, Selection, parse_source};
use crate::version::catalog::VersionCatalog;
use crate::version::provider::VersionCatalogProvider;

#[derive(Debug, Error)]
pub enum FileError {
    #[error("Failed to read file: {0}")]
    Read(#[from] std::io::Error),

    #[error(transparent)]
    Select(#[from] SelectError),

    #[error("Failed to fetch catalog: {0}")]
    Catalog(String),
}

/// Outcome for one file
#[derive(Debug)]
pub struct FileReport {
    pub path: PathBuf,
    pub outcome: Result<Selection, FileError>,
}

impl FileReport {
    pub fn is_missing_directive(&self) -> bool {
        matches!(
            self.outcome,
            Err(FileError::Select(SelectError::NoDirectiveFound))
        )
    }
}

#[derive(Debug)]
pub struct ResolveReport {
    pub files: Vec<FileReport>,
    /// Files without a directive count as failures
    pub strict: bool,
}

impl ResolveReport {
    pub fn failures(&self) -> usize {
        self.files
            .iter()
            .filter(|file| file.outcome.is_err())
            .filter(|file| self.strict || !file.is_missing_directive())
            .count()
    }

    pub fn is_success(&self) -> bool {
        self.failures() == 0
    }
}

/// Resolves every file; failures are recorded per file and never stop the batch
pub async fn resolve_files(
    provider: &dyn VersionCatalogProvider,
    files: &[PathBuf],
    strict: bool,
) -> ResolveReport {
    let extractor = PragmaExtractor::new();
    let catalog = OnceCell::new();
    let mut reports = Vec::with_capacity(files.len());

    for path in files {
        let outcome = resolve_file(&extractor, provider, &catalog, path).await;
        if let Err(e) = &outcome {
            debug!("{}: {}", path.display(), e);
        }
        reports.push(FileReport {
            path: path.clone(),
            outcome,
        });
    }

    ResolveReport {
        files: reports,
        strict,
    }
}

async fn resolve_file(
    extractor: &PragmaExtractor,
    provider: &dyn VersionCatalogProvider,
    catalog: &OnceCell<Result<VersionCatalog, String>>,
    path: &Path,
) -> Result<Selection, FileError> {
    let source = tokio::fs::read_to_string(path).await?;
    let parsed = parse_source(extractor, &source)?;

    if !parsed.needs_catalog() {
        debug!("{}: `{}` resolves without a catalog", path.display(), parsed.clauses);
        return Ok(parsed.resolve(&VersionCatalog::default())?);
    }

    let fetched = catalog
        .get_or_init(|| async move {
            provider
                .fetch_catalog()
                .await
                .map_err(|e| e.to_string())
        })
        .await
        .as_ref()
        .map_err(|e| FileError::Catalog(e.clone()))?;

    Ok(parsed.resolve(fetched)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::version::error::CatalogError;
    use crate::version::provider::MockVersionCatalogProvider;
    use crate::version::semver::SemanticVersion;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    fn failing_provider(times: usize) -> MockVersionCatalogProvider {
        let mut provider = MockVersionCatalogProvider::new();
        provider
            .expect_fetch_catalog()
            .times(times)
            .returning(|| Err(CatalogError::NotFound("offline, not cached".to_string())));
        provider
    }

    #[tokio::test]
    async fn catalog_is_fetched_once_for_many_files() {
        let temp_dir = TempDir::new().unwrap();
        let files = vec![
            write(&temp_dir, "A.sol", "pragma solidity ^0.8.0;"),
            write(&temp_dir, "B.sol", "pragma solidity ~0.7.0;"),
        ];

        let mut provider = MockVersionCatalogProvider::new();
        provider.expect_fetch_catalog().times(1).returning(|| {
            Ok(["0.8.21", "0.7.6"]
                .iter()
                .map(|s| s.parse::<SemanticVersion>().unwrap())
                .collect())
        });

        let report = resolve_files(&provider, &files, false).await;

        assert!(report.is_success());
        let versions: Vec<String> = report
            .files
            .iter()
            .map(|file| file.outcome.as_ref().unwrap().version.to_string())
            .collect();
        assert_eq!(versions, vec!["0.8.21", "0.7.6"]);
    }

    #[tokio::test]
    async fn files_without_directive_skip_catalog_fetch() {
        let temp_dir = TempDir::new().unwrap();
        let files = vec![
            write(&temp_dir, "NoPragma.sol", "contract A {}"),
            write(&temp_dir, "Pinned.sol", "pragma solidity 0.8.4;"),
        ];

        let report = resolve_files(&failing_provider(0), &files, false).await;

        assert!(report.files[0].is_missing_directive());
        assert_eq!(
            report.files[1].outcome.as_ref().unwrap().version.to_string(),
            "0.8.4"
        );
        assert!(report.is_success());
    }

    #[tokio::test]
    async fn catalog_failure_is_recorded_once_per_dependent_file() {
        let temp_dir = TempDir::new().unwrap();
        let files = vec![
            write(&temp_dir, "A.sol", "pragma solidity ^0.8.0;"),
            write(&temp_dir, "B.sol", "pragma solidity >0.7.0;"),
        ];

        let report = resolve_files(&failing_provider(1), &files, false).await;

        assert_eq!(report.failures(), 2);
        assert!(
            report
                .files
                .iter()
                .all(|file| matches!(file.outcome, Err(FileError::Catalog(_))))
        );
    }

    #[tokio::test]
    async fn unreadable_file_is_a_failure() {
        let temp_dir = TempDir::new().unwrap();
        let files = vec![temp_dir.path().join("Missing.sol")];

        let report = resolve_files(&failing_provider(0), &files, false).await;

        assert!(matches!(report.files[0].outcome, Err(FileError::Read(_))));
        assert_eq!(report.failures(), 1);
    }
}
