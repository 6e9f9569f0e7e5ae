use thiserror::Error;

use crate::version::semver::SemanticVersion;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Cache lock poisoned")]
    LockPoisoned,
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Rate limited: retry after {retry_after_secs:?} seconds")]
    RateLimited { retry_after_secs: Option<u64> },

    #[error("Catalog not found: {0}")]
    NotFound(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Failed to read catalog: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Cache(#[from] CacheError),
}

/// Why no version could be selected for an operative clause
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolutionError {
    #[error("version {0} is not in the catalog")]
    VersionNotInCatalog(SemanticVersion),

    #[error("no version older than {0} in the catalog")]
    NoOlderVersion(SemanticVersion),

    #[error("no version newer than {0} in the catalog")]
    NoNewerVersion(SemanticVersion),

    #[error("no version on the {major}.{minor} line in the catalog")]
    NoMatchingMinorLine { major: u64, minor: u64 },
}
