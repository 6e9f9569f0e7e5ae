//! Provider trait for fetching the compiler version catalog

#[cfg(test)]
use mockall::automock;

use crate::version::catalog::VersionCatalog;
use crate::version::error::CatalogError;

/// Trait for fetching the list of installable compiler versions
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait VersionCatalogProvider: Send + Sync {
    /// Short name used in logs and as the cache key
    fn name(&self) -> String;

    /// Fetches every known version
    ///
    /// # Returns
    /// * `Ok(VersionCatalog)` - Deduplicated versions, ordered from newest to oldest
    /// * `Err(CatalogError)` - If the fetch fails
    async fn fetch_catalog(&self) -> Result<VersionCatalog, CatalogError>;
}
