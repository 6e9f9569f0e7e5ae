//! Caching decorator for catalog providers

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::version::cache::CatalogCache;
use crate::version::catalog::VersionCatalog;
use crate::version::error::CatalogError;
use crate::version::provider::VersionCatalogProvider;

/// Serves a provider's catalog from the cache while it is fresh.
///
/// Stale or missing entries are refetched. When a refetch fails and a stale copy
/// exists, the stale copy is returned instead of the error.
pub struct CachedCatalogProvider<P> {
    inner: P,
    cache: Arc<CatalogCache>,
    offline: bool,
}

impl<P: VersionCatalogProvider> CachedCatalogProvider<P> {
    pub fn new(inner: P, cache: Arc<CatalogCache>) -> Self {
        Self {
            inner,
            cache,
            offline: false,
        }
    }

    /// Never contact the inner provider; serve whatever is cached
    pub fn offline(mut self, offline: bool) -> Self {
        self.offline = offline;
        self
    }
}

#[async_trait::async_trait]
impl<P: VersionCatalogProvider> VersionCatalogProvider for CachedCatalogProvider<P> {
    fn name(&self) -> String {
        self.inner.name()
    }

    async fn fetch_catalog(&self) -> Result<VersionCatalog, CatalogError> {
        let name = self.inner.name();
        let cached = self.cache.get_catalog(&name)?;

        if let Some(cached) = &cached {
            if cached.is_fresh || self.offline {
                debug!(
                    "Using cached catalog for {} ({} versions)",
                    name,
                    cached.catalog.len()
                );
                return Ok(cached.catalog.clone());
            }
        } else if self.offline {
            return Err(CatalogError::NotFound(format!("{} (offline, not cached)", name)));
        }

        match self.inner.fetch_catalog().await {
            Ok(catalog) => {
                info!("Fetched {} versions from {}", catalog.len(), name);
                self.cache.replace_catalog(&name, &catalog)?;
                Ok(catalog)
            }
            Err(e) => match cached {
                Some(stale) => {
                    warn!("Failed to refresh {}, using stale cache: {}", name, e);
                    Ok(stale.catalog)
                }
                None => Err(e),
            },
        }
    }
}
