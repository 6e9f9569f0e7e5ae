//! solc binaries server (`list.json`) catalog provider

use std::collections::HashMap;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::version::catalog::VersionCatalog;
use crate::version::error::CatalogError;
use crate::version::provider::VersionCatalogProvider;
use crate::version::semver::SemanticVersion;

/// Default base URL for the solc binaries server
pub const DEFAULT_BASE_URL: &str = "https://binaries.soliditylang.org";

/// Response from `{platform}/list.json`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListResponse {
    /// Version to binary file name, e.g. `"0.8.21": "solc-linux-amd64-v0.8.21+commit.d9974bed"`
    releases: HashMap<String, String>,
    #[serde(default)]
    latest_release: Option<String>,
}

/// Catalog provider backed by the official solc binaries listing
pub struct BinariesCatalogProvider {
    client: reqwest::Client,
    base_url: String,
    platform: String,
}

impl BinariesCatalogProvider {
    /// Creates a provider for one platform directory (e.g. `linux-amd64`)
    pub fn new(base_url: &str, platform: &str) -> Self {
        Self {
            client: reqwest::Client::builder()
                .user_agent("solc-pragma")
                .build()
                .expect("Failed to create HTTP client"),
            base_url: base_url.trim_end_matches('/').to_string(),
            platform: platform.to_string(),
        }
    }
}

#[async_trait::async_trait]
impl VersionCatalogProvider for BinariesCatalogProvider {
    fn name(&self) -> String {
        format!("binaries/{}", self.platform)
    }

    async fn fetch_catalog(&self) -> Result<VersionCatalog, CatalogError> {
        let url = format!("{}/{}/list.json", self.base_url, self.platform);
        debug!("Fetching solc release list from {}", url);

        let response = self.client.get(&url).send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(CatalogError::NotFound(self.platform.clone()));
        }

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse().ok());
            return Err(CatalogError::RateLimited {
                retry_after_secs: retry_after,
            });
        }

        if !status.is_success() {
            warn!("Binaries server returned status {}: {}", status, url);
            return Err(CatalogError::InvalidResponse(format!(
                "Unexpected status: {}",
                status
            )));
        }

        let list: ListResponse = response.json().await.map_err(|e| {
            warn!("Failed to parse release list: {}", e);
            CatalogError::InvalidResponse(e.to_string())
        })?;

        let versions = list
            .releases
            .keys()
            .filter_map(|key| {
                key.parse::<SemanticVersion>()
                    .inspect_err(|e| warn!("Skipping release {:?}: {}", key, e))
                    .ok()
            })
            .collect();

        let catalog = VersionCatalog::from_unsorted(versions);
        debug!(
            "Fetched {} releases for {} (latest: {:?})",
            catalog.len(),
            self.platform,
            list.latest_release
        );

        Ok(catalog)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Server;

    fn v(s: &str) -> SemanticVersion {
        s.parse().unwrap()
    }

    #[tokio::test]
    async fn fetch_catalog_returns_releases_sorted_newest_first() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", "/linux-amd64/list.json")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{
                    "builds": [],
                    "releases": {
                        "0.8.9": "solc-linux-amd64-v0.8.9+commit.e5eed63a",
                        "0.8.10": "solc-linux-amd64-v0.8.10+commit.fc410830",
                        "0.7.6": "solc-linux-amd64-v0.7.6+commit.7338295f"
                    },
                    "latestRelease": "0.8.10"
                }"#,
            )
            .create_async()
            .await;

        let provider = BinariesCatalogProvider::new(&server.url(), "linux-amd64");
        let catalog = provider.fetch_catalog().await.unwrap();

        mock.assert_async().await;
        assert_eq!(
            catalog.versions(),
            &[v("0.8.10"), v("0.8.9"), v("0.7.6")]
        );
    }

    #[tokio::test]
    async fn fetch_catalog_skips_unparseable_release_keys() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", "/macosx-amd64/list.json")
            .with_status(200)
            .with_body(r#"{"releases": {"0.8.0": "a", "nightly": "b"}}"#)
            .create_async()
            .await;

        let provider = BinariesCatalogProvider::new(&server.url(), "macosx-amd64");
        let catalog = provider.fetch_catalog().await.unwrap();

        mock.assert_async().await;
        assert_eq!(catalog.versions(), &[v("0.8.0")]);
    }

    #[tokio::test]
    async fn fetch_catalog_returns_not_found_for_unknown_platform() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", "/plan9-amd64/list.json")
            .with_status(404)
            .create_async()
            .await;

        let provider = BinariesCatalogProvider::new(&server.url(), "plan9-amd64");
        let result = provider.fetch_catalog().await;

        mock.assert_async().await;
        assert!(matches!(result, Err(CatalogError::NotFound(p)) if p == "plan9-amd64"));
    }

    #[tokio::test]
    async fn fetch_catalog_returns_rate_limited_for_429() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", "/linux-amd64/list.json")
            .with_status(429)
            .with_header("retry-after", "30")
            .create_async()
            .await;

        let provider = BinariesCatalogProvider::new(&server.url(), "linux-amd64");
        let result = provider.fetch_catalog().await;

        mock.assert_async().await;
        assert!(matches!(
            result,
            Err(CatalogError::RateLimited {
                retry_after_secs: Some(30)
            })
        ));
    }

    #[tokio::test]
    async fn fetch_catalog_returns_invalid_response_for_malformed_body() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", "/linux-amd64/list.json")
            .with_status(200)
            .with_body("not json")
            .create_async()
            .await;

        let provider = BinariesCatalogProvider::new(&server.url(), "linux-amd64");
        let result = provider.fetch_catalog().await;

        mock.assert_async().await;
        assert!(matches!(result, Err(CatalogError::InvalidResponse(_))));
    }
}
