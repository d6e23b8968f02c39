//! Asset-library HTTP API client.

use super::{decode_fetch_body, RegistryClient};
use crate::{BackendError, FetchResponse, SearchResult};
use async_trait::async_trait;
use std::time::Duration;

/// [`RegistryClient`] backed by the asset-library JSON API.
///
/// - search: `GET {base}/asset?user=<author>&godot_version=<filter>`
/// - fetch: `GET {base}/asset/<id>`
#[derive(Debug, Clone)]
pub struct HttpRegistry {
    client: reqwest::Client,
    base_url: String,
}

impl HttpRegistry {
    /// Create a client for the API at `base_url`.
    ///
    /// `timeout` bounds each request end to end.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, BackendError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("gibson/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// The API base URL, without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn search_url(&self) -> String {
        format!("{}/asset", self.base_url)
    }

    fn asset_url(&self, id: &str) -> String {
        format!("{}/asset/{}", self.base_url, id)
    }
}

#[async_trait]
impl RegistryClient for HttpRegistry {
    async fn search(
        &self,
        author: &str,
        version_filter: &str,
    ) -> Result<SearchResult, BackendError> {
        let url = self.search_url();
        tracing::debug!("Searching {} for assets by {}", url, author);

        let result = self
            .client
            .get(&url)
            .query(&[("user", author), ("godot_version", version_filter)])
            .send()
            .await?
            .error_for_status()?
            .json::<SearchResult>()
            .await?;

        tracing::debug!("Search for {} returned {} assets", author, result.result.len());
        Ok(result)
    }

    async fn fetch(&self, id: &str) -> Result<FetchResponse, BackendError> {
        let url = self.asset_url(id);
        tracing::debug!("Fetching asset metadata from {}", url);

        let response = self.client.get(&url).send().await?;
        let status = response.status().as_u16();
        let body = response.bytes().await?;

        decode_fetch_body(status, &body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urls() {
        let registry =
            HttpRegistry::new("https://godotengine.org/asset-library/api/", Duration::from_secs(5))
                .unwrap();
        assert_eq!(registry.base_url(), "https://godotengine.org/asset-library/api");
        assert_eq!(
            registry.search_url(),
            "https://godotengine.org/asset-library/api/asset"
        );
        assert_eq!(
            registry.asset_url("42"),
            "https://godotengine.org/asset-library/api/asset/42"
        );
    }

    #[tokio::test]
    async fn test_unreachable_registry_is_transport_error() {
        let registry = HttpRegistry::new("http://127.0.0.1:9", Duration::from_secs(2)).unwrap();
        let result = registry.fetch("42").await;
        assert!(matches!(result, Err(BackendError::Http(_))));
    }
}
