//! Registry client.
//!
//! The installer only needs two read operations from the asset registry:
//!
//! - `search`: every asset published by an author, filtered by engine version
//! - `fetch`: the metadata of one asset by id, with the response status
//!
//! [`HttpRegistry`] implements both against the asset-library HTTP API.

mod http;

pub use http::HttpRegistry;

use crate::{AssetMetadata, BackendError, FetchResponse, SearchResult};
use async_trait::async_trait;

/// Read access to the asset registry.
#[async_trait]
pub trait RegistryClient: Send + Sync {
    /// All assets published by `author` for the given engine version.
    async fn search(&self, author: &str, version_filter: &str)
        -> Result<SearchResult, BackendError>;

    /// The metadata of asset `id`.
    ///
    /// A rejected id is not an `Err`: the registry's status and error text
    /// come back in the [`FetchResponse`]. `Err` is reserved for transport
    /// failures.
    async fn fetch(&self, id: &str) -> Result<FetchResponse, BackendError>;
}

/// Decode a fetch-by-id body.
///
/// Error statuses may come with a body that is not asset metadata at all
/// (an HTML error page, say); those decode to empty metadata and the status
/// alone describes the failure.
pub(crate) fn decode_fetch_body(status: u16, body: &[u8]) -> Result<FetchResponse, BackendError> {
    let metadata = match serde_json::from_slice::<AssetMetadata>(body) {
        Ok(metadata) => metadata,
        Err(_) if status >= 400 => AssetMetadata::default(),
        Err(e) => return Err(BackendError::Decode(e)),
    };
    Ok(FetchResponse { status, metadata })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_success_body() {
        let response = decode_fetch_body(
            200,
            br#"{"asset_id": "42", "author": "jane", "title": "Widget"}"#,
        )
        .unwrap();
        assert_eq!(response.status, 200);
        assert_eq!(response.metadata.key(), "jane/Widget");
        assert_eq!(response.rejection(), None);
    }

    #[test]
    fn test_decode_error_body() {
        let response = decode_fetch_body(404, br#"{"error": "Couldn't find asset"}"#).unwrap();
        assert_eq!(response.rejection().as_deref(), Some("Couldn't find asset"));
    }

    #[test]
    fn test_decode_non_json_error_page() {
        let response = decode_fetch_body(502, b"<html>Bad Gateway</html>").unwrap();
        assert_eq!(
            response.rejection().as_deref(),
            Some("registry responded with HTTP 502")
        );
    }

    #[test]
    fn test_decode_garbage_success_is_an_error() {
        let result = decode_fetch_body(200, b"not json");
        assert!(matches!(result, Err(BackendError::Decode(_))));
    }
}
