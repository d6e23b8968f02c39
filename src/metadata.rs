//! Registry response types.

use serde::{Deserialize, Serialize};

/// Description of a single asset version, as returned by the registry.
///
/// Every field defaults to empty when absent: an error response from the
/// registry carries nothing but [`error`](Self::error).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetMetadata {
    /// Registry identifier of the asset.
    pub asset_id: String,

    /// Registry user who published the asset.
    pub author: String,

    /// Asset title.
    pub title: String,

    /// Version label of this release.
    pub version: String,

    /// Commit or build tag of the downloadable archive.
    pub download_commit: String,

    /// Where the archive can be downloaded from.
    pub download_url: String,

    /// Error text supplied by the registry when the identifier is invalid.
    pub error: Option<String>,
}

impl AssetMetadata {
    /// The `author/title` key of this asset.
    ///
    /// # Example
    ///
    /// ```rust
    /// use gibson::AssetMetadata;
    ///
    /// let metadata = AssetMetadata {
    ///     author: "jane".to_string(),
    ///     title: "Widget".to_string(),
    ///     ..Default::default()
    /// };
    /// assert_eq!(metadata.key(), "jane/Widget");
    /// ```
    pub fn key(&self) -> String {
        format!("{}/{}", self.author, self.title)
    }

    /// The registry-supplied error text, if any non-blank text was sent.
    pub fn registry_error(&self) -> Option<&str> {
        self.error
            .as_deref()
            .map(str::trim)
            .filter(|message| !message.is_empty())
    }
}

/// Assets returned by a search, in registry order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    /// The matching assets.
    #[serde(default)]
    pub result: Vec<AssetMetadata>,
}

impl SearchResult {
    /// Whether the search returned nothing.
    pub fn is_empty(&self) -> bool {
        self.result.is_empty()
    }

    /// The first asset whose title equals `title` exactly and which carries
    /// an identifier.
    ///
    /// Matching is case-sensitive; there is no fuzzy matching.
    pub fn find_title(&self, title: &str) -> Option<&AssetMetadata> {
        self.result
            .iter()
            .find(|asset| asset.title == title && !asset.asset_id.is_empty())
    }
}

/// The registry's answer to a fetch-by-id request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResponse {
    /// HTTP-like status code of the response.
    pub status: u16,

    /// The decoded body. Empty apart from `error` when the registry rejected
    /// the request.
    pub metadata: AssetMetadata,
}

impl FetchResponse {
    /// Why the registry rejected the request, if it did.
    ///
    /// The registry's own error text wins; a bare client- or server-error
    /// status is described by its code.
    ///
    /// # Example
    ///
    /// ```rust
    /// use gibson::{AssetMetadata, FetchResponse};
    ///
    /// let response = FetchResponse { status: 404, metadata: AssetMetadata::default() };
    /// assert_eq!(response.rejection().as_deref(), Some("registry responded with HTTP 404"));
    /// ```
    pub fn rejection(&self) -> Option<String> {
        if let Some(message) = self.metadata.registry_error() {
            return Some(message.to_string());
        }
        if self.status >= 400 {
            return Some(format!("registry responded with HTTP {}", self.status));
        }
        None
    }
}
