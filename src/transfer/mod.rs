//! Archive download and extraction.
//!
//! - `ArchiveFetcher`: write the body at a URL to a file
//! - `Extractor`: unpack an archive into a directory
//!
//! [`HttpFetcher`] and [`ZipExtractor`] are the implementations the
//! installer uses by default.

mod archive;
mod fetcher;

pub use archive::ZipExtractor;
pub use fetcher::HttpFetcher;

use crate::BackendError;
use async_trait::async_trait;
use std::path::Path;

/// Downloads archives.
#[async_trait]
pub trait ArchiveFetcher: Send + Sync {
    /// Write the full response body of `url` to `destination`, creating or
    /// truncating the file.
    async fn fetch(&self, url: &str, destination: &Path) -> Result<(), BackendError>;
}

/// Unpacks archives.
#[async_trait]
pub trait Extractor: Send + Sync {
    /// Unpack `archive` into `destination`, creating it if absent and
    /// overwriting files that already exist.
    async fn extract(&self, archive: &Path, destination: &Path) -> Result<(), BackendError>;
}
