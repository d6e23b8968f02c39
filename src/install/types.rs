//! Result types for install operations.

use crate::AssetMetadata;
use std::path::PathBuf;

/// Where the archive of an install came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveSource {
    /// A previously cached archive; the registry was not contacted.
    Cache,
    /// Freshly downloaded from the registry.
    Registry,
}

/// What a successful install produced.
#[derive(Debug, Clone)]
pub struct InstallOutcome {
    /// The archive that was extracted.
    pub archive: PathBuf,

    /// The directory the archive was extracted into.
    pub install_dir: PathBuf,

    /// Whether the archive was served from the cache.
    pub source: ArchiveSource,

    /// Metadata returned by the registry, when it was consulted.
    pub metadata: Option<AssetMetadata>,
}

impl InstallOutcome {
    /// Check if the install was served entirely from the cache.
    ///
    /// # Example
    ///
    /// ```rust
    /// use gibson::{ArchiveSource, InstallOutcome};
    /// use std::path::PathBuf;
    ///
    /// let outcome = InstallOutcome {
    ///     archive: PathBuf::from("/cache/jane/Widget/1.2_abcd.zip"),
    ///     install_dir: PathBuf::from("addons"),
    ///     source: ArchiveSource::Cache,
    ///     metadata: None,
    /// };
    /// assert!(outcome.from_cache());
    /// ```
    pub fn from_cache(&self) -> bool {
        self.source == ArchiveSource::Cache
    }
}
