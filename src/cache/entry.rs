//! A single cached archive.

use std::path::{Path, PathBuf};

/// Extension of every cached archive.
pub(crate) const ARCHIVE_EXTENSION: &str = "zip";

/// One file inside an asset's cache directory.
///
/// Entries are named `<version>_<commit>.zip`; the file name is the
/// uniqueness key of a cached version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    /// Full path of the archive.
    pub path: PathBuf,

    /// File name of the archive, used for ordering.
    pub file_name: String,
}

impl CacheEntry {
    pub(crate) fn new(path: PathBuf) -> Self {
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self { path, file_name }
    }

    /// The archive path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Best-effort split of the file name into `(version, commit)`.
    ///
    /// The commit is whatever follows the last `_`, so versions may contain
    /// underscores but commits may not. Returns `None` for names that do not
    /// follow the `<version>_<commit>.zip` pattern.
    pub fn version_commit(&self) -> Option<(&str, &str)> {
        let stem = self
            .file_name
            .strip_suffix(ARCHIVE_EXTENSION)
            .and_then(|stem| stem.strip_suffix('.'))?;
        stem.rsplit_once('_')
    }
}

/// File name of the archive for a `(version, commit)` pair.
pub(crate) fn archive_file_name(version: &str, commit: &str) -> String {
    format!("{version}_{commit}.{ARCHIVE_EXTENSION}")
}
