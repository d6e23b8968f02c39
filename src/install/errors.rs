//! Error types for install and uninstall operations.
//!
//! [`InstallError`] is what the [`Installer`](crate::Installer) returns. Each
//! variant carries an actionable fix suggestion. The lower-level
//! [`CacheError`] and [`BackendError`] describe failures of the cache store
//! and of the registry/download/extract collaborators; the installer wraps
//! them into the matching [`InstallError`] variant for the phase that failed.

use std::io;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur while installing or uninstalling an asset.
///
/// Every variant is terminal for the current operation: the pipeline stops
/// at the first failure and nothing is retried.
///
/// # Example
///
/// ```rust
/// use gibson::InstallError;
///
/// fn handle_error(error: InstallError) {
///     eprintln!("Install failed: {}", error);
///     eprintln!("To fix: {}", error.fix_suggestion());
/// }
/// ```
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum InstallError {
    /// The reference cannot name any asset.
    #[error("Invalid asset reference '{reference}': {reason}")]
    InvalidReference {
        /// The raw reference as given by the user.
        reference: String,
        /// Why the reference was rejected.
        reason: String,
        /// Actionable suggestion for resolving the issue.
        fix: String,
    },

    /// No matching author/title, or the registry rejected the identifier.
    #[error("Not found: {message}")]
    NotFound {
        /// The asset that was being looked up (`author/title` or an id).
        asset: String,
        /// Description of what could not be found.
        message: String,
        /// Actionable suggestion for resolving the issue.
        fix: String,
    },

    /// A transport-level failure while searching or fetching metadata.
    #[error("Network error: {message}")]
    Network {
        /// Description of the network error.
        message: String,
        /// Actionable suggestion for resolving the issue.
        fix: String,
    },

    /// The archive could not be downloaded or written to the cache.
    #[error("Download failed: {message}")]
    DownloadFailed {
        /// URL the archive was fetched from.
        url: String,
        /// Where the archive was being written.
        path: PathBuf,
        /// Description of the failure.
        message: String,
        /// Actionable suggestion for resolving the issue.
        fix: String,
    },

    /// The archive could not be extracted into the install directory.
    ///
    /// A cached archive that fails here keeps failing until the cache for
    /// that asset is cleared.
    #[error("Installation failed: {message}")]
    InstallFailed {
        /// The archive that failed to extract.
        archive: PathBuf,
        /// Description of the failure.
        message: String,
        /// Actionable suggestion for resolving the issue.
        fix: String,
    },

    /// The cache directory could not be read or modified.
    #[error("Cache error: {source}")]
    Cache {
        /// The underlying cache store failure.
        #[source]
        source: CacheError,
        /// Actionable suggestion for resolving the issue.
        fix: String,
    },
}

impl InstallError {
    /// Get an actionable suggestion for fixing this error.
    ///
    /// # Example
    ///
    /// ```rust
    /// use gibson::InstallError;
    ///
    /// let error = InstallError::Network {
    ///     message: "connection refused".to_string(),
    ///     fix: "Check your internet connection and try again".to_string(),
    /// };
    /// assert!(error.fix_suggestion().contains("internet"));
    /// ```
    pub fn fix_suggestion(&self) -> &str {
        match self {
            Self::InvalidReference { fix, .. } => fix,
            Self::NotFound { fix, .. } => fix,
            Self::Network { fix, .. } => fix,
            Self::DownloadFailed { fix, .. } => fix,
            Self::InstallFailed { fix, .. } => fix,
            Self::Cache { fix, .. } => fix,
        }
    }

    pub(crate) fn invalid_reference(reference: &str, reason: &str) -> Self {
        Self::InvalidReference {
            reference: reference.to_string(),
            reason: reason.to_string(),
            fix: "Use either a numeric asset id (e.g. 42) or author/title (e.g. jane/Widget)"
                .to_string(),
        }
    }

    pub(crate) fn cache(source: CacheError) -> Self {
        let fix = if source.is_permission_denied() {
            format!(
                "Check the permissions of {} or point --cache-dir somewhere writable",
                source.path.display()
            )
        } else {
            format!("Check that {} is accessible and the disk is not full", source.path.display())
        };
        Self::Cache { source, fix }
    }
}

/// A filesystem failure while manipulating the cache directory.
#[derive(Debug, Error)]
#[error("failed to {operation} {}: {source}", .path.display())]
pub struct CacheError {
    /// What the store was doing (e.g. "read", "remove", "create").
    pub operation: &'static str,
    /// The path the operation was applied to.
    pub path: PathBuf,
    /// The underlying I/O error.
    #[source]
    pub source: io::Error,
}

impl CacheError {
    pub(crate) fn new(operation: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self {
            operation,
            path: path.into(),
            source,
        }
    }

    /// Whether the failure was caused by missing permissions.
    pub fn is_permission_denied(&self) -> bool {
        self.source.kind() == io::ErrorKind::PermissionDenied
    }
}

/// Failure reported by a registry client, archive fetcher or extractor.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BackendError {
    /// HTTP transport failure.
    #[error("{0}")]
    Http(#[from] reqwest::Error),

    /// Filesystem failure.
    #[error("{0}")]
    Io(#[from] io::Error),

    /// The archive could not be read.
    #[error("{0}")]
    Archive(#[from] zip::result::ZipError),

    /// A response body could not be decoded.
    #[error("invalid response: {0}")]
    Decode(#[from] serde_json::Error),

    /// The operation did not finish in time.
    #[error("timed out after {0:?}")]
    Timeout(Duration),

    /// Any other failure, described by a message.
    #[error("{0}")]
    Other(String),
}

impl BackendError {
    /// Whether this failure was a timeout, either ours or the transport's.
    pub fn is_timeout(&self) -> bool {
        match self {
            Self::Timeout(_) => true,
            Self::Http(e) => e.is_timeout(),
            _ => false,
        }
    }
}
