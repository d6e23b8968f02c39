//! Installer configuration.
//!
//! This module provides the [`InstallOptions`] struct, which carries every
//! setting the installer needs: where archives are cached, where they are
//! extracted, which registry to ask and how long to wait for it.

use std::path::PathBuf;
use std::time::Duration;

/// Default registry API endpoint.
pub const DEFAULT_REGISTRY_URL: &str = "https://godotengine.org/asset-library/api";

/// Default engine version sent as the search filter.
pub const DEFAULT_GODOT_VERSION: &str = "3.4";

/// Default directory archives are extracted into, relative to the working directory.
pub const DEFAULT_INSTALL_DIR: &str = "addons";

/// Configuration for an [`Installer`](crate::Installer).
///
/// # Default Behavior
///
/// The cache lives in `<user cache dir>/gibson/addons` and archives are
/// extracted into `./addons`. Registry requests time out after 30 seconds,
/// archive downloads after 5 minutes.
///
/// # Example
///
/// ```rust
/// use gibson::InstallOptions;
/// use std::time::Duration;
///
/// // Isolated cache and install directory, e.g. for tests
/// let opts = InstallOptions::new("/tmp/cache", "/tmp/project/addons");
/// assert_eq!(opts.request_timeout, Duration::from_secs(30));
///
/// // Custom download timeout
/// let opts = InstallOptions {
///     download_timeout: Duration::from_secs(600),
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone)]
pub struct InstallOptions {
    /// Root of the archive cache; archives live in `<root>/<author>/<title>/`.
    pub cache_root: PathBuf,

    /// Directory archives are extracted into.
    pub install_dir: PathBuf,

    /// Base URL of the registry API.
    pub base_url: String,

    /// Engine version filter passed with author searches.
    pub godot_version: String,

    /// Upper bound for a single registry request.
    ///
    /// Default: 30 seconds
    pub request_timeout: Duration,

    /// Upper bound for a single archive download.
    ///
    /// Default: 5 minutes
    pub download_timeout: Duration,
}

impl InstallOptions {
    /// Options with an explicit cache root and install directory, other
    /// settings at their defaults.
    pub fn new(cache_root: impl Into<PathBuf>, install_dir: impl Into<PathBuf>) -> Self {
        Self {
            cache_root: cache_root.into(),
            install_dir: install_dir.into(),
            ..Default::default()
        }
    }

    /// The platform cache location, `<user cache dir>/gibson/addons`.
    ///
    /// `None` when no home directory can be determined.
    pub fn user_cache_root() -> Option<PathBuf> {
        directories::BaseDirs::new().map(|dirs| dirs.cache_dir().join("gibson").join("addons"))
    }
}

impl Default for InstallOptions {
    fn default() -> Self {
        let cache_root = Self::user_cache_root()
            .unwrap_or_else(|| std::env::temp_dir().join("gibson").join("addons"));

        Self {
            cache_root,
            install_dir: PathBuf::from(DEFAULT_INSTALL_DIR),
            base_url: DEFAULT_REGISTRY_URL.to_string(),
            godot_version: DEFAULT_GODOT_VERSION.to_string(),
            request_timeout: Duration::from_secs(30),
            download_timeout: Duration::from_secs(300), // 5 minutes
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_timeouts() {
        let opts = InstallOptions::default();
        assert_eq!(opts.request_timeout, Duration::from_secs(30));
        assert_eq!(opts.download_timeout, Duration::from_secs(300));
    }

    #[test]
    fn test_default_registry() {
        let opts = InstallOptions::default();
        assert_eq!(opts.base_url, DEFAULT_REGISTRY_URL);
        assert_eq!(opts.godot_version, "3.4");
        assert_eq!(opts.install_dir, PathBuf::from("addons"));
    }

    #[test]
    fn test_default_cache_root_layout() {
        let opts = InstallOptions::default();
        assert!(opts.cache_root.ends_with("gibson/addons"));
    }

    #[test]
    fn test_new_overrides_directories_only() {
        let opts = InstallOptions::new("/tmp/cache", "/tmp/addons");
        assert_eq!(opts.cache_root, PathBuf::from("/tmp/cache"));
        assert_eq!(opts.install_dir, PathBuf::from("/tmp/addons"));
        assert_eq!(opts.base_url, DEFAULT_REGISTRY_URL);
        assert_eq!(opts.request_timeout, Duration::from_secs(30));
    }
}
