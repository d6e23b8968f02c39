//! Install pipeline for registry assets.
//!
//! This module provides the [`Installer`], which turns an [`AssetReference`]
//! into an extracted archive. It decides whether the registry has to be
//! contacted at all, resolves author/title references to an id, downloads
//! the archive into the cache and extracts it, reporting each phase along
//! the way.

use crate::install::{
    ArchiveSource, InstallError, InstallOutcome, Phase, ProgressReporter, TracingReporter,
};
use crate::registry::{HttpRegistry, RegistryClient};
use crate::transfer::{ArchiveFetcher, Extractor, HttpFetcher, ZipExtractor};
use crate::{AssetMetadata, AssetReference, BackendError, CacheStore, InstallOptions};
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;

/// Resolves, downloads, caches and extracts registry assets.
///
/// Each install runs up to four phases, strictly one after another:
///
/// | Phase      | When                                   |
/// |------------|----------------------------------------|
/// | `Find`     | author/title references only           |
/// | `Get`      | unless the archive was found in cache  |
/// | `Download` | unless the archive was found in cache  |
/// | `Install`  | always                                 |
///
/// The first failure aborts the operation; nothing is retried.
///
/// # Example
///
/// ```rust,no_run
/// use gibson::{AssetReference, InstallOptions, Installer};
///
/// #[tokio::main]
/// async fn main() {
///     let installer = Installer::new(InstallOptions::default()).unwrap();
///     let reference: AssetReference = "jane/Widget".parse().unwrap();
///
///     match installer.install(&reference, false).await {
///         Ok(outcome) => println!("Installed from {}", outcome.archive.display()),
///         Err(e) => println!("Failed: {}. Fix: {}", e, e.fix_suggestion()),
///     }
/// }
/// ```
pub struct Installer {
    options: InstallOptions,
    store: CacheStore,
    registry: Arc<dyn RegistryClient>,
    fetcher: Arc<dyn ArchiveFetcher>,
    extractor: Arc<dyn Extractor>,
    reporter: Arc<dyn ProgressReporter>,
}

impl Installer {
    /// Create an installer talking to the configured registry over HTTP.
    ///
    /// Phases are reported through `tracing` until
    /// [`with_reporter`](Self::with_reporter) says otherwise.
    pub fn new(options: InstallOptions) -> Result<Self, InstallError> {
        let registry = HttpRegistry::new(options.base_url.clone(), options.request_timeout)
            .map_err(http_client_error)?;
        let fetcher = HttpFetcher::new(options.download_timeout).map_err(http_client_error)?;

        Ok(Self::with_collaborators(
            options,
            Arc::new(registry),
            Arc::new(fetcher),
            Arc::new(ZipExtractor::new()),
        ))
    }

    /// Create an installer from explicit collaborators.
    pub fn with_collaborators(
        options: InstallOptions,
        registry: Arc<dyn RegistryClient>,
        fetcher: Arc<dyn ArchiveFetcher>,
        extractor: Arc<dyn Extractor>,
    ) -> Self {
        Self {
            store: CacheStore::new(options.cache_root.clone()),
            options,
            registry,
            fetcher,
            extractor,
            reporter: Arc::new(TracingReporter),
        }
    }

    /// Report phases to `reporter` instead.
    pub fn with_reporter(mut self, reporter: impl ProgressReporter + 'static) -> Self {
        self.reporter = Arc::new(reporter);
        self
    }

    /// The configuration this installer was built with.
    pub fn options(&self) -> &InstallOptions {
        &self.options
    }

    /// The archive cache.
    pub fn cache(&self) -> &CacheStore {
        &self.store
    }

    /// Install an asset.
    ///
    /// For author/title references the cache is consulted first and a hit
    /// skips the registry entirely. `clear_cache` discards every cached
    /// version of the asset before anything else happens, forcing a fresh
    /// download. Id references never use the cache and ignore `clear_cache`.
    ///
    /// # Returns
    ///
    /// - `Ok(InstallOutcome)` describing the extracted archive
    /// - `Err(InstallError)` for the first phase that failed
    pub async fn install(
        &self,
        reference: &AssetReference,
        clear_cache: bool,
    ) -> Result<InstallOutcome, InstallError> {
        match reference {
            AssetReference::ById(id) => self.install_by_id(id).await,
            AssetReference::ByAuthor { author, title } => {
                self.install_by_author(author, title, clear_cache).await
            }
        }
    }

    /// Remove every cached version of an asset.
    ///
    /// Succeeds when nothing was cached. Only author/title references name
    /// a cache directory, so an id reference has nothing to remove.
    pub fn uninstall(&self, reference: &AssetReference) -> Result<(), InstallError> {
        self.reporter
            .begin(Phase::Uninstall, &format!("uninstalling {reference}"));

        let Some((author, title)) = reference.author_title() else {
            tracing::warn!(
                "{} is an asset id; cached archives are keyed by author/title, nothing removed",
                reference
            );
            self.reporter
                .succeed(Phase::Uninstall, &format!("nothing cached for {reference}"));
            return Ok(());
        };

        if let Err(e) = self.store.clear(author, title) {
            return self.fail(Phase::Uninstall, InstallError::cache(e));
        }

        tracing::info!("Uninstalled {}", reference);
        self.reporter
            .succeed(Phase::Uninstall, &format!("{reference} uninstalled"));
        Ok(())
    }

    async fn install_by_author(
        &self,
        author: &str,
        title: &str,
        clear_cache: bool,
    ) -> Result<InstallOutcome, InstallError> {
        let asset = format!("{author}/{title}");
        self.reporter
            .begin(Phase::Find, &format!("looking for {asset}"));

        // Step 1: Cache short-circuit, or wipe it when asked to
        if clear_cache {
            if let Err(e) = self.store.clear(author, title) {
                return self.fail(Phase::Find, InstallError::cache(e));
            }
        } else {
            match self.store.lookup(author, title) {
                Ok(Some(archive)) => {
                    self.reporter
                        .succeed(Phase::Find, &format!("found cached version of {asset}"));
                    self.extract(&asset, &archive).await?;
                    return Ok(InstallOutcome {
                        archive,
                        install_dir: self.options.install_dir.clone(),
                        source: ArchiveSource::Cache,
                        metadata: None,
                    });
                }
                Ok(None) => {}
                Err(e) => return self.fail(Phase::Find, InstallError::cache(e)),
            }
        }

        // Step 2: Search the author's assets
        let search = bounded(
            self.options.request_timeout,
            self.registry.search(author, &self.options.godot_version),
        )
        .await;
        let results = match search {
            Ok(results) => results,
            Err(e) => {
                return self.fail(
                    Phase::Find,
                    network_error(format!("searching assets by @{author} failed: {e}"), &e),
                )
            }
        };

        // Step 3: Exact title match
        if results.is_empty() {
            return self.fail(
                Phase::Find,
                InstallError::NotFound {
                    asset,
                    message: format!("couldn't find assets related to @{author}"),
                    fix: format!(
                        "Check the author name, or whether @{author} publishes for Godot {}",
                        self.options.godot_version
                    ),
                },
            );
        }
        let Some(found) = results.find_title(title) else {
            return self.fail(
                Phase::Find,
                InstallError::NotFound {
                    message: format!("couldn't find {asset}"),
                    asset,
                    fix: "Titles are matched exactly and case-sensitively; check the spelling"
                        .to_string(),
                },
            );
        };
        tracing::debug!("Resolved {} to asset id {}", asset, found.asset_id);
        self.reporter.succeed(Phase::Find, &format!("{asset} found!"));

        self.install_by_id(&found.asset_id).await
    }

    async fn install_by_id(&self, id: &str) -> Result<InstallOutcome, InstallError> {
        let metadata = self.get_metadata(id).await?;
        let archive = self.download(&metadata).await?;
        self.extract(&metadata.key(), &archive).await?;

        Ok(InstallOutcome {
            archive,
            install_dir: self.options.install_dir.clone(),
            source: ArchiveSource::Registry,
            metadata: Some(metadata),
        })
    }

    async fn get_metadata(&self, id: &str) -> Result<AssetMetadata, InstallError> {
        self.reporter.begin(Phase::Get, &format!("retrieving {id} info"));

        let response = match bounded(self.options.request_timeout, self.registry.fetch(id)).await {
            Ok(response) => response,
            Err(e) => {
                return self.fail(
                    Phase::Get,
                    network_error(format!("could not retrieve {id} info: {e}"), &e),
                )
            }
        };

        if let Some(reason) = response.rejection() {
            return self.fail(
                Phase::Get,
                InstallError::NotFound {
                    asset: id.to_string(),
                    message: format!("could not find {id}, reason: {reason}"),
                    fix: "Check the asset id on the asset library website".to_string(),
                },
            );
        }

        let metadata = response.metadata;
        if metadata.author.is_empty() || metadata.title.is_empty() {
            return self.fail(
                Phase::Get,
                InstallError::NotFound {
                    asset: id.to_string(),
                    message: format!("registry response for {id} has no author or title"),
                    fix: "Try again later or install by a different id".to_string(),
                },
            );
        }

        if let Err(e) = self.store.archive_path(
            &metadata.author,
            &metadata.title,
            &metadata.version,
            &metadata.download_commit,
        ) {
            return self.fail(
                Phase::Get,
                InstallError::NotFound {
                    asset: id.to_string(),
                    message: format!("registry response for {id} cannot be cached: {e}"),
                    fix: "Report the asset to the asset library maintainers".to_string(),
                },
            );
        }

        self.reporter
            .succeed(Phase::Get, &format!("{id} info retrieved!"));
        Ok(metadata)
    }

    async fn download(&self, metadata: &AssetMetadata) -> Result<PathBuf, InstallError> {
        let asset = metadata.key();
        self.reporter
            .begin(Phase::Download, &format!("downloading {asset}"));

        let prepared = self
            .store
            .archive_path(
                &metadata.author,
                &metadata.title,
                &metadata.version,
                &metadata.download_commit,
            )
            .and_then(|archive| {
                self.store.ensure(&metadata.author, &metadata.title)?;
                Ok(archive)
            });
        let archive = match prepared {
            Ok(archive) => archive,
            Err(e) => {
                let error = download_error(metadata, &e.path, e.to_string());
                return self.fail(Phase::Download, error);
            }
        };

        let fetched = bounded(
            self.options.download_timeout,
            self.fetcher.fetch(&metadata.download_url, &archive),
        )
        .await;
        if let Err(e) = fetched {
            discard_partial(&archive).await;
            return self.fail(
                Phase::Download,
                download_error(metadata, &archive, format!("download failed, reason: {e}")),
            );
        }

        tracing::info!("Cached {} at {}", asset, archive.display());
        self.reporter
            .succeed(Phase::Download, &format!("{asset} downloaded!"));
        Ok(archive)
    }

    async fn extract(&self, asset: &str, archive: &Path) -> Result<(), InstallError> {
        let install_dir = &self.options.install_dir;
        self.reporter
            .begin(Phase::Install, &format!("installing {asset}"));

        if let Err(e) = self.extractor.extract(archive, install_dir).await {
            return self.fail(
                Phase::Install,
                InstallError::InstallFailed {
                    archive: archive.to_path_buf(),
                    message: format!("could not install {asset}, reason: {e}"),
                    fix: format!(
                        "If the cached archive is damaged, reinstall {asset} with --clear-cache"
                    ),
                },
            );
        }

        tracing::info!("Installed {} into {}", asset, install_dir.display());
        self.reporter
            .succeed(Phase::Install, &format!("{asset} installed successfully!"));
        Ok(())
    }

    /// Report `error` as the failure of `phase` and return it.
    fn fail<T>(&self, phase: Phase, error: InstallError) -> Result<T, InstallError> {
        self.reporter.fail(phase, &error.to_string());
        Err(error)
    }
}

/// Run a collaborator call with an upper bound on its duration.
async fn bounded<T, F>(limit: Duration, call: F) -> Result<T, BackendError>
where
    F: Future<Output = Result<T, BackendError>>,
{
    timeout(limit, call)
        .await
        .unwrap_or_else(|_| Err(BackendError::Timeout(limit)))
}

/// Remove a partially written archive so a later lookup cannot pick it.
async fn discard_partial(archive: &Path) {
    match tokio::fs::remove_file(archive).await {
        Ok(()) => tracing::debug!("Removed partial download {}", archive.display()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => tracing::warn!(
            "Failed to remove partial download {}: {}",
            archive.display(),
            e
        ),
    }
}

fn network_error(message: String, cause: &BackendError) -> InstallError {
    let fix = if cause.is_timeout() {
        "The registry did not answer in time; try again later".to_string()
    } else {
        "Check your internet connection and the registry URL, then try again".to_string()
    };
    InstallError::Network { message, fix }
}

fn download_error(metadata: &AssetMetadata, archive: &Path, message: String) -> InstallError {
    InstallError::DownloadFailed {
        url: metadata.download_url.clone(),
        path: archive.to_path_buf(),
        message,
        fix: format!(
            "Check your internet connection and that {} is writable",
            archive.parent().unwrap_or(archive).display()
        ),
    }
}

fn http_client_error(e: BackendError) -> InstallError {
    InstallError::Network {
        message: format!("could not create HTTP client: {e}"),
        fix: "Check the TLS configuration of this system".to_string(),
    }
}
