//! # gibson
//!
//! Resolve, cache and install addons from the Godot Asset Library.
//!
//! An asset is named either by its registry id (`42`) or by its author and
//! exact title (`jane/Widget`). The [`Installer`] resolves the reference,
//! downloads the archive into a local cache, and extracts it into the
//! project's addon directory. Author/title references are served straight
//! from the cache when a version is already there.
//!
//! ## Features
//!
//! - `AssetReference` parsing of `id` and `author/title` references
//! - `CacheStore` managing `<root>/<author>/<title>/<version>_<commit>.zip`
//! - `Installer::install()` / `Installer::uninstall()` with phase reporting
//! - `RegistryClient`, `ArchiveFetcher` and `Extractor` traits, with HTTP
//!   and zip implementations
//!
//! ## Example
//!
//! ```rust,no_run
//! use gibson::{AssetReference, InstallOptions, Installer};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let installer = Installer::new(InstallOptions::default()).unwrap();
//!
//!     let widget: AssetReference = "jane/Widget".parse().unwrap();
//!     let outcome = installer.install(&widget, false).await.unwrap();
//!     println!("installed {} (cached: {})", outcome.archive.display(), outcome.from_cache());
//!
//!     installer.uninstall(&widget).unwrap();
//! }
//! ```

mod cache;
mod install;
mod metadata;
mod options;
mod reference;
pub mod registry;
pub mod transfer;

pub use cache::{CacheEntry, CacheStore};
pub use install::{
    ArchiveSource, BackendError, CacheError, InstallError, InstallOutcome, Installer,
    NoopReporter, Phase, PhaseEvent, ProgressReporter, TracingReporter,
};
pub use metadata::{AssetMetadata, FetchResponse, SearchResult};
pub use options::{
    InstallOptions, DEFAULT_GODOT_VERSION, DEFAULT_INSTALL_DIR, DEFAULT_REGISTRY_URL,
};
pub use reference::AssetReference;
pub use registry::{HttpRegistry, RegistryClient};
pub use transfer::{ArchiveFetcher, Extractor, HttpFetcher, ZipExtractor};
