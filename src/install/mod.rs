//! Installing and uninstalling registry assets.
//!
//! The [`Installer`] drives the whole pipeline; this module also holds the
//! error types it returns and the phase-reporting interface it calls.
//!
//! # Example
//!
//! ```rust,no_run
//! use gibson::{AssetReference, InstallOptions, Installer, PhaseEvent};
//!
//! #[tokio::main]
//! async fn main() {
//!     let installer = Installer::new(InstallOptions::default())
//!         .unwrap()
//!         .with_reporter(|event: PhaseEvent| eprintln!("{:?}", event));
//!
//!     let reference: AssetReference = "42".parse().unwrap();
//!     if let Err(e) = installer.install(&reference, false).await {
//!         eprintln!("{}\n  fix: {}", e, e.fix_suggestion());
//!     }
//! }
//! ```

mod errors;
mod executor;
mod progress;
mod types;

pub use errors::{BackendError, CacheError, InstallError};
pub use executor::Installer;
pub use progress::{NoopReporter, Phase, PhaseEvent, ProgressReporter, TracingReporter};
pub use types::{ArchiveSource, InstallOutcome};
