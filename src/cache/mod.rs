//! On-disk archive cache.
//!
//! The cache is a plain directory tree, one directory per asset and one file
//! per cached version:
//!
//! ```text
//! <cache root>/
//!     jane/
//!         Widget/
//!             1.0_aaa.zip
//!             1.2_abcd.zip   <- selected by lookup (greatest name)
//! ```
//!
//! - `CacheStore`: list, select-latest, create and delete per-asset directories
//! - `CacheEntry`: one cached archive file

mod entry;
mod store;

pub use entry::CacheEntry;
pub use store::CacheStore;

use std::path::{Component, Path};

/// Whether `segment` only names directories below wherever it is joined.
///
/// Empty strings, `.`, `..`, roots and drive prefixes are refused. A segment
/// may still contain `/` (titles are split on the first separator only), as
/// long as every component is a plain name.
pub(crate) fn is_plain_segment(segment: &str) -> bool {
    let mut components = Path::new(segment).components().peekable();
    components.peek().is_some() && components.all(|c| matches!(c, Component::Normal(_)))
}

/// Whether `name` is a single plain file name.
pub(crate) fn is_plain_file_name(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}
