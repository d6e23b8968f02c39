//! Directory-per-version archive store.

use super::entry::{archive_file_name, CacheEntry};
use super::{is_plain_file_name, is_plain_segment};
use crate::CacheError;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// The archive cache rooted at a single directory.
///
/// The store never locks anything; it assumes a single process owns the
/// cache root for the duration of an operation.
///
/// # Example
///
/// ```rust,no_run
/// use gibson::CacheStore;
///
/// let store = CacheStore::new("/home/jane/.cache/gibson/addons");
/// match store.lookup("jane", "Widget").unwrap() {
///     Some(archive) => println!("cached: {}", archive.display()),
///     None => println!("not cached"),
/// }
/// ```
#[derive(Debug, Clone)]
pub struct CacheStore {
    root: PathBuf,
}

impl CacheStore {
    /// A store rooted at `root`. The directory is created lazily.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The cache root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding every cached version of `author/title`.
    ///
    /// Both parts must be plain path segments; anything that could resolve
    /// outside the cache root (`..`, absolute paths, empty parts) is refused.
    pub fn asset_dir(&self, author: &str, title: &str) -> Result<PathBuf, CacheError> {
        for segment in [author, title] {
            if !is_plain_segment(segment) {
                return Err(self.unsafe_name(segment));
            }
        }
        Ok(self.root.join(author).join(title))
    }

    /// Where the archive for one `(version, commit)` of `author/title` lives.
    ///
    /// Pure and deterministic: identical inputs give identical paths. The
    /// `<version>_<commit>` naming cannot tell `("1_2", "x")` from
    /// `("1", "2_x")`; both land on `1_2_x.zip`.
    pub fn archive_path(
        &self,
        author: &str,
        title: &str,
        version: &str,
        commit: &str,
    ) -> Result<PathBuf, CacheError> {
        let file_name = archive_file_name(version, commit);
        if !is_plain_file_name(&file_name) {
            return Err(self.unsafe_name(&file_name));
        }
        Ok(self.asset_dir(author, title)?.join(file_name))
    }

    /// Every cached entry of `author/title`, greatest file name first.
    ///
    /// A missing asset directory yields an empty list.
    pub fn entries(&self, author: &str, title: &str) -> Result<Vec<CacheEntry>, CacheError> {
        let dir = self.asset_dir(author, title)?;

        let read_dir = match fs::read_dir(&dir) {
            Ok(read_dir) => read_dir,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(CacheError::new("read", dir, e)),
        };

        let mut entries = Vec::new();
        for entry in read_dir {
            let entry = entry.map_err(|e| CacheError::new("read", &dir, e))?;
            entries.push(CacheEntry::new(entry.path()));
        }

        // Names embed `<version>_<commit>`; plain string order stands in for recency.
        entries.sort_by(|a, b| b.file_name.cmp(&a.file_name));
        Ok(entries)
    }

    /// The most recent cached archive of `author/title`, if any.
    ///
    /// "Most recent" is the lexicographically greatest file name, not a
    /// semantic version comparison.
    pub fn lookup(&self, author: &str, title: &str) -> Result<Option<PathBuf>, CacheError> {
        let latest = self
            .entries(author, title)?
            .into_iter()
            .next()
            .map(|entry| entry.path);

        match &latest {
            Some(path) => tracing::debug!("Cache hit for {}/{}: {}", author, title, path.display()),
            None => tracing::debug!("Cache miss for {}/{}", author, title),
        }
        Ok(latest)
    }

    /// Remove every cached version of `author/title`.
    ///
    /// Succeeds when nothing was cached.
    pub fn clear(&self, author: &str, title: &str) -> Result<(), CacheError> {
        let dir = self.asset_dir(author, title)?;

        match fs::remove_dir_all(&dir) {
            Ok(()) => {
                tracing::debug!("Cleared cache directory {}", dir.display());
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(CacheError::new("remove", dir, e)),
        }
    }

    /// Create the directory for `author/title` if it does not exist yet.
    pub fn ensure(&self, author: &str, title: &str) -> Result<PathBuf, CacheError> {
        let dir = self.asset_dir(author, title)?;
        fs::create_dir_all(&dir).map_err(|e| CacheError::new("create", &dir, e))?;
        Ok(dir)
    }

    /// Every `(author, title)` with at least one cached entry, sorted.
    pub fn cached_assets(&self) -> Result<Vec<(String, String)>, CacheError> {
        let mut assets = Vec::new();

        for author_dir in subdirectories(&self.root)? {
            for title_dir in subdirectories(&author_dir)? {
                let (Some(author), Some(title)) = (file_name_of(&author_dir), file_name_of(&title_dir))
                else {
                    continue;
                };
                if !self.entries(&author, &title)?.is_empty() {
                    assets.push((author, title));
                }
            }
        }

        assets.sort();
        Ok(assets)
    }

    fn unsafe_name(&self, name: &str) -> CacheError {
        CacheError::new(
            "resolve",
            &self.root,
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("{name:?} would escape the cache root"),
            ),
        )
    }
}

/// Immediate subdirectories of `dir`; a missing `dir` has none.
fn subdirectories(dir: &Path) -> Result<Vec<PathBuf>, CacheError> {
    let read_dir = match fs::read_dir(dir) {
        Ok(read_dir) => read_dir,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(CacheError::new("read", dir, e)),
    };

    let mut dirs = Vec::new();
    for entry in read_dir {
        let path = entry.map_err(|e| CacheError::new("read", dir, e))?.path();
        if path.is_dir() {
            dirs.push(path);
        }
    }
    Ok(dirs)
}

fn file_name_of(path: &Path) -> Option<String> {
    path.file_name().and_then(|name| name.to_str()).map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store_with(files: &[&str]) -> (TempDir, CacheStore) {
        let temp_dir = TempDir::new().unwrap();
        let store = CacheStore::new(temp_dir.path());
        for file in files {
            let path = temp_dir.path().join(file);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(&path, b"archive").unwrap();
        }
        (temp_dir, store)
    }

    #[test]
    fn test_lookup_missing_directory() {
        let (_temp_dir, store) = store_with(&[]);
        assert_eq!(store.lookup("jane", "Widget").unwrap(), None);
    }

    #[test]
    fn test_lookup_empty_directory() {
        let (temp_dir, store) = store_with(&[]);
        fs::create_dir_all(temp_dir.path().join("jane/Widget")).unwrap();
        assert_eq!(store.lookup("jane", "Widget").unwrap(), None);
    }

    #[test]
    fn test_lookup_picks_greatest_name() {
        let (temp_dir, store) = store_with(&["jane/Widget/1.0_aaa.zip", "jane/Widget/1.2_abcd.zip"]);
        assert_eq!(
            store.lookup("jane", "Widget").unwrap(),
            Some(temp_dir.path().join("jane/Widget/1.2_abcd.zip"))
        );
    }

    #[test]
    fn test_lookup_is_lexicographic_not_semantic() {
        let (temp_dir, store) = store_with(&["jane/Widget/1.10_bbb.zip", "jane/Widget/1.9_aaa.zip"]);
        assert_eq!(
            store.lookup("jane", "Widget").unwrap(),
            Some(temp_dir.path().join("jane/Widget/1.9_aaa.zip"))
        );
    }

    #[test]
    fn test_entries_sorted_descending() {
        let (_temp_dir, store) = store_with(&[
            "jane/Widget/1.0_aaa.zip",
            "jane/Widget/2.0_ccc.zip",
            "jane/Widget/1.2_abcd.zip",
        ]);
        let names: Vec<_> = store
            .entries("jane", "Widget")
            .unwrap()
            .into_iter()
            .map(|entry| entry.file_name)
            .collect();
        assert_eq!(names, vec!["2.0_ccc.zip", "1.2_abcd.zip", "1.0_aaa.zip"]);
    }

    #[test]
    fn test_lookup_does_not_mix_assets() {
        let (_temp_dir, store) = store_with(&["jane/Gadget/9.9_zzz.zip"]);
        assert_eq!(store.lookup("jane", "Widget").unwrap(), None);
    }

    #[test]
    fn test_clear_removes_all_versions() {
        let (temp_dir, store) = store_with(&["jane/Widget/1.0_aaa.zip", "jane/Widget/1.2_abcd.zip"]);
        store.clear("jane", "Widget").unwrap();
        assert!(!temp_dir.path().join("jane/Widget").exists());
        assert_eq!(store.lookup("jane", "Widget").unwrap(), None);
    }

    #[test]
    fn test_clear_missing_is_noop() {
        let (_temp_dir, store) = store_with(&[]);
        store.clear("jane", "Widget").unwrap();
        store.clear("jane", "Widget").unwrap();
    }

    #[test]
    fn test_clear_keeps_other_titles() {
        let (temp_dir, store) = store_with(&["jane/Widget/1.0_aaa.zip", "jane/Gadget/1.0_bbb.zip"]);
        store.clear("jane", "Widget").unwrap();
        assert!(temp_dir.path().join("jane/Gadget/1.0_bbb.zip").exists());
    }

    #[test]
    fn test_ensure_is_idempotent() {
        let (temp_dir, store) = store_with(&[]);
        let first = store.ensure("jane", "Widget").unwrap();
        let second = store.ensure("jane", "Widget").unwrap();
        assert_eq!(first, second);
        assert_eq!(first, temp_dir.path().join("jane/Widget"));
        assert!(first.is_dir());
    }

    #[test]
    fn test_ensure_fails_when_blocked_by_file() {
        let (temp_dir, store) = store_with(&["jane"]);
        let err = store.ensure("jane", "Widget").unwrap_err();
        assert_eq!(err.operation, "create");
        assert_eq!(err.path, temp_dir.path().join("jane/Widget"));
    }

    #[test]
    fn test_archive_path_is_deterministic() {
        let store = CacheStore::new("/cache");
        let a = store.archive_path("jane", "Widget", "1.2", "abcd").unwrap();
        let b = store.archive_path("jane", "Widget", "1.2", "abcd").unwrap();
        assert_eq!(a, b);
        assert_eq!(a, PathBuf::from("/cache/jane/Widget/1.2_abcd.zip"));
        assert_ne!(a, store.archive_path("jane", "Widget", "1.2", "abce").unwrap());
        assert_ne!(a, store.archive_path("jane", "Widget", "1.3", "abcd").unwrap());
    }

    #[test]
    fn test_archive_path_underscores_are_ambiguous() {
        let store = CacheStore::new("/cache");
        assert_eq!(
            store.archive_path("jane", "Widget", "1_2", "x").unwrap(),
            store.archive_path("jane", "Widget", "1", "2_x").unwrap()
        );
    }

    #[test]
    fn test_archive_path_refuses_escaping_parts() {
        let store = CacheStore::new("/cache");
        assert!(store.archive_path("..", "Widget", "1.2", "abcd").is_err());
        assert!(store.archive_path("jane", "../../etc", "1.2", "abcd").is_err());
        assert!(store.archive_path("jane", "Widget", "../../x", "abcd").is_err());
        assert!(store.archive_path("jane", "Widget", "1.2", "a/b").is_err());
    }

    #[test]
    fn test_clear_refuses_paths_outside_root() {
        let temp_dir = TempDir::new().unwrap();
        let victim = temp_dir.path().join("victim/important");
        fs::create_dir_all(&victim).unwrap();
        fs::write(victim.join("data.txt"), b"keep me").unwrap();
        let store = CacheStore::new(temp_dir.path().join("cache"));

        for (author, title) in [("..", "victim"), ("x", "../../victim"), ("", "victim")] {
            let err = store.clear(author, title).unwrap_err();
            assert_eq!(err.operation, "resolve");
            assert_eq!(err.source.kind(), io::ErrorKind::InvalidInput);
        }
        assert!(victim.join("data.txt").exists());
    }

    #[test]
    fn test_lookup_and_ensure_refuse_paths_outside_root() {
        let temp_dir = TempDir::new().unwrap();
        let store = CacheStore::new(temp_dir.path().join("cache"));

        assert!(store.lookup("..", "..").is_err());
        assert!(store.ensure("jane", "/tmp/elsewhere").is_err());
        assert!(!temp_dir.path().join("cache").exists());
    }

    #[test]
    fn test_cached_assets() {
        let (temp_dir, store) = store_with(&[
            "jane/Widget/1.0_aaa.zip",
            "jane/Gadget/1.0_bbb.zip",
            "bob/Thing/0.1_ccc.zip",
        ]);
        fs::create_dir_all(temp_dir.path().join("bob/Empty")).unwrap();

        assert_eq!(
            store.cached_assets().unwrap(),
            vec![
                ("bob".to_string(), "Thing".to_string()),
                ("jane".to_string(), "Gadget".to_string()),
                ("jane".to_string(), "Widget".to_string()),
            ]
        );
    }

    #[test]
    fn test_cached_assets_missing_root() {
        let store = CacheStore::new("/definitely/not/a/cache/root/xyz123");
        assert!(store.cached_assets().unwrap().is_empty());
    }
}
