//! Zip extraction.

use super::Extractor;
use crate::BackendError;
use async_trait::async_trait;
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

/// [`Extractor`] for zip archives.
///
/// Entries whose names would escape the destination directory are skipped,
/// as is macOS resource-fork metadata (`__MACOSX/`).
#[derive(Debug, Clone, Copy, Default)]
pub struct ZipExtractor;

impl ZipExtractor {
    /// Create a zip extractor.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Extractor for ZipExtractor {
    async fn extract(&self, archive: &Path, destination: &Path) -> Result<(), BackendError> {
        let archive = archive.to_path_buf();
        let destination = destination.to_path_buf();

        tokio::task::spawn_blocking(move || unzip(&archive, &destination))
            .await
            .map_err(|e| BackendError::Other(format!("extraction task failed: {e}")))?
    }
}

/// Unpack `archive` into `destination`.
fn unzip(archive: &Path, destination: &Path) -> Result<(), BackendError> {
    let file = File::open(archive)?;
    let mut zip = zip::ZipArchive::new(file)?;

    fs::create_dir_all(destination)?;

    let mut written = 0usize;
    for i in 0..zip.len() {
        let mut entry = zip.by_index(i)?;

        let Some(relative) = entry.enclosed_name().map(Path::to_path_buf) else {
            tracing::warn!("Skipping unsafe archive entry {}", entry.name());
            continue;
        };
        if relative.starts_with("__MACOSX") {
            continue;
        }
        let out_path: PathBuf = destination.join(relative);

        if entry.is_dir() {
            fs::create_dir_all(&out_path)?;
            continue;
        }

        if let Some(parent) = out_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut out_file = File::create(&out_path)?;
        io::copy(&mut entry, &mut out_file)?;
        written += 1;
    }

    tracing::debug!(
        "Extracted {} files from {} into {}",
        written,
        archive.display(),
        destination.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn create_test_zip(path: &Path, files: &[(&str, &str)]) {
        let file = File::create(path).unwrap();
        let mut zip = zip::ZipWriter::new(file);
        let options =
            zip::write::FileOptions::default().compression_method(zip::CompressionMethod::Stored);

        for (name, content) in files {
            zip.start_file(*name, options).unwrap();
            zip.write_all(content.as_bytes()).unwrap();
        }
        zip.finish().unwrap();
    }

    #[tokio::test]
    async fn test_extract_creates_destination() {
        let temp_dir = TempDir::new().unwrap();
        let archive = temp_dir.path().join("1.0_abc.zip");
        create_test_zip(
            &archive,
            &[
                ("widget/plugin.cfg", "[plugin]\nname=\"Widget\""),
                ("widget/widget.gd", "extends Node"),
            ],
        );
        let destination = temp_dir.path().join("project/addons");

        ZipExtractor::new().extract(&archive, &destination).await.unwrap();

        assert_eq!(
            fs::read_to_string(destination.join("widget/widget.gd")).unwrap(),
            "extends Node"
        );
        assert!(destination.join("widget/plugin.cfg").exists());
    }

    #[tokio::test]
    async fn test_extract_overwrites_existing_files() {
        let temp_dir = TempDir::new().unwrap();
        let archive = temp_dir.path().join("1.1_def.zip");
        create_test_zip(&archive, &[("widget/widget.gd", "extends Node2D")]);
        let destination = temp_dir.path().join("addons");
        fs::create_dir_all(destination.join("widget")).unwrap();
        fs::write(destination.join("widget/widget.gd"), "old contents").unwrap();

        ZipExtractor::new().extract(&archive, &destination).await.unwrap();

        assert_eq!(
            fs::read_to_string(destination.join("widget/widget.gd")).unwrap(),
            "extends Node2D"
        );
    }

    #[tokio::test]
    async fn test_extract_skips_macos_metadata() {
        let temp_dir = TempDir::new().unwrap();
        let archive = temp_dir.path().join("1.0_abc.zip");
        create_test_zip(
            &archive,
            &[("__MACOSX/widget/._widget.gd", "junk"), ("widget/widget.gd", "extends Node")],
        );
        let destination = temp_dir.path().join("addons");

        ZipExtractor::new().extract(&archive, &destination).await.unwrap();

        assert!(!destination.join("__MACOSX").exists());
        assert!(destination.join("widget/widget.gd").exists());
    }

    #[tokio::test]
    async fn test_extract_rejects_corrupt_archive() {
        let temp_dir = TempDir::new().unwrap();
        let archive = temp_dir.path().join("1.0_abc.zip");
        fs::write(&archive, b"this is not a zip file").unwrap();

        let result = ZipExtractor::new()
            .extract(&archive, &temp_dir.path().join("addons"))
            .await;

        assert!(matches!(result, Err(BackendError::Archive(_))));
    }

    #[tokio::test]
    async fn test_extract_missing_archive() {
        let temp_dir = TempDir::new().unwrap();
        let result = ZipExtractor::new()
            .extract(&temp_dir.path().join("missing.zip"), temp_dir.path())
            .await;
        assert!(matches!(result, Err(BackendError::Io(_))));
    }
}
