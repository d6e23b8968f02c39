//! HTTP archive download.

use super::ArchiveFetcher;
use crate::BackendError;
use async_trait::async_trait;
use futures::StreamExt;
use std::path::Path;
use std::time::Duration;
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// [`ArchiveFetcher`] that streams an HTTP response to disk.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Create a fetcher whose downloads are bounded by `timeout`.
    pub fn new(timeout: Duration) -> Result<Self, BackendError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("gibson/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl ArchiveFetcher for HttpFetcher {
    async fn fetch(&self, url: &str, destination: &Path) -> Result<(), BackendError> {
        tracing::info!("Downloading {} to {}", url, destination.display());

        let response = self.client.get(url).send().await?.error_for_status()?;

        let mut file = fs::File::create(destination).await?;
        let mut written: u64 = 0;
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            file.write_all(&chunk).await?;
            written += chunk.len() as u64;
        }
        file.flush().await?;

        tracing::debug!("Wrote {} bytes to {}", written, destination.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_unreachable_url_writes_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let destination = temp_dir.path().join("1.0_abc.zip");
        let fetcher = HttpFetcher::new(Duration::from_secs(2)).unwrap();

        let result = fetcher.fetch("http://127.0.0.1:9/widget.zip", &destination).await;

        assert!(matches!(result, Err(BackendError::Http(_))));
        assert!(!destination.exists());
    }
}
