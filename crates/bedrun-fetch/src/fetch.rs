use std::path::{Path, PathBuf};

use futures_util::StreamExt;
use reqwest::Client;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::options::{FetchOptions, Progress};
use crate::retry::retry_delay;
use crate::verify::check_sha256;

pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Download `url` to `dest`, retrying with exponential backoff.
    ///
    /// The transfer streams into `<dest>.part` and is renamed over `dest`
    /// only once size and checksum validation pass.
    pub async fn fetch(&self, url: &str, dest: &Path, options: &FetchOptions) -> Result<PathBuf> {
        let attempts = options.attempts();
        let mut retry = 0;

        loop {
            match self.try_fetch(url, dest, options).await {
                Ok(path) => return Ok(path),
                Err(err) if retry + 1 < attempts => {
                    let delay = retry_delay(retry, options.retry_base);
                    warn!(%url, attempt = retry + 1, ?delay, "download failed: {err}, retrying");
                    tokio::time::sleep(delay).await;
                    retry += 1;
                }
                Err(err) => {
                    return Err(Error::RetriesExhausted {
                        url: url.to_string(),
                        attempts,
                        source: Box::new(err),
                    });
                }
            }
        }
    }

    async fn try_fetch(&self, url: &str, dest: &Path, options: &FetchOptions) -> Result<PathBuf> {
        let parent = dest
            .parent()
            .ok_or_else(|| Error::InvalidDestination(dest.to_path_buf()))?;

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let total_bytes = response.content_length();
        let part = staging_path(parent, dest);

        let result = self
            .stream_to(response, &part, total_bytes, options)
            .await
            .and_then(|bytes| {
                if bytes < options.min_bytes {
                    return Err(Error::TooSmall {
                        bytes,
                        min: options.min_bytes,
                    });
                }
                if let Some(expected) = &options.sha256 {
                    check_sha256(&part, expected)?;
                }
                Ok(bytes)
            });

        match result {
            Ok(bytes) => {
                tokio::fs::rename(&part, dest).await?;
                info!(%url, bytes, dest = %dest.display(), "download complete");
                Ok(dest.to_path_buf())
            }
            Err(err) => {
                let _ = tokio::fs::remove_file(&part).await;
                Err(err)
            }
        }
    }

    async fn stream_to(
        &self,
        response: reqwest::Response,
        part: &Path,
        total_bytes: Option<u64>,
        options: &FetchOptions,
    ) -> Result<u64> {
        let mut file = File::create(part).await?;
        let mut stream = response.bytes_stream();
        let mut fetched = 0u64;

        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            file.write_all(&chunk).await?;
            fetched += chunk.len() as u64;

            if let Some(callback) = &options.on_progress {
                callback(Progress {
                    bytes_fetched: fetched,
                    total_bytes,
                });
            }
        }

        file.flush().await?;
        file.sync_all().await?;
        debug!(bytes = fetched, part = %part.display(), "stream finished");
        Ok(fetched)
    }
}

/// Try each URL in priority order until one succeeds.
pub async fn fetch_first(
    fetcher: &Fetcher,
    urls: &[String],
    dest: &Path,
    options: &FetchOptions,
) -> Result<PathBuf> {
    if urls.is_empty() {
        return Err(Error::NoSources);
    }

    let mut last = Error::NoSources;
    for (index, url) in urls.iter().enumerate() {
        info!(source = index + 1, total = urls.len(), %url, "trying source");
        match fetcher.fetch(url, dest, options).await {
            Ok(path) => return Ok(path),
            Err(err) => {
                warn!(source = index + 1, "source failed: {err}");
                last = err;
            }
        }
    }

    Err(Error::AllSourcesFailed {
        tried: urls.len(),
        source: Box::new(last),
    })
}

fn staging_path(parent: &Path, dest: &Path) -> PathBuf {
    let name = dest
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "download".to_string());
    parent.join(format!(".{name}.part"))
}
