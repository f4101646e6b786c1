// erutcurts: Minecraft Bedrock structure converter for Discord
//
// SPDX-FileCopyrightText: 2023 Risu
// SPDX-License-Identifier: MIT

//! Network module with async downloads.
//!
//! ```text
//! Downloader::new()
//!   .url() .file() .header() .silent()
//!        |
//!        +-------------+----------------+
//!        v             v                v
//!   download()   download_bytes()  download_string()
//!   (to file)    (in memory)       (text / JSON documents)
//!
//! Global client: OnceLock, connection pool, keep-alive
//! Failure:       partial file removed, NetworkError carries status + url
//! ```

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use futures_util::StreamExt;
use reqwest::{Client, Response};
use tokio::io::AsyncWriteExt;

use crate::error::{BotResult, NetworkError};
use crate::logging::LogReason;

/// RAII guard that removes a partial download file on Drop unless explicitly kept.
struct PartialFileGuard {
    path: PathBuf,
    keep: bool,
}

impl PartialFileGuard {
    const fn new(path: PathBuf) -> Self {
        Self { path, keep: false }
    }

    /// Mark the download as complete - file will NOT be deleted on drop.
    const fn keep(&mut self) {
        self.keep = true;
    }
}

impl Drop for PartialFileGuard {
    fn drop(&mut self) {
        if !self.keep {
            let _ = std::fs::remove_file(&self.path);
        }
    }
}

/// Global HTTP client - initialized once, reused across all downloads.
/// Falls back to a basic client if custom configuration fails.
pub fn global_client() -> &'static Client {
    static CLIENT: OnceLock<Client> = OnceLock::new();
    CLIENT.get_or_init(|| {
        Client::builder()
            .user_agent(format!("Erutcurts/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_else(|_| Client::new())
    })
}

/// Async HTTP downloader with builder pattern.
///
/// # Example
/// ```ignore
/// use erutcurts::net::Downloader;
///
/// Downloader::new()
///     .url(attachment.url.as_str())
///     .file(temp_dir.join("house.mcstructure"))
///     .download()
///     .await?;
/// ```
pub struct Downloader {
    client: Client,
    url: Option<String>,
    output_file: Option<PathBuf>,
    headers: Vec<(String, String)>,
    silent: bool,
}

impl Default for Downloader {
    fn default() -> Self {
        Self::new()
    }
}

impl Downloader {
    /// Create a new downloader using the shared client.
    #[must_use]
    pub fn new() -> Self {
        Self {
            client: global_client().clone(),
            url: None,
            output_file: None,
            headers: Vec::new(),
            silent: false,
        }
    }

    /// Set the URL to download from.
    #[must_use]
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Set the output file path.
    #[must_use]
    pub fn file(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_file = Some(path.into());
        self
    }

    /// Add a custom header.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Do not log completed downloads.
    #[must_use]
    pub const fn silent(mut self) -> Self {
        self.silent = true;
        self
    }

    fn require_url(&self) -> Result<&String, NetworkError> {
        self.url
            .as_ref()
            .ok_or_else(|| NetworkError::InvalidUrl("no URL provided".to_string()))
    }

    async fn send(&self, url: &str) -> Result<Response, NetworkError> {
        let mut request = self.client.get(url);
        for (name, value) in &self.headers {
            request = request.header(name.as_str(), value.as_str());
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(NetworkError::HttpError {
                status: response.status().as_u16(),
                url: url.to_string(),
            });
        }
        Ok(response)
    }

    fn log_done(&self, url: &str, bytes: u64) {
        if !self.silent {
            tracing::debug!(reason = %LogReason::Network, url, bytes, "Downloaded");
        }
    }

    /// Download to the configured file, streaming the body.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No URL or output file is configured.
    /// - The network request fails or returns a non-success status code.
    /// - Parent directories cannot be created.
    /// - The output file cannot be created or written to.
    pub async fn download(&self) -> BotResult<()> {
        let url = self.require_url()?;
        let output = self
            .output_file
            .as_ref()
            .ok_or_else(|| NetworkError::DownloadFailed {
                url: url.clone(),
                message: "no output file specified".to_string(),
            })?;
        let failed = |message: String| NetworkError::DownloadFailed {
            url: url.clone(),
            message,
        };

        let response = self.send(url).await?;

        if let Some(parent) = output.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                failed(format!(
                    "failed to create parent directory {}: {e}",
                    parent.display()
                ))
            })?;
        }

        let mut file = tokio::fs::File::create(output).await.map_err(|e| {
            failed(format!(
                "failed to create output file {}: {e}",
                output.display()
            ))
        })?;

        // RAII guard ensures partial file cleanup on any error path
        let mut guard = PartialFileGuard::new(output.clone());

        let mut written: u64 = 0;
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(NetworkError::Reqwest)?;
            file.write_all(&chunk)
                .await
                .map_err(|e| failed(format!("failed to write to {}: {e}", output.display())))?;
            written += chunk.len() as u64;
        }

        file.flush()
            .await
            .map_err(|e| failed(format!("failed to flush {}: {e}", output.display())))?;

        guard.keep();
        self.log_done(url, written);
        Ok(())
    }

    /// Download the body into memory.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or returns a non-success status code.
    pub async fn download_bytes(&self) -> BotResult<Vec<u8>> {
        let url = self.require_url()?;
        let response = self.send(url).await?;
        let bytes = response.bytes().await.map_err(NetworkError::Reqwest)?;
        self.log_done(url, bytes.len() as u64);
        Ok(bytes.to_vec())
    }

    /// Download and return content as string.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or returns a non-success status code.
    pub async fn download_string(&self) -> BotResult<String> {
        let url = self.require_url()?;
        let response = self.send(url).await?;
        let text = response.text().await.map_err(NetworkError::Reqwest)?;
        self.log_done(url, text.len() as u64);
        Ok(text)
    }
}

/// `dir/filename`, or `dir/stem_N.ext` with the smallest `N` that is free.
#[must_use]
pub fn unique_path(dir: &Path, filename: &str) -> PathBuf {
    let candidate = dir.join(filename);
    if !candidate.exists() {
        return candidate;
    }
    let (stem, extension) = match filename.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => (stem, Some(ext)),
        _ => (filename, None),
    };
    (1u32..)
        .map(|n| match extension {
            Some(ext) => dir.join(format!("{stem}_{n}.{ext}")),
            None => dir.join(format!("{stem}_{n}")),
        })
        .find(|path| !path.exists())
        .unwrap_or(candidate)
}
