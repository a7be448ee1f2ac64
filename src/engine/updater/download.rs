//! HTTP Download Manager
//!
//! Streams an artifact to a staging file. The caller decides whether the
//! staged file is promoted; the downloader never touches the live artifact.

use super::http::HttpOptions;
use reqwest::blocking::Client;
use reqwest::header::{CACHE_CONTROL, PRAGMA};
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Download result with metadata
#[derive(Debug)]
pub struct DownloadResult {
    pub path: PathBuf,
    pub bytes_downloaded: u64,
}

/// Download error types
#[derive(Error, Debug)]
pub enum DownloadError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Invalid response: HTTP {0}")]
    Status(u16),
}

/// Anything that can place a remote artifact at a local path
pub trait ArtifactFetcher {
    fn download(&self, url: &str, dest: &Path) -> Result<DownloadResult, DownloadError>;
}

/// Download manager for artifact files
pub struct Downloader {
    client: Client,
}

impl Downloader {
    /// Create a new downloader
    pub fn new(options: &HttpOptions) -> Self {
        Self {
            client: options.build_client(false),
        }
    }
}

impl Default for Downloader {
    fn default() -> Self {
        Self::new(&HttpOptions::default())
    }
}

impl ArtifactFetcher for Downloader {
    /// Download `url` into `dest`, replacing whatever is there.
    ///
    /// A failure part-way through may leave a partial file at `dest`.
    fn download(&self, url: &str, dest: &Path) -> Result<DownloadResult, DownloadError> {
        let mut response = self
            .client
            .get(url)
            .header(CACHE_CONTROL, "no-cache")
            .header(PRAGMA, "no-cache")
            .send()?;

        if !response.status().is_success() {
            return Err(DownloadError::Status(response.status().as_u16()));
        }

        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut writer = BufWriter::new(File::create(dest)?);
        let bytes_downloaded = response.copy_to(&mut writer)?;
        writer.flush()?;
        writer.into_inner().map_err(|e| e.into_error())?.sync_all()?;

        debug!(url, path = %dest.display(), bytes = bytes_downloaded, "download complete");

        Ok(DownloadResult {
            path: dest.to_path_buf(),
            bytes_downloaded,
        })
    }
}
