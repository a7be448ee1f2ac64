//! Update State
//!
//! Local install state and the outcome of one pass through the update engine.

use serde::Serialize;
use std::path::{Path, PathBuf};

use super::verify;

/// How an update pass ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdateOutcome {
    /// Local artifact already matches the manifest digest
    AlreadyCurrent,
    /// A verified download replaced the local artifact
    Updated,
    /// Download failed or did not verify; previous artifact kept
    DownloadFailed,
    /// No usable manifest entry (including updates disabled or unreachable)
    NoManifestEntry,
    /// Artifact was already active in the host; nothing checked
    SkippedAlreadyActive,
}

impl std::fmt::Display for UpdateOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            Self::AlreadyCurrent => "already current",
            Self::Updated => "updated",
            Self::DownloadFailed => "download failed, kept previous artifact",
            Self::NoManifestEntry => "no manifest entry",
            Self::SkippedAlreadyActive => "already active",
        };
        f.write_str(text)
    }
}

/// What is on disk at the artifact path.
///
/// Read once at startup and refreshed at most once, after a download.
#[derive(Debug, Clone)]
pub struct LocalInstallState {
    artifact_path: PathBuf,
    exists: bool,
    digest: Option<String>,
}

impl LocalInstallState {
    pub fn read(artifact_path: &Path) -> Self {
        Self {
            artifact_path: artifact_path.to_path_buf(),
            exists: artifact_path.is_file(),
            digest: None,
        }
    }

    pub fn artifact_path(&self) -> &Path {
        &self.artifact_path
    }

    pub fn exists(&self) -> bool {
        self.exists
    }

    /// Digest of the artifact, computed on first use
    pub fn digest(&mut self) -> &str {
        if self.digest.is_none() {
            self.digest = Some(if self.exists {
                verify::digest(&self.artifact_path)
            } else {
                String::new()
            });
        }
        self.digest.as_deref().unwrap_or_default()
    }

    /// Whether the artifact needs replacing to match `expected`.
    /// An unreadable artifact is always stale.
    pub fn is_stale(&mut self, expected: &str) -> bool {
        !self.exists || !verify::digest_matches(self.digest(), expected)
    }

    /// Re-read after the artifact was replaced
    pub fn refresh(&mut self, digest: Option<String>) {
        self.exists = self.artifact_path.is_file();
        self.digest = digest;
    }

    pub fn known_digest(&self) -> Option<&str> {
        self.digest.as_deref().filter(|d| !d.is_empty())
    }
}

/// Result of running the update engine
#[derive(Debug, Clone, Serialize)]
pub struct UpdateReport {
    pub outcome: UpdateOutcome,
    pub artifact_path: PathBuf,
    /// `None` when the digest was never needed
    pub local_digest: Option<String>,
}
