//! Install Layout
//!
//! Deterministic paths inside the install directory: the settings file, the
//! live artifact and the staging file used while downloading.

use crate::engine::config::BootstrapConfig;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Filesystem layout for one artifact target
#[derive(Debug, Clone)]
pub struct InstallLayout {
    base_dir: PathBuf,
    settings_file: String,
    artifact_file: String,
}

impl InstallLayout {
    pub fn new(config: &BootstrapConfig) -> Self {
        Self {
            base_dir: config.install_dir.clone(),
            settings_file: config.settings_file.clone(),
            artifact_file: format!(
                "{}-{}.{}",
                config.artifact_name, config.target, config.extension
            ),
        }
    }

    /// Create the install directory if it does not exist yet
    pub fn init(&self) -> io::Result<()> {
        fs::create_dir_all(&self.base_dir)
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn settings_path(&self) -> PathBuf {
        self.base_dir.join(&self.settings_file)
    }

    /// The live artifact
    pub fn artifact_path(&self) -> PathBuf {
        self.base_dir.join(&self.artifact_file)
    }

    /// Staging file for downloads, in the same directory as the artifact so
    /// promotion is a same-filesystem rename
    pub fn temp_artifact_path(&self) -> PathBuf {
        self.base_dir.join(format!("{}.partial", self.artifact_file))
    }

    pub fn has_artifact(&self) -> bool {
        self.artifact_path().is_file()
    }

    /// Remove a stale staging file left by an earlier run
    pub fn cleanup_temp(&self) -> io::Result<()> {
        let temp = self.temp_artifact_path();
        if temp.exists() {
            fs::remove_file(&temp)?;
        }
        Ok(())
    }

    /// Replace the live artifact with the staging file
    pub fn promote_temp(&self) -> io::Result<()> {
        fs::rename(self.temp_artifact_path(), self.artifact_path())
    }
}
