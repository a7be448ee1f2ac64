//! Artifact Activation
//!
//! The host-facing half of the bootstrap: registering the verified artifact
//! with the host's code search path, then resolving the artifact's entry
//! point and relaying lifecycle queries to it.
//!
//! Components:
//! - `host` - Search-path registration port and an in-process implementation
//! - `entry_point` - Entry-point capability, name-based resolution, and the
//!   delegating loader handed back to the host

pub mod entry_point;
pub mod host;

pub use entry_point::{ActivatedLoader, EntryPoint, EntryPointRegistry, EntryPointResolver};
pub use host::{ArtifactRegistrar, SearchPathHost};

use reqwest::Url;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ActivationError {
    #[error("Cannot express {0} as a file URL")]
    InvalidPath(PathBuf),
    #[error("Failed to register {url}: {reason}")]
    Registration { url: Url, reason: String },
    #[error("Entry point not found: {0}")]
    EntryPointNotFound(String),
    #[error("Failed to instantiate entry point {name}: {reason}")]
    Instantiation { name: String, reason: String },
}

/// File URL identifying an artifact on the host's search path
pub fn artifact_url(path: &Path) -> Result<Url, ActivationError> {
    let absolute =
        std::path::absolute(path).map_err(|_| ActivationError::InvalidPath(path.to_path_buf()))?;
    Url::from_file_path(&absolute).map_err(|_| ActivationError::InvalidPath(path.to_path_buf()))
}
