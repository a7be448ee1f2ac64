//! Fatal bootstrap errors.
//!
//! Everything else the bootstrap runs into is logged and degraded; these are
//! the conditions under which the host cannot continue.

use crate::engine::activation::ActivationError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BootstrapError {
    #[error("Could not create install directory {path}: {source}")]
    InstallDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Artifact does not exist at {0} and could not be downloaded")]
    ArtifactMissing(PathBuf),
    #[error("Activation failed: {0}")]
    Activation(#[from] ActivationError),
}
