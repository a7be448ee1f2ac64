//! Host registration port.

use super::ActivationError;
use reqwest::Url;
use tracing::debug;

/// Port through which the bootstrap makes an artifact loadable by the host.
///
/// The update engine calls `register` at most once per boot.
pub trait ArtifactRegistrar {
    /// Whether the artifact at `url` is already part of the host's active
    /// execution context
    fn is_active(&self, url: &Url) -> bool;

    /// Append the artifact to the host's search paths
    fn register(&mut self, url: &Url) -> Result<(), ActivationError>;
}

/// In-process host keeping two ordered search paths: the bootstrap's own and
/// its parent's. An artifact counts as active once the parent can see it.
#[derive(Debug, Default, Clone)]
pub struct SearchPathHost {
    own: Vec<Url>,
    parent: Vec<Url>,
}

impl SearchPathHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn own_search_path(&self) -> &[Url] {
        &self.own
    }

    pub fn parent_search_path(&self) -> &[Url] {
        &self.parent
    }
}

impl ArtifactRegistrar for SearchPathHost {
    fn is_active(&self, url: &Url) -> bool {
        self.parent.contains(url)
    }

    fn register(&mut self, url: &Url) -> Result<(), ActivationError> {
        if url.scheme() != "file" {
            return Err(ActivationError::Registration {
                url: url.clone(),
                reason: "only file URLs can be registered".to_string(),
            });
        }
        self.own.push(url.clone());
        self.parent.push(url.clone());
        debug!(%url, "artifact added to search paths");
        Ok(())
    }
}
