//! Update Decision Engine
//!
//! One pass of the bootstrap update sequence:
//!
//! ```text
//! CheckActivated ─(active)─────────────────────────────────────────▶ Done
//!       │
//!       ▼
//! LoadSettings → FetchManifest → Download → VerifyOrDiscard → EnsureArtifactPresent → Done
//! ```
//!
//! Only three things are fatal: the install directory cannot be created, no
//! artifact exists once every recovery path is exhausted, and the host
//! refuses the registration. Everything else degrades to "use what is local".

use super::download::ArtifactFetcher;
use super::manifest::{ChannelEntry, ManifestSource, RemoteManifest};
use super::state::{LocalInstallState, UpdateOutcome, UpdateReport};
use super::verify;
use crate::engine::activation::{artifact_url, ArtifactRegistrar};
use crate::engine::config::Settings;
use crate::engine::error::BootstrapError;
use crate::engine::layout::InstallLayout;
use tracing::{debug, info, warn};

/// Drives the update sequence for one artifact
pub struct UpdateEngine<'a> {
    layout: &'a InstallLayout,
    manifest_url: String,
    manifest_source: &'a dyn ManifestSource,
    fetcher: &'a dyn ArtifactFetcher,
}

impl<'a> UpdateEngine<'a> {
    pub fn new(
        layout: &'a InstallLayout,
        manifest_url: impl Into<String>,
        manifest_source: &'a dyn ManifestSource,
        fetcher: &'a dyn ArtifactFetcher,
    ) -> Self {
        Self {
            layout,
            manifest_url: manifest_url.into(),
            manifest_source,
            fetcher,
        }
    }

    /// Run the sequence with settings read from the install directory
    pub fn run(&self, registrar: &mut dyn ArtifactRegistrar) -> Result<UpdateReport, BootstrapError> {
        self.run_inner(registrar, || Settings::load(&self.layout.settings_path()))
    }

    /// Run the sequence with settings supplied by the caller
    pub fn run_with(
        &self,
        settings: Settings,
        registrar: &mut dyn ArtifactRegistrar,
    ) -> Result<UpdateReport, BootstrapError> {
        self.run_inner(registrar, || settings)
    }

    fn run_inner(
        &self,
        registrar: &mut dyn ArtifactRegistrar,
        load_settings: impl FnOnce() -> Settings,
    ) -> Result<UpdateReport, BootstrapError> {
        let artifact_path = self.layout.artifact_path();
        let url = artifact_url(&artifact_path)?;

        if registrar.is_active(&url) {
            debug!(%url, "artifact already active, skipping update check");
            return Ok(UpdateReport {
                outcome: UpdateOutcome::SkippedAlreadyActive,
                artifact_path,
                local_digest: None,
            });
        }

        let settings = load_settings();
        debug!(auto_update = settings.auto_update, channel = %settings.channel, "settings resolved");

        self.layout
            .init()
            .map_err(|source| BootstrapError::InstallDir {
                path: self.layout.base_dir().to_path_buf(),
                source,
            })?;

        let mut local = LocalInstallState::read(&artifact_path);
        let outcome = self.update(&settings, &mut local);

        if !local.exists() {
            return Err(BootstrapError::ArtifactMissing(artifact_path));
        }

        registrar.register(&url)?;
        info!(path = %artifact_path.display(), %outcome, "artifact ready");

        Ok(UpdateReport {
            outcome,
            artifact_path,
            local_digest: local.known_digest().map(str::to_string),
        })
    }

    /// Fetch the manifest and, if the local artifact is stale, replace it
    fn update(&self, settings: &Settings, local: &mut LocalInstallState) -> UpdateOutcome {
        if !settings.auto_update {
            debug!("automatic updates disabled");
            return UpdateOutcome::NoManifestEntry;
        }

        let Some(manifest) = self
            .manifest_source
            .fetch(&self.manifest_url)
            .and_then(RemoteManifest::from_value)
        else {
            debug!(url = %self.manifest_url, "no manifest available");
            return UpdateOutcome::NoManifestEntry;
        };

        let Some(entry) = manifest.entry(settings.channel) else {
            debug!(channel = %settings.channel, "manifest has no usable entry for channel");
            return UpdateOutcome::NoManifestEntry;
        };

        if !local.is_stale(&entry.sha256) {
            debug!(digest = %entry.sha256, "artifact already current");
            return UpdateOutcome::AlreadyCurrent;
        }

        info!(url = %entry.url, channel = %settings.channel, "updating artifact");
        self.download_and_promote(&entry, local)
    }

    fn download_and_promote(&self, entry: &ChannelEntry, local: &mut LocalInstallState) -> UpdateOutcome {
        let temp = self.layout.temp_artifact_path();
        if let Err(e) = self.layout.cleanup_temp() {
            warn!(path = %temp.display(), error = %e, "could not remove stale download");
        }

        match self.fetcher.download(&entry.url, &temp) {
            Ok(result) => debug!(bytes = result.bytes_downloaded, "artifact downloaded"),
            Err(e) => {
                warn!(url = %entry.url, error = %e, "failed to download artifact, continuing with previous");
                self.discard_temp();
                return UpdateOutcome::DownloadFailed;
            }
        }

        let actual = verify::digest(&temp);
        if !verify::digest_matches(&actual, &entry.sha256) {
            warn!(expected = %entry.sha256, %actual, "downloaded artifact failed verification, continuing with previous");
            self.discard_temp();
            return UpdateOutcome::DownloadFailed;
        }

        if let Err(e) = self.layout.promote_temp() {
            warn!(error = %e, "could not replace artifact, continuing with previous");
            self.discard_temp();
            return UpdateOutcome::DownloadFailed;
        }

        local.refresh(Some(actual));
        info!(path = %local.artifact_path().display(), "artifact updated");
        UpdateOutcome::Updated
    }

    fn discard_temp(&self) {
        if let Err(e) = self.layout.cleanup_temp() {
            warn!(path = %self.layout.temp_artifact_path().display(), error = %e, "could not remove download");
        }
    }
}
