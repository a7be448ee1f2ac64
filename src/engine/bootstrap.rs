//! Bootstrapper
//!
//! Wires the deployment profile to the HTTP clients and the update engine,
//! then resolves the artifact's entry point for the host.

use crate::engine::activation::{ActivatedLoader, ArtifactRegistrar, EntryPointResolver};
use crate::engine::config::{BootstrapConfig, Settings};
use crate::engine::error::BootstrapError;
use crate::engine::layout::InstallLayout;
use crate::engine::updater::{Downloader, HttpManifestClient, HttpOptions, UpdateEngine, UpdateReport};
use tracing::debug;

/// A finished boot: what the updater did, and the loader for the host
#[derive(Debug)]
pub struct BootResult {
    pub report: UpdateReport,
    pub loader: ActivatedLoader,
}

/// Run the update sequence, then resolve and construct the entry point.
///
/// The entry point is resolved even when the artifact was already active.
pub fn activate(
    engine: &UpdateEngine<'_>,
    settings: Option<Settings>,
    host: &mut dyn ArtifactRegistrar,
    resolver: &dyn EntryPointResolver,
    entry_point: &str,
) -> Result<BootResult, BootstrapError> {
    let report = match settings {
        Some(settings) => engine.run_with(settings, host)?,
        None => engine.run(host)?,
    };

    let loader = ActivatedLoader::new(resolver.resolve(entry_point)?);
    debug!(entry_point, "entry point instantiated");

    Ok(BootResult { report, loader })
}

/// Production wiring of the update engine
pub struct Bootstrapper {
    config: BootstrapConfig,
    layout: InstallLayout,
    manifest_client: HttpManifestClient,
    downloader: Downloader,
}

impl Bootstrapper {
    pub fn new(config: BootstrapConfig) -> Self {
        let options = HttpOptions::default()
            .with_user_agent(config.user_agent.clone())
            .with_timeout(config.timeout());

        Self {
            layout: InstallLayout::new(&config),
            manifest_client: HttpManifestClient::new(&options),
            downloader: Downloader::new(&options),
            config,
        }
    }

    pub fn config(&self) -> &BootstrapConfig {
        &self.config
    }

    pub fn layout(&self) -> &InstallLayout {
        &self.layout
    }

    pub fn manifest_client(&self) -> &HttpManifestClient {
        &self.manifest_client
    }

    pub fn engine(&self) -> UpdateEngine<'_> {
        UpdateEngine::new(
            &self.layout,
            self.config.manifest_url(),
            &self.manifest_client,
            &self.downloader,
        )
    }

    /// Settings as stored in the install directory
    pub fn settings(&self) -> Settings {
        Settings::load(&self.layout.settings_path())
    }

    /// Full boot using the on-disk settings
    pub fn boot(
        &self,
        host: &mut dyn ArtifactRegistrar,
        resolver: &dyn EntryPointResolver,
    ) -> Result<BootResult, BootstrapError> {
        activate(&self.engine(), None, host, resolver, &self.config.entry_point)
    }
}
