//! Bootstrap CLI Module
//! Command-line interface for inspecting and driving the artifact updater

use crate::engine::config::{default_install_dir, BootstrapConfig, Channel};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "artifact-bootstrap")]
#[command(author = "Artifact Bootstrap Team")]
#[command(version)]
#[command(about = "Fetch, verify and install the companion artifact", long_about = None)]
pub struct Cli {
    /// Install directory (defaults to the platform data directory)
    #[arg(short, long, global = true)]
    pub install_dir: Option<PathBuf>,

    /// Artifact name
    #[arg(long, global = true)]
    pub artifact: Option<String>,

    /// Platform/version target of the artifact
    #[arg(short, long, global = true)]
    pub target: Option<String>,

    /// Base URL of the manifest service
    #[arg(long, global = true)]
    pub manifest_url: Option<String>,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// Verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format (json for scripting)
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check for an update and make sure the artifact is installed
    Ensure {
        /// Skip the remote check for this run
        #[arg(long)]
        offline: bool,

        /// Override the configured update channel
        #[arg(short, long)]
        channel: Option<Channel>,
    },

    /// Show settings, paths and the installed artifact
    Status,

    /// Print the SHA-256 digest of a file
    Digest {
        /// File to hash
        file: PathBuf,
    },

    /// Fetch the manifest entry for the configured channel
    Manifest {
        /// Override the configured update channel
        #[arg(short, long)]
        channel: Option<Channel>,
    },
}

impl Cli {
    /// Deployment profile with command-line overrides applied
    pub fn bootstrap_config(&self) -> BootstrapConfig {
        let mut config = BootstrapConfig::default();

        if let Some(artifact) = &self.artifact {
            config.artifact_name = artifact.clone();
            config.settings_file = format!("{}.json", artifact);
            config.install_dir = default_install_dir(artifact);
        }
        if let Some(dir) = &self.install_dir {
            config.install_dir = dir.clone();
        }
        if let Some(target) = &self.target {
            config.target = target.clone();
        }
        if let Some(url) = &self.manifest_url {
            config.manifest_base_url = url.clone();
        }
        if self.timeout.is_some() {
            config.timeout_secs = self.timeout;
        }

        config
    }
}
