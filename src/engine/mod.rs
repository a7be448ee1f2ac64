// Artifact bootstrap engine - core module structure
pub mod activation;
pub mod bootstrap;
pub mod cli;
pub mod config;
pub mod error;
pub mod layout;
pub mod logging;
pub mod updater;

pub use bootstrap::{activate, BootResult, Bootstrapper};
pub use config::{BootstrapConfig, Channel, Settings};
pub use error::BootstrapError;
pub use layout::InstallLayout;
