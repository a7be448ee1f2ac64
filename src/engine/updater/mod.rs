//! Artifact Update System
//!
//! Keeps the local artifact current with the remote manifest, verifying every
//! download before it replaces the live file.
//!
//! Components:
//! - `engine` - Update decision state machine
//! - `state` - Local install state and update outcome
//! - `manifest` - Remote manifest fetch and lookup
//! - `download` - HTTP download to a staging file
//! - `verify` - SHA-256 checksums
//! - `http` - Shared client options

pub mod download;
pub mod engine;
pub mod http;
pub mod manifest;
pub mod state;
pub mod verify;

pub use download::{ArtifactFetcher, DownloadError, DownloadResult, Downloader};
pub use engine::UpdateEngine;
pub use http::HttpOptions;
pub use manifest::{ChannelEntry, HttpManifestClient, ManifestSource, RemoteManifest};
pub use state::{LocalInstallState, UpdateOutcome, UpdateReport};
