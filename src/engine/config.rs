//! Bootstrap Configuration Module
//!
//! Two layers: the user-editable settings file living next to the artifact,
//! and the compiled-in deployment profile describing which artifact to fetch.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Settings file not found: {0}")]
    NotFound(PathBuf),
    #[error("Failed to read settings: {0}")]
    ReadError(#[from] std::io::Error),
    #[error("Invalid settings format: {0}")]
    ParseError(#[from] serde_json::Error),
    #[error("Settings document is not a JSON object")]
    NotAnObject,
}

/// Release track selecting which manifest entry is honoured
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    #[default]
    Release,
    Snapshot,
}

impl Channel {
    /// Key used for this channel in the manifest document
    pub fn as_key(&self) -> &'static str {
        match self {
            Channel::Release => "release",
            Channel::Snapshot => "snapshot",
        }
    }

    /// Numeric form stored in the settings file: 0 is release, anything else
    /// is snapshot
    pub fn from_index(index: i64) -> Self {
        if index == 0 {
            Channel::Release
        } else {
            Channel::Snapshot
        }
    }

    pub fn index(&self) -> i64 {
        match self {
            Channel::Release => 0,
            Channel::Snapshot => 1,
        }
    }
}

impl std::fmt::Display for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_key())
    }
}

/// User settings read from the install directory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub auto_update: bool,
    pub channel: Channel,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            auto_update: true,
            channel: Channel::Release,
        }
    }
}

impl Settings {
    /// Load settings, falling back to defaults for anything unreadable.
    ///
    /// Never fails: a missing file, a parse error and a missing field all
    /// resolve to the default for the affected fields.
    pub fn load(path: &Path) -> Self {
        match Self::try_load(path) {
            Ok(settings) => settings,
            Err(e) => {
                debug!(path = %path.display(), error = %e, "using default settings");
                Self::default()
            }
        }
    }

    /// Load settings, reporting why the document as a whole is unusable.
    /// Individual missing or mistyped fields still fall back silently.
    pub fn try_load(path: &Path) -> Result<Self, SettingsError> {
        if !path.exists() {
            return Err(SettingsError::NotFound(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path)?;
        let value: Value = serde_json::from_str(&content)?;
        Self::from_value(&value).ok_or(SettingsError::NotAnObject)
    }

    /// Field-by-field extraction from a parsed document
    pub fn from_value(value: &Value) -> Option<Self> {
        let object = value.as_object()?;
        let defaults = Self::default();

        let auto_update = object
            .get("autoUpdate")
            .and_then(Value::as_bool)
            .unwrap_or(defaults.auto_update);

        let channel = object
            .get("updateChannel")
            .and_then(|v| v.as_i64().or_else(|| v.as_f64().map(|f| f.trunc() as i64)))
            .map(Channel::from_index)
            .unwrap_or(defaults.channel);

        Some(Self {
            auto_update,
            channel,
        })
    }

    /// Save settings atomically in the on-disk format
    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        let content = serde_json::to_string_pretty(&serde_json::json!({
            "autoUpdate": self.auto_update,
            "updateChannel": self.channel.index(),
        }))?;

        let temp_path = path.with_extension("tmp");
        std::fs::write(&temp_path, &content)?;
        std::fs::rename(&temp_path, path)?;
        Ok(())
    }

    /// Copy with remote checks disabled for this run
    pub fn offline(self) -> Self {
        Self {
            auto_update: false,
            ..self
        }
    }

    pub fn with_channel(self, channel: Channel) -> Self {
        Self { channel, ..self }
    }
}

/// Deployment profile: which artifact, where it lives, where to ask for it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BootstrapConfig {
    pub install_dir: PathBuf,
    pub artifact_name: String,
    /// Platform/version string the artifact is built for
    pub target: String,
    #[serde(default = "default_extension")]
    pub extension: String,
    #[serde(default = "default_manifest_base_url")]
    pub manifest_base_url: String,
    /// Well-known entry point instantiated after activation
    #[serde(default = "default_entry_point")]
    pub entry_point: String,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_settings_file")]
    pub settings_file: String,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

pub const DEFAULT_ARTIFACT_NAME: &str = "Companion";
pub const DEFAULT_TARGET: &str = "1.8.9-forge";

fn default_extension() -> String {
    "jar".to_string()
}

fn default_manifest_base_url() -> String {
    "https://api.artifact-bootstrap.dev".to_string()
}

fn default_entry_point() -> String {
    "companion.internal.plugin.LoadingPlugin".to_string()
}

fn default_user_agent() -> String {
    crate::engine::updater::http::DEFAULT_USER_AGENT.to_string()
}

fn default_settings_file() -> String {
    format!("{}.json", DEFAULT_ARTIFACT_NAME)
}

/// Default install directory for an artifact: the platform data directory,
/// or the working directory when there is none
pub fn default_install_dir(artifact_name: &str) -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join(artifact_name))
        .unwrap_or_else(|| PathBuf::from(artifact_name))
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            install_dir: default_install_dir(DEFAULT_ARTIFACT_NAME),
            artifact_name: DEFAULT_ARTIFACT_NAME.to_string(),
            target: DEFAULT_TARGET.to_string(),
            extension: default_extension(),
            manifest_base_url: default_manifest_base_url(),
            entry_point: default_entry_point(),
            user_agent: default_user_agent(),
            settings_file: default_settings_file(),
            timeout_secs: None,
        }
    }
}

impl BootstrapConfig {
    /// Versioned manifest endpoint for this artifact and target
    pub fn manifest_url(&self) -> String {
        format!(
            "{}/{}/{}",
            self.manifest_base_url.trim_end_matches('/'),
            self.artifact_name.to_lowercase(),
            self.target
        )
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    #[test]
    fn test_settings_defaults_when_missing() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.json");
        assert_eq!(Settings::load(&path), Settings::default());
        assert!(matches!(Settings::try_load(&path), Err(SettingsError::NotFound(_))));
    }

    #[test]
    fn test_settings_defaults_when_malformed() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "{ autoUpdate: nope").unwrap();
        assert_eq!(Settings::load(&path), Settings::default());
        assert!(matches!(Settings::try_load(&path), Err(SettingsError::ParseError(_))));

        std::fs::write(&path, "[true, 1]").unwrap();
        assert_eq!(Settings::load(&path), Settings::default());
        assert!(matches!(Settings::try_load(&path), Err(SettingsError::NotAnObject)));
    }

    #[test]
    fn test_settings_field_level_fallback() {
        let only_channel = Settings::from_value(&json!({ "updateChannel": 1 })).unwrap();
        assert!(only_channel.auto_update);
        assert_eq!(only_channel.channel, Channel::Snapshot);

        let only_update = Settings::from_value(&json!({ "autoUpdate": false })).unwrap();
        assert!(!only_update.auto_update);
        assert_eq!(only_update.channel, Channel::Release);

        let mistyped = Settings::from_value(&json!({
            "autoUpdate": "false",
            "updateChannel": "snapshot",
        }))
        .unwrap();
        assert_eq!(mistyped, Settings::default());
    }

    #[test]
    fn test_string_values_are_not_coerced() {
        let quoted = Settings::from_value(&json!({
            "autoUpdate": "false",
            "updateChannel": "1",
        }))
        .unwrap();
        assert!(quoted.auto_update);
        assert_eq!(quoted.channel, Channel::Release);
    }

    #[test]
    fn test_channel_index_mapping() {
        assert_eq!(Channel::from_index(0), Channel::Release);
        assert_eq!(Channel::from_index(1), Channel::Snapshot);
        assert_eq!(Channel::from_index(7), Channel::Snapshot);
        assert_eq!(Channel::from_index(-1), Channel::Snapshot);

        let truncated = Settings::from_value(&json!({ "updateChannel": 0.5 })).unwrap();
        assert_eq!(truncated.channel, Channel::Release);
    }

    #[test]
    fn test_settings_round_trip_on_disk() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let settings = Settings {
            auto_update: false,
            channel: Channel::Snapshot,
        };
        settings.save(&path).unwrap();

        let raw: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw, json!({ "autoUpdate": false, "updateChannel": 1 }));
        assert_eq!(Settings::load(&path), settings);
    }

    #[test]
    fn test_overrides() {
        let settings = Settings::default().offline().with_channel(Channel::Snapshot);
        assert!(!settings.auto_update);
        assert_eq!(settings.channel, Channel::Snapshot);
    }

    #[test]
    fn test_manifest_url() {
        let config = BootstrapConfig {
            manifest_base_url: "https://api.example.com/".to_string(),
            ..BootstrapConfig::default()
        };
        assert_eq!(config.manifest_url(), "https://api.example.com/companion/1.8.9-forge");
    }
}
