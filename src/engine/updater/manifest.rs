//! Remote Manifest
//!
//! Fetches the per-channel version manifest and extracts the download URL and
//! expected digest for the configured channel.
//!
//! Every failure here is soft: a missing, unreachable or malformed manifest
//! simply means "no update available" for this run.

use super::http::HttpOptions;
use crate::engine::config::Channel;
use reqwest::blocking::Client;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, warn};

/// Source of manifest documents
pub trait ManifestSource {
    /// Fetch and parse the document at `url`. `None` covers every failure.
    fn fetch(&self, url: &str) -> Option<Value>;
}

/// Download location and expected digest for one channel
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChannelEntry {
    pub url: String,
    pub sha256: String,
}

/// Parsed manifest document, keyed by channel name
#[derive(Debug, Clone)]
pub struct RemoteManifest {
    channels: Map<String, Value>,
}

impl RemoteManifest {
    /// Wrap a fetched document. Anything other than a JSON object is
    /// treated the same as no manifest at all.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(channels) => Some(Self { channels }),
            other => {
                debug!(kind = json_kind(&other), "manifest is not a JSON object");
                None
            }
        }
    }

    /// Entry for a channel, if it carries both a `url` and a `sha256` string
    pub fn entry(&self, channel: Channel) -> Option<ChannelEntry> {
        let entry = self.channels.get(channel.as_key())?.as_object()?;
        let url = entry.get("url")?.as_str()?;
        let sha256 = entry.get("sha256")?.as_str()?;
        Some(ChannelEntry {
            url: url.to_string(),
            sha256: sha256.to_string(),
        })
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// HTTP implementation of [`ManifestSource`]
pub struct HttpManifestClient {
    client: Client,
}

impl HttpManifestClient {
    pub fn new(options: &HttpOptions) -> Self {
        Self {
            client: options.build_client(options.https_only),
        }
    }
}

impl Default for HttpManifestClient {
    fn default() -> Self {
        Self::new(&HttpOptions::default())
    }
}

impl ManifestSource for HttpManifestClient {
    fn fetch(&self, url: &str) -> Option<Value> {
        let response = match self.client.get(url).send() {
            Ok(response) => response,
            Err(e) => {
                debug!(url, error = %e, "manifest request failed");
                return None;
            }
        };

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            warn!(url, status = status.as_u16(), "manifest request failed");
            return None;
        }

        let body = match response.text() {
            Ok(body) => body,
            Err(e) => {
                debug!(url, error = %e, "could not read manifest body");
                return None;
            }
        };

        match serde_json::from_str(&body) {
            Ok(value) => Some(value),
            Err(e) => {
                debug!(url, error = %e, "manifest is not valid JSON");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const SUM: &str = "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9";

    #[test]
    fn test_entry_for_channel() {
        let manifest = RemoteManifest::from_value(json!({
            "release": { "url": "https://cdn.example/a.jar", "sha256": SUM },
            "snapshot": { "url": "https://cdn.example/b.jar", "sha256": "00" },
        }))
        .unwrap();

        assert_eq!(
            manifest.entry(Channel::Release),
            Some(ChannelEntry {
                url: "https://cdn.example/a.jar".to_string(),
                sha256: SUM.to_string(),
            })
        );
        assert_eq!(manifest.entry(Channel::Snapshot).unwrap().sha256, "00");
    }

    #[test]
    fn test_missing_channel() {
        let manifest = RemoteManifest::from_value(json!({
            "release": { "url": "https://cdn.example/a.jar", "sha256": SUM },
        }))
        .unwrap();
        assert!(manifest.entry(Channel::Snapshot).is_none());
    }

    #[test]
    fn test_incomplete_entries() {
        let manifest = RemoteManifest::from_value(json!({
            "release": { "url": "https://cdn.example/a.jar" },
            "snapshot": { "sha256": SUM },
        }))
        .unwrap();
        assert!(manifest.entry(Channel::Release).is_none());
        assert!(manifest.entry(Channel::Snapshot).is_none());
    }

    #[test]
    fn test_non_string_fields_are_missing() {
        let manifest = RemoteManifest::from_value(json!({
            "release": { "url": 42, "sha256": SUM },
            "snapshot": "https://cdn.example/b.jar",
        }))
        .unwrap();
        assert!(manifest.entry(Channel::Release).is_none());
        assert!(manifest.entry(Channel::Snapshot).is_none());
    }

    #[test]
    fn test_non_object_document() {
        assert!(RemoteManifest::from_value(json!([1, 2, 3])).is_none());
        assert!(RemoteManifest::from_value(json!("release")).is_none());
        assert!(RemoteManifest::from_value(Value::Null).is_none());
    }

    #[test]
    fn test_plain_http_refused_by_default() {
        let client = HttpManifestClient::default();
        assert!(client.fetch("http://127.0.0.1:9/manifest").is_none());
    }
}
