//! Shared HTTP client construction for the manifest client and downloader.

use reqwest::blocking::Client;
use std::time::Duration;

/// Default identifying user agent
pub const DEFAULT_USER_AGENT: &str = "Artifact-Bootstrap";

/// Options shared by every outbound request
#[derive(Debug, Clone)]
pub struct HttpOptions {
    pub user_agent: String,
    /// `None` keeps the client's default timeout
    pub timeout: Option<Duration>,
    /// Refuse plain-text URLs
    pub https_only: bool,
}

impl Default for HttpOptions {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: None,
            https_only: true,
        }
    }
}

impl HttpOptions {
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn allow_plain_http(mut self) -> Self {
        self.https_only = false;
        self
    }

    /// Build a blocking client. Falls back to a default client if the
    /// configured one cannot be constructed.
    pub(crate) fn build_client(&self, https_only: bool) -> Client {
        let mut builder = Client::builder()
            .user_agent(self.user_agent.clone())
            .https_only(https_only);
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        builder.build().unwrap_or_default()
    }
}
