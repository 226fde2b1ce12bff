use std::env;

use anyhow::Result;

/// Production endpoint used when no base URL is configured.
pub const DEFAULT_BASE_URL: &str = "https://api.safecomms.dev";

/// Connection settings for a [`SafeCommsClient`](crate::SafeCommsClient).
///
/// Library callers build this directly. The CLI loads it from environment
/// variables via [`ClientConfig::from_env`]; the .env file is loaded at
/// startup via dotenvy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientConfig {
    /// Bearer credential. Sent as `Authorization: Bearer <api_key>` unless empty.
    pub api_key: String,
    /// Overrides [`DEFAULT_BASE_URL`] when set (useful for testing or staging).
    pub base_url: Option<String>,
}

impl ClientConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: None,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// The endpoint requests are sent to, without a trailing slash.
    pub fn resolved_base_url(&self) -> &str {
        self.base_url
            .as_deref()
            .filter(|url| !url.is_empty())
            .unwrap_or(DEFAULT_BASE_URL)
            .trim_end_matches('/')
    }

    /// Load configuration from environment variables.
    ///
    /// `SAFECOMMS_API_KEY` holds the credential and `SAFECOMMS_BASE_URL`
    /// optionally points at a different deployment. Neither is required
    /// here; call [`require_api_key`](Self::require_api_key) before use.
    pub fn from_env() -> Self {
        Self {
            api_key: env::var("SAFECOMMS_API_KEY").unwrap_or_default(),
            base_url: env::var("SAFECOMMS_BASE_URL")
                .ok()
                .filter(|url| !url.is_empty()),
        }
    }

    /// Check that an API key is configured.
    /// Call this before any operation that talks to the API.
    pub fn require_api_key(&self) -> Result<()> {
        if self.api_key.is_empty() {
            anyhow::bail!(
                "SAFECOMMS_API_KEY not set. Add it to your .env file or export it \
                 in your shell."
            );
        }
        Ok(())
    }
}
