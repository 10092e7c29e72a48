//! Client configuration.
//!
//! A `ClientConfig` is assembled once by the caller, handed to `PinClient`,
//! and never changed afterwards. The base URL is stored without a trailing
//! slash so `format!("{base}/files")` never doubles the separator.

use std::fmt;
use std::time::Duration;

use tracing::warn;

pub const DEFAULT_BASE_URL: &str = "https://api.pinhub.com/api/v2";

pub const ENV_API_KEY: &str = "PINHUB_API_KEY";
pub const ENV_BASE_URL: &str = "PINHUB_BASE_URL";
pub const ENV_TIMEOUT_SECS: &str = "PINHUB_TIMEOUT_SECS";

#[derive(Clone)]
pub struct ClientConfig {
    credential: Option<String>,
    base_url: String,
    timeout: Option<Duration>,
}

impl ClientConfig {
    pub fn new() -> Self {
        Self {
            credential: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: None,
        }
    }

    pub fn with_credential(mut self, credential: impl Into<String>) -> Self {
        self.credential = Some(credential.into());
        self
    }

    pub fn with_base_url(mut self, base_url: impl AsRef<str>) -> Self {
        self.base_url = base_url.as_ref().trim_end_matches('/').to_string();
        self
    }

    /// Upper bound on each request, passed through to the transport.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Read `PINHUB_API_KEY`, `PINHUB_BASE_URL` and `PINHUB_TIMEOUT_SECS`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as `from_env`, reading variables through `lookup`. Empty values
    /// count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let mut config = Self::new();
        if let Some(credential) = get(ENV_API_KEY) {
            config = config.with_credential(credential.trim());
        }
        if let Some(base_url) = get(ENV_BASE_URL) {
            config = config.with_base_url(base_url.trim());
        }
        if let Some(raw) = get(ENV_TIMEOUT_SECS) {
            match raw.trim().parse::<u64>() {
                Ok(secs) => config = config.with_timeout(Duration::from_secs(secs)),
                Err(e) => warn!(value = %raw, error = %e, "ignoring invalid {ENV_TIMEOUT_SECS}"),
            }
        }
        config
    }

    pub fn credential(&self) -> Option<&str> {
        self.credential.as_deref()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("credential", &self.credential.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}
