use std::time::Duration;

/// Default IEX Cloud API root.
pub const DEFAULT_BASE_URL: &str = "https://apis.iex.cloud/v1";

/// Connection settings for [`crate::IexConnector`].
#[derive(Clone)]
pub struct IexConfig {
    /// API root; the historical prices path is appended to it.
    pub base_url: String,
    /// Publishable API token sent as the `token` query parameter.
    pub token: String,
    /// Per-request HTTP timeout.
    pub timeout: Duration,
}

impl IexConfig {
    /// Settings for the public API with the given token.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            token: token.into(),
            timeout: Duration::from_secs(10),
        }
    }

    /// Point the connector at a different API root.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Override the per-request HTTP timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

// Keep the token out of logs and panics.
impl std::fmt::Debug for IexConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IexConfig")
            .field("base_url", &self.base_url)
            .field("token", &"<redacted>")
            .field("timeout", &self.timeout)
            .finish()
    }
}
