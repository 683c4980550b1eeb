use std::time::Duration;

/// Default vendor base URL.
pub const DEFAULT_API_URL: &str = "https://api.dev.runwayml.com";

/// Default value of the `X-Runway-Version` header.
pub const DEFAULT_API_VERSION: &str = "2024-11-06";

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Connection settings for the generation service.
#[derive(Clone)]
pub struct RemoteConfig {
    /// Base URL without a trailing slash, e.g. `https://api.dev.runwayml.com`.
    pub api_url: String,
    /// Bearer token. Never logged.
    pub api_key: String,
    /// API version pinned in every request.
    pub api_version: String,
    pub timeout: Duration,
}

impl RemoteConfig {
    /// Settings for the default vendor endpoint with the given key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            api_key: api_key.into(),
            api_version: DEFAULT_API_VERSION.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Override the base URL (test servers, proxies).
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into().trim_end_matches('/').to_string();
        self
    }
}

// Hand-written so the API key never ends up in logs.
impl std::fmt::Debug for RemoteConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteConfig")
            .field("api_url", &self.api_url)
            .field("api_key", &"<redacted>")
            .field("api_version", &self.api_version)
            .field("timeout", &self.timeout)
            .finish()
    }
}
