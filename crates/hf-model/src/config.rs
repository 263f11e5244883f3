use std::fmt::Debug;
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "https://api-inference.huggingface.co/models";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Builder for [`HfConfig`].
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct HfConfigBuilder {
    api_key: String,
    base_url: Option<String>,
    timeout: Option<Duration>,
}

impl HfConfigBuilder {
    /// Creates a builder with the given API key.
    #[inline]
    pub fn with_api_key<S: Into<String>>(api_key: S) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: None,
            timeout: None,
        }
    }

    /// Sets a custom base URL. The model identifier is appended to it as
    /// the last path segment.
    #[inline]
    pub fn with_base_url<S: Into<String>>(mut self, base_url: S) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Sets how long a request may take, from connecting until the whole
    /// body has been read.
    #[inline]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Builds the configuration.
    #[inline]
    pub fn build(self) -> HfConfig {
        let base_url = self
            .base_url
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        HfConfig {
            api_key: self.api_key,
            base_url: base_url.trim_end_matches('/').to_owned(),
            timeout: self.timeout.unwrap_or(DEFAULT_TIMEOUT),
        }
    }
}

impl Debug for HfConfigBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HfConfigBuilder")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Configuration for the Hugging Face inference provider.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct HfConfig {
    pub(crate) api_key: String,
    pub(crate) base_url: String,
    pub(crate) timeout: Duration,
}

impl HfConfig {
    /// Returns the endpoint URL for `model`.
    #[inline]
    pub fn endpoint(&self, model: &str) -> String {
        format!("{}/{}", self.base_url, model)
    }

    /// Returns the request timeout.
    #[inline]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl Debug for HfConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HfConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}
