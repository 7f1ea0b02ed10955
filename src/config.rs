//! Client configuration.
//!
//! Settings are read from `CHATSTREAM_*` environment variables by
//! [`ClientConfig::from_env`], or assembled with the builder methods.

use std::fmt;

use crate::error::ConfigError;
use crate::models::CompletionOptions;
use crate::sse::DONE_SENTINEL;

pub const ENV_ENDPOINT: &str = "CHATSTREAM_ENDPOINT";
pub const ENV_API_KEY: &str = "CHATSTREAM_API_KEY";
pub const ENV_API_KEY_HEADER: &str = "CHATSTREAM_API_KEY_HEADER";
pub const ENV_MODEL: &str = "CHATSTREAM_MODEL";
pub const ENV_DONE_SENTINEL: &str = "CHATSTREAM_DONE_SENTINEL";
pub const ENV_CHANNEL_CAPACITY: &str = "CHATSTREAM_CHANNEL_CAPACITY";

pub const DEFAULT_ENDPOINT: &str = "http://localhost:8000/v1/chat/completions";
pub const DEFAULT_API_KEY_HEADER: &str = "api-key";
pub const DEFAULT_CHANNEL_CAPACITY: usize = 16;

/// Configuration for a [`CompletionClient`](crate::client::CompletionClient).
///
/// # Example
///
/// ```
/// use chatstream::config::ClientConfig;
///
/// let config = ClientConfig::new("https://example.test/v1/chat/completions")
///     .with_api_key("secret")
///     .with_model("gpt-4o-mini");
/// assert_eq!(config.options.model, "gpt-4o-mini");
/// ```
#[derive(Clone, PartialEq)]
pub struct ClientConfig {
    /// Completion endpoint URL
    pub endpoint: String,
    /// Credential sent on every request, if any
    pub api_key: Option<String>,
    /// Header carrying the credential (default: `api-key`)
    pub api_key_header: String,
    /// Model and sampling options
    pub options: CompletionOptions,
    /// Payload that marks the end of a stream (default: `[DONE]`)
    pub done_sentinel: String,
    /// Buffered chunks between a spawned bridge and its consumer (default: 16)
    pub channel_capacity: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            api_key: None,
            api_key_header: DEFAULT_API_KEY_HEADER.to_string(),
            options: CompletionOptions::default(),
            done_sentinel: DONE_SENTINEL.to_string(),
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("endpoint", &self.endpoint)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("api_key_header", &self.api_key_header)
            .field("options", &self.options)
            .field("done_sentinel", &self.done_sentinel)
            .field("channel_capacity", &self.channel_capacity)
            .finish()
    }
}

impl ClientConfig {
    /// Create a config for the given endpoint with default values.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            ..Self::default()
        }
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    pub fn with_api_key_header(mut self, header: impl Into<String>) -> Self {
        self.api_key_header = header.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.options.model = model.into();
        self
    }

    pub fn with_options(mut self, options: CompletionOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_done_sentinel(mut self, sentinel: impl Into<String>) -> Self {
        self.done_sentinel = sentinel.into();
        self
    }

    /// Set the channel capacity. Zero is raised to one.
    pub fn with_channel_capacity(mut self, capacity: usize) -> Self {
        self.channel_capacity = capacity.max(1);
        self
    }

    /// Load configuration from `CHATSTREAM_*` environment variables.
    ///
    /// `CHATSTREAM_ENDPOINT` is required. Empty values count as unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let endpoint =
            get(ENV_ENDPOINT).ok_or(ConfigError::MissingEndpoint { var: ENV_ENDPOINT })?;
        let mut config = Self::new(endpoint.trim());

        if let Some(key) = get(ENV_API_KEY) {
            config = config.with_api_key(key);
        }
        if let Some(header) = get(ENV_API_KEY_HEADER) {
            config = config.with_api_key_header(header.trim());
        }
        if let Some(model) = get(ENV_MODEL) {
            config = config.with_model(model.trim());
        }
        if let Some(sentinel) = get(ENV_DONE_SENTINEL) {
            config = config.with_done_sentinel(sentinel);
        }
        if let Some(raw) = get(ENV_CHANNEL_CAPACITY) {
            let capacity = parse_capacity(&raw)?;
            config = config.with_channel_capacity(capacity);
        }

        Ok(config)
    }
}

fn parse_capacity(raw: &str) -> Result<usize, ConfigError> {
    match raw.trim().parse::<usize>() {
        Ok(capacity) if capacity > 0 => Ok(capacity),
        _ => Err(ConfigError::InvalidValue {
            var: ENV_CHANNEL_CAPACITY,
            value: raw.to_string(),
            reason: "expected a positive integer".to_string(),
        }),
    }
}
