//! Explicit pipeline configuration.
//!
//! Everything an invocation needs from its environment (upstream base URL,
//! credential, default timeout, integration tag) is carried by an
//! [`OracleConfig`] value handed to the pipeline constructor. Nothing is read
//! from process-global state after construction.
//!
//! # Environment Variables
//!
//! | Setting | Primary Env Var | Fallback Env Var |
//! |---------|-----------------|------------------|
//! | API key | `ORACLEWIRE_API_KEY` | `TOKEN_METRICS_API_KEY` |
//! | Base URL | `ORACLEWIRE_BASE_URL` | - |
//! | Default timeout (ms) | `ORACLEWIRE_TIMEOUT_MS` | - |

use std::env;
use std::fmt::{Debug, Formatter};

use crate::error::ConfigError;

pub const DEFAULT_BASE_URL: &str = "https://api.tokenmetrics.com/v2";
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;
pub const DEFAULT_INTEGRATION_TAG: &str = "chainlink";

#[derive(Clone, PartialEq, Eq)]
pub struct OracleConfig {
    base_url: String,
    api_key: String,
    default_timeout_ms: u64,
    integration_tag: Option<String>,
}

impl OracleConfig {
    pub fn new(api_key: impl Into<String>) -> Result<Self, ConfigError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(ConfigError::MissingApiKey);
        }

        Ok(Self {
            base_url: String::from(DEFAULT_BASE_URL),
            api_key,
            default_timeout_ms: DEFAULT_TIMEOUT_MS,
            integration_tag: Some(String::from(DEFAULT_INTEGRATION_TAG)),
        })
    }

    /// Build a configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_key = env::var("ORACLEWIRE_API_KEY")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .or_else(|| env::var("TOKEN_METRICS_API_KEY").ok())
            .ok_or(ConfigError::MissingApiKey)?;

        let mut config = Self::new(api_key)?;
        if let Ok(base_url) = env::var("ORACLEWIRE_BASE_URL") {
            config = config.with_base_url(base_url)?;
        }
        if let Ok(raw) = env::var("ORACLEWIRE_TIMEOUT_MS") {
            let timeout_ms = raw
                .trim()
                .parse::<u64>()
                .map_err(|_| ConfigError::InvalidTimeout { value: raw.clone() })?;
            config = config.with_timeout_ms(timeout_ms)?;
        }
        Ok(config)
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Result<Self, ConfigError> {
        let base_url = base_url.into();
        let trimmed = base_url.trim().trim_end_matches('/');
        if !(trimmed.starts_with("https://") || trimmed.starts_with("http://")) {
            return Err(ConfigError::InvalidBaseUrl { value: base_url });
        }
        self.base_url = trimmed.to_owned();
        Ok(self)
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Result<Self, ConfigError> {
        if timeout_ms == 0 {
            return Err(ConfigError::InvalidTimeout {
                value: timeout_ms.to_string(),
            });
        }
        self.default_timeout_ms = timeout_ms;
        Ok(self)
    }

    /// Set or clear the `x-integration` tag sent by metrics that carry one.
    pub fn with_integration_tag(mut self, tag: Option<String>) -> Self {
        self.integration_tag = tag.filter(|value| !value.trim().is_empty());
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub const fn default_timeout_ms(&self) -> u64 {
        self.default_timeout_ms
    }

    pub fn integration_tag(&self) -> Option<&str> {
        self.integration_tag.as_deref()
    }

    /// Join an endpoint path such as `/price` onto the base URL.
    pub fn endpoint_url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

impl Debug for OracleConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OracleConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .field("default_timeout_ms", &self.default_timeout_ms)
            .field("integration_tag", &self.integration_tag)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_api_key_is_rejected() {
        assert_eq!(OracleConfig::new("   "), Err(ConfigError::MissingApiKey));
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let config = OracleConfig::new("key")
            .and_then(|config| config.with_base_url("http://127.0.0.1:8080/v2/"))
            .expect("valid config");
        assert_eq!(config.endpoint_url("/price"), "http://127.0.0.1:8080/v2/price");
    }

    #[test]
    fn non_http_base_url_is_rejected() {
        let err = OracleConfig::new("key")
            .and_then(|config| config.with_base_url("ftp://example.test"))
            .expect_err("must fail");
        assert!(matches!(err, ConfigError::InvalidBaseUrl { .. }));
    }

    #[test]
    fn debug_output_redacts_api_key() {
        let config = OracleConfig::new("super-secret").expect("valid config");
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let err = OracleConfig::new("key")
            .and_then(|config| config.with_timeout_ms(0))
            .expect_err("must fail");
        assert!(matches!(err, ConfigError::InvalidTimeout { .. }));
    }
}
