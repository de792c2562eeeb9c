//! Client configuration

use serde::{Deserialize, Serialize};
use std::{env, fmt::Display, str::FromStr};
use tracing::{info, warn};
use url::Url;

use crate::error::{ApiError, Result};

pub const DEFAULT_BASE_URL: &str = "http://localhost:3000/api";
pub const DEFAULT_API_PREFIX: &str = "/v1";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration for the HTTP client
///
/// Every field has a default, so a partial `[api]` table in `voto.toml`
/// deserializes cleanly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL of the API, e.g. `https://urna.example.org/api`
    #[serde(alias = "url")]
    pub base_url: String,
    /// Version prefix placed between the base URL and resource paths
    #[serde(alias = "prefix")]
    pub api_prefix: String,
    /// HTTP request timeout in seconds
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_prefix: DEFAULT_API_PREFIX.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: format!("voto-client/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl ClientConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a configuration from `VOTO_API_URL`, `VOTO_API_PREFIX` and
    /// `VOTO_HTTP_TIMEOUT_SECS`, falling back to defaults
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();
        let config = Self {
            base_url: try_load("VOTO_API_URL", defaults.base_url)?,
            api_prefix: try_load("VOTO_API_PREFIX", defaults.api_prefix)?,
            timeout_secs: try_load("VOTO_HTTP_TIMEOUT_SECS", defaults.timeout_secs)?,
            user_agent: defaults.user_agent,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_api_prefix(mut self, api_prefix: impl Into<String>) -> Self {
        self.api_prefix = api_prefix.into();
        self
    }

    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        let url = Url::parse(&self.base_url)
            .map_err(|e| ApiError::config(format!("invalid base URL {}: {}", self.base_url, e)))?;

        if url.host().is_none() {
            return Err(ApiError::config(format!(
                "base URL {} has no host",
                self.base_url
            )));
        }

        if !matches!(url.scheme(), "http" | "https") {
            return Err(ApiError::config(format!(
                "base URL scheme must be http or https, got {}",
                url.scheme()
            )));
        }

        if url.scheme() != "https" && !is_local(&url) {
            warn!(
                "API base URL {} uses plain HTTP; the bearer token travels unencrypted",
                self.base_url
            );
        }

        if !self.api_prefix.is_empty() && !self.api_prefix.starts_with('/') {
            return Err(ApiError::config(format!(
                "API prefix must start with '/', got {}",
                self.api_prefix
            )));
        }

        if self.timeout_secs == 0 {
            return Err(ApiError::config("HTTP timeout must be greater than 0"));
        }

        Ok(())
    }

    /// Join base URL, prefix and path into an absolute endpoint URL
    pub fn endpoint(&self, path: &str, prefixed: bool) -> Result<Url> {
        let prefix = if prefixed {
            self.api_prefix.trim_end_matches('/')
        } else {
            ""
        };
        let raw = format!(
            "{}{}/{}",
            self.base_url.trim_end_matches('/'),
            prefix,
            path.trim_start_matches('/')
        );
        Url::parse(&raw).map_err(|e| ApiError::config(format!("invalid endpoint {}: {}", raw, e)))
    }
}

fn is_local(url: &Url) -> bool {
    matches!(url.host_str(), Some("localhost" | "127.0.0.1" | "::1" | "[::1]"))
}

fn try_load<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr + Display,
    T::Err: Display,
{
    match env::var(key) {
        Ok(value) => value.trim().parse().map_err(|e| {
            warn!("Invalid {key} value: {e}");
            ApiError::config(format!("invalid {key} value {value}: {e}"))
        }),
        Err(_) => {
            info!("{key} not set, using default: {default}");
            Ok(default)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = ClientConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.api_prefix, "/v1");
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        assert!(ClientConfig::new().with_base_url("not a url").validate().is_err());
        assert!(ClientConfig::new().with_base_url("ftp://host/api").validate().is_err());
        assert!(ClientConfig::new().with_api_prefix("v1").validate().is_err());
        assert!(ClientConfig::new().with_timeout(0).validate().is_err());
        assert!(ClientConfig::new().with_api_prefix("").validate().is_ok());
    }

    #[test]
    fn test_endpoint_joins_prefix_and_path() {
        let config = ClientConfig::new().with_base_url("http://localhost:8080/api/");

        let url = config.endpoint("/urnas/3", true).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/api/v1/urnas/3");

        let url = config.endpoint("/auth/login", false).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/api/auth/login");
    }

    #[test]
    fn test_partial_table_uses_defaults() {
        let config: ClientConfig =
            serde_json::from_value(serde_json::json!({ "url": "https://urna.example.org/api" }))
                .unwrap();
        assert_eq!(config.base_url, "https://urna.example.org/api");
        assert_eq!(config.timeout_secs, DEFAULT_TIMEOUT_SECS);
    }
}
