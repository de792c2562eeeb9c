//! CLI configuration from voto.toml

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use voto_client::ClientConfig;

/// Main configuration structure for voto.toml
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct VotoToml {
    /// HTTP client settings (`url`, `prefix`, `timeout_secs`)
    #[serde(default)]
    pub api: ClientConfig,

    #[serde(default)]
    pub session: SessionToml,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SessionToml {
    /// Where the session token is kept between invocations
    pub token_file: Option<PathBuf>,
}

impl VotoToml {
    /// Load configuration from a TOML file
    ///
    /// Returns the default configuration if the file doesn't exist.
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            debug!("{:?} not found, using default configuration", path);
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config: Self = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse {}", path.display()))?;

        info!(
            "Loaded {} (API {}{})",
            path.display(),
            config.api.base_url,
            config.api.api_prefix
        );
        Ok(config)
    }

    /// File settings with command-line and environment overrides applied
    pub fn client_config(&self, api_url: Option<String>, api_prefix: Option<String>) -> ClientConfig {
        let mut config = self.api.clone();
        if let Some(url) = api_url {
            config = config.with_base_url(url);
        }
        if let Some(prefix) = api_prefix {
            config = config.with_api_prefix(prefix);
        }
        config
    }

    pub fn token_file(&self, overridden: Option<PathBuf>) -> PathBuf {
        overridden
            .or_else(|| self.session.token_file.clone())
            .unwrap_or_else(default_token_file)
    }
}

/// `$HOME/.voto-admin/token`, or relative to the working directory without
/// a home
pub fn default_token_file() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .unwrap_or_default()
        .join(".voto-admin")
        .join("token")
}
