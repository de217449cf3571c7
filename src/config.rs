//! Configuration loading from TOML.
//!
//! Reads `config.toml` (or the path in `PRICE_ESTIMATOR_CONFIG`) and
//! deserializes into strongly-typed structs. Every field has a default,
//! so a partial file or no file at all still yields a usable config.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Default config file path.
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Environment variable that overrides the config file path.
pub const CONFIG_PATH_ENV: &str = "PRICE_ESTIMATOR_CONFIG";

/// Top-level application configuration.
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub sources: SourcesConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Deadline applied to every estimation triggered by a request.
    pub request_timeout_ms: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            request_timeout_ms: 5_000,
        }
    }
}

impl ServerConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

/// Per-exchange source settings, in query order.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct SourcesConfig {
    pub binance: SourceConfig,
    pub bitfinex: SourceConfig,
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            binance: SourceConfig {
                enabled: true,
                base_url: "https://api.binance.com".to_string(),
                symbol: "BTCUSDT".to_string(),
                timeout_secs: 4,
            },
            bitfinex: SourceConfig {
                enabled: true,
                base_url: "https://api-pub.bitfinex.com".to_string(),
                symbol: "tBTCUSD".to_string(),
                timeout_secs: 4,
            },
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct SourceConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    pub base_url: String,
    pub symbol: String,
    #[serde(default = "default_source_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_enabled() -> bool {
    true
}

fn default_source_timeout_secs() -> u64 {
    4
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {path}"))?;
        Self::from_toml(&contents)
            .with_context(|| format!("Failed to parse config file: {path}"))
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: AppConfig = toml::from_str(contents)?;
        Ok(config)
    }

    /// Load from `path` if it exists, otherwise fall back to defaults.
    ///
    /// A file that exists but fails to parse is still an error.
    pub fn load_or_default(path: &str) -> Result<Self> {
        if Path::new(path).exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Resolve the config path from the environment, defaulting to `config.toml`.
    pub fn resolve_path() -> String {
        std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string())
    }
}
