//! Core configuration types and loading.

use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

use super::defaults::{default_creation_window, default_prune_interval};
use super::keepalive::KeepaliveConfig;
use super::limits::LimitsConfig;
use super::listen::ListenConfig;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Server identity.
    pub server: ServerConfig,
    /// Listen addresses; each gets its own accept loop.
    pub listen: Vec<ListenConfig>,
    /// Idle PING / timeout sweep.
    #[serde(default)]
    pub keepalive: KeepaliveConfig,
    /// Channel lifecycle timing.
    #[serde(default)]
    pub channels: ChannelConfig,
    /// Per-connection limits.
    #[serde(default)]
    pub limits: LimitsConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse configuration from TOML text.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Run [`super::validate`] and fold every problem into one error.
    pub fn validate(&self) -> Result<(), ConfigError> {
        super::validate(self).map_err(|errors| {
            let joined = errors
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("; ");
            ConfigError::Invalid(joined)
        })
    }
}

/// Server identity configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Hostname used as the prefix of numerics and PINGs.
    pub name: String,
    /// Network name shown in the welcome burst and ISUPPORT.
    pub network: String,
    /// Free-form description (WHOIS server line).
    #[serde(default)]
    pub description: String,
    /// Message of the day; empty sends ERR_NOMOTD.
    #[serde(default)]
    pub motd: Vec<String>,
}

/// Channel lifecycle configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ChannelConfig {
    /// Seconds between empty-channel sweeps (default: 120).
    #[serde(default = "default_prune_interval")]
    pub prune_interval: u64,
    /// Seconds after creation during which the first joiner becomes
    /// Creator (default: 5).
    #[serde(default = "default_creation_window")]
    pub creation_window: u64,
}

impl ChannelConfig {
    pub fn prune_interval(&self) -> Duration {
        Duration::from_secs(self.prune_interval)
    }

    pub fn creation_window(&self) -> Duration {
        Duration::from_secs(self.creation_window)
    }
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            prune_interval: default_prune_interval(),
            creation_window: default_creation_window(),
        }
    }
}
