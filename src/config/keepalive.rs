//! Idle keepalive configuration.

use super::defaults::{default_ping_after, default_sweep_interval, default_timeout_after};
use serde::Deserialize;
use std::time::Duration;

/// Thresholds for the idle sweep.
///
/// Every `sweep_interval` seconds each connection idle for `ping_after`
/// seconds is sent a PING; one idle for `timeout_after` seconds is dropped.
#[derive(Debug, Clone, Deserialize)]
pub struct KeepaliveConfig {
    #[serde(default = "default_sweep_interval")]
    pub sweep_interval: u64,
    #[serde(default = "default_ping_after")]
    pub ping_after: u64,
    #[serde(default = "default_timeout_after")]
    pub timeout_after: u64,
}

impl KeepaliveConfig {
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval)
    }

    pub fn ping_after(&self) -> Duration {
        Duration::from_secs(self.ping_after)
    }

    pub fn timeout_after(&self) -> Duration {
        Duration::from_secs(self.timeout_after)
    }
}

impl Default for KeepaliveConfig {
    fn default() -> Self {
        Self {
            sweep_interval: default_sweep_interval(),
            ping_after: default_ping_after(),
            timeout_after: default_timeout_after(),
        }
    }
}
