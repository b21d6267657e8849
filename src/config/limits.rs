//! Per-connection limits.

use super::defaults::{default_max_line, default_sendq};
use serde::Deserialize;

/// Buffer limits applied to every session.
#[derive(Debug, Clone, Deserialize)]
pub struct LimitsConfig {
    /// Outbound queue depth in messages (default: 1024). A peer whose
    /// queue fills is disconnected with "SendQ exceeded".
    #[serde(default = "default_sendq")]
    pub sendq: usize,
    /// Longest accepted inbound line in bytes, CRLF included (default: 512).
    #[serde(default = "default_max_line")]
    pub max_line: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            sendq: default_sendq(),
            max_line: default_max_line(),
        }
    }
}
