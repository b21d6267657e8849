//! Network listener configuration.

use serde::Deserialize;
use std::net::SocketAddr;

/// One `[[listen]]` block.
#[derive(Debug, Clone, Deserialize)]
pub struct ListenConfig {
    /// Address to bind to (e.g., "0.0.0.0:6667").
    pub address: SocketAddr,
}
