//! Configuration loading and management.
//!
//! - [`types`]: top-level `Config`, server identity, channel lifecycle
//! - [`listen`]: listener addresses
//! - [`keepalive`]: idle sweep thresholds
//! - [`limits`]: per-connection buffer limits
//! - [`validation`]: startup sanity checks

mod defaults;
mod keepalive;
mod limits;
mod listen;
mod types;
mod validation;

pub use keepalive::KeepaliveConfig;
pub use limits::LimitsConfig;
pub use listen::ListenConfig;
pub use types::{ChannelConfig, Config};
pub use validation::validate;
