//! Configuration validation.
//!
//! Validates configuration at startup to catch common errors early.

use super::Config;
use thiserror::Error;

/// Validation errors for configuration.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("server.name is required")]
    MissingServerName,
    #[error("server.name must not contain spaces: '{0}'")]
    InvalidServerName(String),
    #[error("server.network is required")]
    MissingNetworkName,
    #[error("at least one [[listen]] block is required")]
    NoListeners,
    #[error("keepalive.timeout_after ({timeout}s) must exceed keepalive.ping_after ({ping}s)")]
    TimeoutBeforePing { ping: u64, timeout: u64 },
    #[error("{0} must be greater than zero")]
    ZeroInterval(&'static str),
    #[error("limits.max_line must be at least 64 bytes, got {0}")]
    MaxLineTooSmall(usize),
}

/// Validate a configuration, returning all errors found.
pub fn validate(config: &Config) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let name = &config.server.name;
    if name.is_empty() {
        errors.push(ValidationError::MissingServerName);
    } else if name.contains(' ') {
        errors.push(ValidationError::InvalidServerName(name.clone()));
    }
    if config.server.network.is_empty() {
        errors.push(ValidationError::MissingNetworkName);
    }

    if config.listen.is_empty() {
        errors.push(ValidationError::NoListeners);
    }

    let keepalive = &config.keepalive;
    if keepalive.timeout_after <= keepalive.ping_after {
        errors.push(ValidationError::TimeoutBeforePing {
            ping: keepalive.ping_after,
            timeout: keepalive.timeout_after,
        });
    }
    if keepalive.sweep_interval == 0 {
        errors.push(ValidationError::ZeroInterval("keepalive.sweep_interval"));
    }
    if config.channels.prune_interval == 0 {
        errors.push(ValidationError::ZeroInterval("channels.prune_interval"));
    }
    if config.limits.sendq == 0 {
        errors.push(ValidationError::ZeroInterval("limits.sendq"));
    }
    if config.limits.max_line < 64 {
        errors.push(ValidationError::MaxLineTooSmall(config.limits.max_line));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
