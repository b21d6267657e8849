//! Default value functions for configuration.

// =============================================================================
// Keepalive Defaults
// =============================================================================

pub fn default_sweep_interval() -> u64 {
    120
}

pub fn default_ping_after() -> u64 {
    60
}

pub fn default_timeout_after() -> u64 {
    120
}

// =============================================================================
// Channel Lifecycle Defaults
// =============================================================================

pub fn default_prune_interval() -> u64 {
    120
}

pub fn default_creation_window() -> u64 {
    5
}

// =============================================================================
// Limits Defaults
// =============================================================================

pub fn default_sendq() -> usize {
    1024
}

pub fn default_max_line() -> usize {
    kestrel_proto::line::DEFAULT_MAX_LINE
}
