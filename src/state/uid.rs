//! User identifier generation.

use std::sync::atomic::{AtomicU64, Ordering};

/// Unique identifier for a connection, never reused within a process.
pub type Uid = u64;

/// Hands out monotonically increasing UIDs.
#[derive(Debug)]
pub struct UidGenerator {
    counter: AtomicU64,
}

impl UidGenerator {
    pub fn new() -> Self {
        Self {
            counter: AtomicU64::new(1),
        }
    }

    /// Generate the next unique UID.
    pub fn next(&self) -> Uid {
        self.counter.fetch_add(1, Ordering::Relaxed)
    }
}

impl Default for UidGenerator {
    fn default() -> Self {
        Self::new()
    }
}
