//! Periodic background sweeps.
//!
//! Two independent fixed-interval tasks share the registry with the
//! sessions: the keepalive sweep (PING idle users, drop the silent ones)
//! and the empty-channel prune. Both stop on the shutdown broadcast.

use crate::state::Matrix;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval_at};
use tracing::{debug, info};

/// Spawn the keepalive sweep.
pub fn spawn_keepalive_task(matrix: Arc<Matrix>) -> JoinHandle<()> {
    let period = matrix.keepalive.sweep_interval();
    spawn_periodic("keepalive", period, matrix, |matrix| {
        let report = matrix.sweep_idle(Instant::now());
        if report.timed_out > 0 {
            info!(pinged = report.pinged, timed_out = report.timed_out, "Keepalive sweep");
        } else {
            debug!(pinged = report.pinged, "Keepalive sweep");
        }
    })
}

/// Spawn the empty-channel prune.
pub fn spawn_prune_task(matrix: Arc<Matrix>) -> JoinHandle<()> {
    let period = matrix.channel_config.prune_interval();
    spawn_periodic("prune", period, matrix, |matrix| {
        let removed = matrix.prune_channels();
        if removed > 0 {
            info!(removed, "Empty channels pruned");
        }
    })
}

/// Run `tick` every `period` (first run one period after start) until
/// shutdown is signalled.
fn spawn_periodic<F>(name: &'static str, period: Duration, matrix: Arc<Matrix>, tick: F) -> JoinHandle<()>
where
    F: Fn(&Matrix) + Send + 'static,
{
    let mut shutdown = matrix.lifecycle.subscribe_shutdown();
    tokio::spawn(async move {
        let start = tokio::time::Instant::now() + period;
        let mut interval = interval_at(start, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = shutdown.recv() => {
                    info!(task = name, "Background task stopping");
                    break;
                }
                _ = interval.tick() => tick(&matrix),
            }
        }
    })
}
