//! kestreld - Kestrel IRC Daemon
//!
//! A multi-user IRC server: one Tokio task per connection, a single
//! locked registry, and two periodic sweeps for keepalive and channel
//! pruning.

mod config;
mod error;
mod handlers;
mod network;
mod scheduler;
mod state;

use crate::config::Config;
use crate::network::Gateway;
use crate::state::{Matrix, Uid};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Queue depth for out-of-band disconnect requests (SendQ overflow).
const DISCONNECT_QUEUE: usize = 1024;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    // Load configuration
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config.toml".to_string());

    let config = Config::load(&config_path)
        .and_then(|config| config.validate().map(|()| config))
        .map_err(|e| {
            error!(path = %config_path, error = %e, "Failed to load config");
            e
        })?;

    info!(
        server = %config.server.name,
        network = %config.server.network,
        "Starting kestreld"
    );

    // Disconnect worker: sessions whose queue overflowed are torn down
    // here, outside whatever lock detected the overflow.
    let (disconnect_tx, mut disconnect_rx) = mpsc::channel::<(Uid, String)>(DISCONNECT_QUEUE);
    let matrix = Arc::new(Matrix::new(&config, disconnect_tx));
    {
        let matrix = Arc::clone(&matrix);
        tokio::spawn(async move {
            while let Some((uid, reason)) = disconnect_rx.recv().await {
                if matrix.quit(uid, &reason) {
                    info!(uid, %reason, "Disconnected by server");
                }
            }
        });
    }

    let keepalive = scheduler::spawn_keepalive_task(Arc::clone(&matrix));
    let prune = scheduler::spawn_prune_task(Arc::clone(&matrix));
    info!("Background sweeps started");

    let gateway = Gateway::bind(&config.listen, Arc::clone(&matrix)).await?;

    // Ctrl-C fans out to listeners, sessions and sweeps.
    {
        let matrix = Arc::clone(&matrix);
        tokio::spawn(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!(error = %e, "Failed to listen for ctrl-c");
                return;
            }
            info!("Shutdown requested");
            matrix.lifecycle.shutdown();
        });
    }

    gateway.run().await?;
    let _ = tokio::join!(keepalive, prune);
    info!(users = matrix.user_count(), "Server stopped");

    Ok(())
}
