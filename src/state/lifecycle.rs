//! Server lifecycle signalling.
//!
//! Isolates shutdown and out-of-band disconnects from the registry so that
//! code holding the registry lock never has to tear a session down itself.

use super::Uid;
use tokio::sync::{broadcast, mpsc};
use tracing::warn;

/// Handle for requesting disconnects from the disconnect worker.
#[derive(Debug, Clone)]
pub struct Disconnector {
    tx: mpsc::Sender<(Uid, String)>,
}

impl Disconnector {
    pub fn new(tx: mpsc::Sender<(Uid, String)>) -> Self {
        Self { tx }
    }

    /// Ask the worker to quit `uid`. Never blocks; a full worker queue
    /// drops the request.
    pub fn request(&self, uid: Uid, reason: &str) {
        if self.tx.try_send((uid, reason.to_string())).is_err() {
            warn!(uid, reason, "Disconnect queue full, request dropped");
        }
    }
}

/// Lifecycle management state.
pub struct LifecycleManager {
    /// Shutdown signal broadcaster, observed by listeners, sessions and
    /// both sweeps.
    pub shutdown_tx: broadcast::Sender<()>,

    pub disconnector: Disconnector,
}

impl LifecycleManager {
    pub fn new(disconnect_tx: mpsc::Sender<(Uid, String)>) -> Self {
        // Capacity 16 provides buffer for multiple slow subscribers during shutdown
        let (shutdown_tx, _) = broadcast::channel(16);

        Self {
            shutdown_tx,
            disconnector: Disconnector::new(disconnect_tx),
        }
    }

    pub fn subscribe_shutdown(&self) -> broadcast::Receiver<()> {
        self.shutdown_tx.subscribe()
    }

    /// Signal every subscriber to stop.
    pub fn shutdown(&self) {
        let _ = self.shutdown_tx.send(());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_request_reaches_worker() {
        let (tx, mut rx) = mpsc::channel(1);
        let lifecycle = LifecycleManager::new(tx);
        lifecycle.disconnector.request(7, "SendQ exceeded");
        // Queue full: dropped without blocking.
        lifecycle.disconnector.request(8, "SendQ exceeded");

        assert_eq!(rx.recv().await, Some((7, "SendQ exceeded".to_string())));
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_shutdown_reaches_subscribers() {
        let (tx, _rx) = mpsc::channel(1);
        let lifecycle = LifecycleManager::new(tx);
        let mut a = lifecycle.subscribe_shutdown();
        let mut b = lifecycle.subscribe_shutdown();
        lifecycle.shutdown();
        assert!(a.recv().await.is_ok());
        assert!(b.recv().await.is_ok());
    }
}
