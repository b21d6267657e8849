//! Gateway - TCP listeners that accept incoming connections.
//!
//! The Gateway binds every configured address and spawns a Connection
//! task for each incoming client. A listener that fails to bind is logged
//! and skipped; startup only fails when none bind.

use crate::config::ListenConfig;
use crate::handlers::Registry;
use crate::network::Connection;
use crate::state::Matrix;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::task::JoinSet;
use tracing::{error, info, instrument, warn};

/// The Gateway accepts incoming TCP connections and spawns handlers.
pub struct Gateway {
    listeners: Vec<TcpListener>,
    matrix: Arc<Matrix>,
    registry: Arc<Registry>,
}

impl Gateway {
    /// Bind the gateway to the configured addresses.
    pub async fn bind(listen: &[ListenConfig], matrix: Arc<Matrix>) -> anyhow::Result<Self> {
        let mut listeners = Vec::with_capacity(listen.len());
        for cfg in listen {
            match TcpListener::bind(cfg.address).await {
                Ok(listener) => {
                    info!(address = %cfg.address, "Listener bound");
                    listeners.push(listener);
                }
                Err(e) => {
                    error!(address = %cfg.address, error = %e, "Failed to bind listener");
                }
            }
        }

        if listeners.is_empty() {
            anyhow::bail!("no listener could be bound");
        }

        Ok(Self {
            listeners,
            matrix,
            registry: Arc::new(Registry::new()),
        })
    }

    /// Addresses actually bound (resolves port 0).
    #[cfg(test)]
    pub fn local_addrs(&self) -> Vec<std::net::SocketAddr> {
        self.listeners
            .iter()
            .filter_map(|l| l.local_addr().ok())
            .collect()
    }

    /// Run every listener until shutdown is signalled.
    pub async fn run(self) -> anyhow::Result<()> {
        let mut tasks = JoinSet::new();
        for listener in self.listeners {
            let matrix = Arc::clone(&self.matrix);
            let registry = Arc::clone(&self.registry);
            tasks.spawn(accept_loop(listener, matrix, registry));
        }

        while let Some(joined) = tasks.join_next().await {
            if let Err(e) = joined {
                error!(error = %e, "Listener task failed");
            }
        }
        info!("All listeners stopped");
        Ok(())
    }
}

#[instrument(skip_all, name = "gateway", fields(addr = ?listener.local_addr().ok()))]
async fn accept_loop(listener: TcpListener, matrix: Arc<Matrix>, registry: Arc<Registry>) {
    let mut shutdown = matrix.lifecycle.subscribe_shutdown();

    loop {
        tokio::select! {
            _ = shutdown.recv() => {
                info!("Listener stopping");
                break;
            }
            accepted = listener.accept() => match accepted {
                Ok((stream, addr)) => {
                    info!(%addr, "Connection accepted");
                    let connection = Connection::new(
                        stream,
                        addr,
                        Arc::clone(&matrix),
                        Arc::clone(&registry),
                    );
                    tokio::spawn(async move {
                        if let Err(e) = connection.run().await {
                            warn!(%addr, error = %e, "Connection error");
                        }
                    });
                }
                Err(e) => {
                    error!(error = %e, "Failed to accept connection");
                }
            }
        }
    }
}
