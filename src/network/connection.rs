//! Connection - Handles an individual client connection.
//!
//! Each Connection runs in its own Tokio task and multiplexes three
//! sources with `tokio::select!`:
//!
//! ```text
//!   socket reads ──▶ Registry::dispatch ──▶ (outbound queues)
//!   outbound queue ──▶ FramedWrite
//!   shutdown signal ──▶ ERROR + quit
//! ```
//!
//! Handlers never write to the socket. Everything goes through the
//! user's bounded queue, and the session ends once the registry drops the
//! user (closing the queue) and the remainder has been flushed.

use crate::error::HandlerError;
use crate::handlers::{Context, Registry};
use crate::state::Matrix;
use futures_util::{SinkExt, StreamExt};
use kestrel_proto::{IrcCodec, Message};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpStream;
use tokio_util::codec::{FramedRead, FramedWrite};
use tracing::{debug, info, instrument, warn};

const CLIENT_QUIT: &str = "Client Quit";
const RESET_BY_PEER: &str = "connection reset by peer";
const SHUTTING_DOWN: &str = "Server shutting down";

/// A client connection handler.
pub struct Connection {
    stream: TcpStream,
    addr: SocketAddr,
    matrix: Arc<Matrix>,
    registry: Arc<Registry>,
}

impl Connection {
    /// Create a new connection handler.
    pub fn new(
        stream: TcpStream,
        addr: SocketAddr,
        matrix: Arc<Matrix>,
        registry: Arc<Registry>,
    ) -> Self {
        Self {
            stream,
            addr,
            matrix,
            registry,
        }
    }

    /// Run the session until the user is gone and its queue is flushed.
    #[instrument(skip(self), fields(addr = %self.addr), name = "connection")]
    pub async fn run(self) -> anyhow::Result<()> {
        let (uid, mut outgoing) = self.matrix.connect(self.addr);
        info!(uid, server = %self.matrix.server_info.name, "Client connected");

        let max_line = self.matrix.limits.max_line;
        let (read_half, write_half) = self.stream.into_split();
        let mut reader = FramedRead::new(read_half, IrcCodec::with_max_len(max_line));
        let mut writer = FramedWrite::new(write_half, IrcCodec::with_max_len(max_line));
        let mut shutdown = self.matrix.lifecycle.subscribe_shutdown();

        {
            let tables = self.matrix.lock();
            tables.send_from_server(uid, Message::notice("AUTH", "*** Looking up your hostname..."));
            tables.send_from_server(
                uid,
                Message::notice(
                    "AUTH",
                    format!("*** Using your IP address ({}) as your hostname", self.addr.ip()),
                ),
            );
        }

        // Cleared once the client quit or the socket failed; the queue is
        // still drained so the closing ERROR reaches the client.
        let mut reading = true;

        loop {
            tokio::select! {
                frame = reader.next(), if reading => match frame {
                    Some(Ok(msg)) => {
                        self.matrix.touch(uid);
                        let mut ctx = Context::new(uid, &self.matrix, self.addr);
                        match self.registry.dispatch(&mut ctx, &msg) {
                            Ok(()) => {}
                            Err(HandlerError::Quit(reason)) => {
                                let reason = reason.filter(|r| !r.is_empty());
                                self.matrix.quit(uid, reason.as_deref().unwrap_or(CLIENT_QUIT));
                                reading = false;
                            }
                            Err(e) => {
                                warn!(uid, command = %msg.command, code = e.error_code(), error = %e, "Handler failed");
                            }
                        }
                    }
                    Some(Err(e)) => {
                        debug!(uid, error = %e, "Read failed");
                        self.matrix.quit(uid, RESET_BY_PEER);
                        reading = false;
                    }
                    None => {
                        self.matrix.quit(uid, RESET_BY_PEER);
                        reading = false;
                    }
                },
                queued = outgoing.recv() => match queued {
                    Some(msg) => {
                        if let Err(e) = writer.send(msg).await {
                            debug!(uid, error = %e, "Write failed");
                            self.matrix.quit(uid, RESET_BY_PEER);
                            break;
                        }
                    }
                    None => break,
                },
                _ = shutdown.recv() => {
                    let _ = writer.send(Message::error(SHUTTING_DOWN)).await;
                    self.matrix.quit(uid, SHUTTING_DOWN);
                    break;
                }
            }
        }

        // No-op unless the loop ended on a write failure race.
        self.matrix.quit(uid, RESET_BY_PEER);
        info!(uid, "Client disconnected");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::test_matrix;
    use std::time::Duration;
    use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
    use tokio::net::TcpListener;

    async fn session() -> (Arc<Matrix>, BufReader<TcpStream>, tokio::task::JoinHandle<()>) {
        let (matrix, _rx) = test_matrix();
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let client = TcpStream::connect(listener.local_addr().unwrap()).await.unwrap();
        let (stream, addr) = listener.accept().await.unwrap();

        let conn = Connection::new(stream, addr, Arc::clone(&matrix), Arc::new(Registry::new()));
        let task = tokio::spawn(async move {
            conn.run().await.unwrap();
        });
        (matrix, BufReader::new(client), task)
    }

    async fn read_line(reader: &mut BufReader<TcpStream>) -> String {
        let mut line = String::new();
        tokio::time::timeout(Duration::from_secs(5), reader.read_line(&mut line))
            .await
            .unwrap()
            .unwrap();
        line.trim_end().to_string()
    }

    #[tokio::test]
    async fn test_greeting_and_quit() {
        let (matrix, mut client, task) = session().await;

        assert_eq!(
            read_line(&mut client).await,
            ":irc.test NOTICE AUTH :*** Looking up your hostname..."
        );
        assert!(read_line(&mut client).await.contains("127.0.0.1"));

        client.get_mut().write_all(b"QUIT :bye\r\n").await.unwrap();
        assert_eq!(read_line(&mut client).await, "ERROR :Closing Link: 127.0.0.1 (bye)");

        tokio::time::timeout(Duration::from_secs(5), task).await.unwrap().unwrap();
        assert_eq!(matrix.user_count(), 0);
    }

    #[tokio::test]
    async fn test_eof_removes_user() {
        let (matrix, client, task) = session().await;
        drop(client);

        tokio::time::timeout(Duration::from_secs(5), task).await.unwrap().unwrap();
        assert_eq!(matrix.user_count(), 0);
    }

    #[tokio::test]
    async fn test_shutdown_sends_error() {
        let (matrix, mut client, task) = session().await;
        read_line(&mut client).await;
        read_line(&mut client).await;

        matrix.lifecycle.shutdown();
        assert_eq!(read_line(&mut client).await, "ERROR :Server shutting down");
        tokio::time::timeout(Duration::from_secs(5), task).await.unwrap().unwrap();
    }
}
