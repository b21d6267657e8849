//! Test IRC client.
//!
//! Provides an IRC client for integration testing that can send commands
//! and assert on received responses.

use kestrel_proto::Message;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, BufWriter};
use tokio::net::TcpStream;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::time::timeout;

/// A test IRC client.
pub struct TestClient {
    reader: BufReader<OwnedReadHalf>,
    writer: BufWriter<OwnedWriteHalf>,
    nick: String,
}

#[allow(dead_code)]
impl TestClient {
    /// Connect to a test server.
    pub async fn connect(address: &str, nick: &str) -> anyhow::Result<Self> {
        let stream = TcpStream::connect(address).await?;

        // Split stream for reading and writing
        let (read_half, write_half) = stream.into_split();
        Ok(Self {
            reader: BufReader::new(read_half),
            writer: BufWriter::new(write_half),
            nick: nick.to_string(),
        })
    }

    /// Send a raw IRC line; CRLF is appended when missing.
    pub async fn send_raw(&mut self, line: &str) -> anyhow::Result<()> {
        self.writer.write_all(line.as_bytes()).await?;
        if !line.ends_with("\r\n") {
            self.writer.write_all(b"\r\n").await?;
        }
        self.writer.flush().await?;
        Ok(())
    }

    /// Receive a single message from the server.
    pub async fn recv(&mut self) -> anyhow::Result<Message> {
        self.recv_timeout(Duration::from_secs(5)).await
    }

    /// Receive a message with a timeout. A closed socket is an error.
    pub async fn recv_timeout(&mut self, dur: Duration) -> anyhow::Result<Message> {
        let mut line = String::new();
        let read = timeout(dur, self.reader.read_line(&mut line)).await??;
        if read == 0 {
            anyhow::bail!("connection closed");
        }
        Ok(Message::parse(line.trim_end()))
    }

    /// Receive messages until `predicate` matches; returns all of them.
    pub async fn recv_until<F>(&mut self, mut predicate: F) -> anyhow::Result<Vec<Message>>
    where
        F: FnMut(&Message) -> bool,
    {
        let mut messages = Vec::new();
        loop {
            let msg = self.recv().await?;
            let done = predicate(&msg);
            messages.push(msg);
            if done {
                return Ok(messages);
            }
        }
    }

    /// Receive until a message with `command` arrives.
    pub async fn expect(&mut self, command: &str) -> anyhow::Result<Message> {
        let mut messages = self.recv_until(|m| m.command == command).await?;
        messages
            .pop()
            .ok_or_else(|| anyhow::anyhow!("no {command} received"))
    }

    /// Discard whatever arrives within a short quiet period.
    pub async fn drain(&mut self) {
        while self.recv_timeout(Duration::from_millis(100)).await.is_ok() {}
    }

    /// Register with the server (NICK + USER) and consume the greeting up
    /// to the end of the MOTD.
    pub async fn register(&mut self) -> anyhow::Result<Vec<Message>> {
        let nick = self.nick.clone();
        self.send_raw(&format!("NICK {nick}")).await?;
        self.send_raw(&format!("USER {nick} 0 * :Test User {nick}")).await?;

        let messages = self
            .recv_until(|m| matches!(m.command.as_str(), "422" | "376" | "433"))
            .await?;
        if messages.iter().any(|m| m.command == "001") {
            Ok(messages)
        } else {
            anyhow::bail!("Registration failed: no RPL_WELCOME received")
        }
    }

    /// Join a channel.
    pub async fn join(&mut self, channel: &str) -> anyhow::Result<()> {
        self.send_raw(&format!("JOIN {channel}")).await
    }

    /// Send a PRIVMSG.
    pub async fn privmsg(&mut self, target: &str, text: &str) -> anyhow::Result<()> {
        self.send_raw(&format!("PRIVMSG {target} :{text}")).await
    }

    /// Send QUIT.
    pub async fn quit(&mut self, reason: Option<&str>) -> anyhow::Result<()> {
        match reason {
            Some(reason) => self.send_raw(&format!("QUIT :{reason}")).await,
            None => self.send_raw("QUIT").await,
        }
    }
}
