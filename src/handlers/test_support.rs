//! In-memory harness for driving handlers without sockets.

use super::{Context, Registry};
use crate::error::HandlerResult;
use crate::state::{Matrix, Uid, test_matrix};
use kestrel_proto::Message;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::mpsc;

pub struct Harness {
    pub matrix: Arc<Matrix>,
    pub registry: Registry,
    pub disconnects: mpsc::Receiver<(Uid, String)>,
    queues: HashMap<Uid, mpsc::Receiver<Arc<Message>>>,
}

impl Harness {
    pub fn new() -> Self {
        let (matrix, disconnects) = test_matrix();
        Self {
            matrix,
            registry: Registry::new(),
            disconnects,
            queues: HashMap::new(),
        }
    }

    fn addr() -> SocketAddr {
        "127.0.0.1:40000".parse().unwrap()
    }

    /// Accept a connection without sending anything.
    pub fn connect(&mut self) -> Uid {
        let (uid, rx) = self.matrix.connect(Self::addr());
        self.queues.insert(uid, rx);
        uid
    }

    /// Parse and dispatch one line as `uid`.
    pub fn line(&mut self, uid: Uid, line: &str) -> HandlerResult {
        let msg = Message::parse(line);
        let mut ctx = Context::new(uid, &self.matrix, Self::addr());
        self.registry.dispatch(&mut ctx, &msg)
    }

    /// Everything queued for `uid` so far, serialized.
    pub fn drain(&mut self, uid: Uid) -> Vec<String> {
        let mut out = Vec::new();
        if let Some(rx) = self.queues.get_mut(&uid) {
            while let Ok(msg) = rx.try_recv() {
                out.push(msg.to_string());
            }
        }
        out
    }

    /// Connect, send NICK and USER (user name equals nick), discard the
    /// greeting.
    pub fn register(&mut self, nick: &str) -> Uid {
        let uid = self.connect();
        self.line(uid, &format!("NICK {nick}")).unwrap();
        self.line(uid, &format!("USER {nick} 0 * :{nick} Real")).unwrap();
        self.drain(uid);
        uid
    }

    /// Register and join each channel in order, discarding output for
    /// everyone.
    pub fn register_in(&mut self, nick: &str, channels: &[&str]) -> Uid {
        let uid = self.register(nick);
        for chan in channels {
            self.line(uid, &format!("JOIN {chan}")).unwrap();
        }
        self.drain_all();
        uid
    }

    pub fn drain_all(&mut self) {
        let uids: Vec<Uid> = self.queues.keys().copied().collect();
        for uid in uids {
            self.drain(uid);
        }
    }

    /// Numeric codes (or commands) of everything queued for `uid`.
    pub fn codes(&mut self, uid: Uid) -> Vec<String> {
        self.drain(uid)
            .iter()
            .map(|line| Message::parse(line).command)
            .collect()
    }
}
