//! Command handler context and the `Handler` trait.

use crate::error::HandlerResult;
use crate::state::{Matrix, Uid};
use kestrel_proto::{Message, Numeric, Response};
use std::net::SocketAddr;
use std::sync::Arc;

/// Handler context passed to each command handler.
pub struct Context<'a> {
    /// The user's unique ID.
    pub uid: Uid,
    /// Shared server state.
    pub matrix: &'a Arc<Matrix>,
    /// Remote address of the client.
    pub remote_addr: SocketAddr,
}

impl<'a> Context<'a> {
    pub fn new(uid: Uid, matrix: &'a Arc<Matrix>, remote_addr: SocketAddr) -> Self {
        Self {
            uid,
            matrix,
            remote_addr,
        }
    }

    #[inline]
    pub fn server_name(&self) -> &str {
        &self.matrix.server_info.name
    }

    /// Start a numeric from this server to `target`.
    #[inline]
    pub fn reply(&self, code: Response, target: &str) -> Numeric {
        self.matrix.reply(code, target)
    }
}

/// A command implementation.
///
/// Handlers run synchronously: they take the registry lock, decide, queue
/// their output with `try_send` and return. Nothing in a handler waits on
/// the network.
pub trait Handler: Send + Sync {
    /// Upper-case command name this handler answers to.
    fn name(&self) -> &'static str;

    /// Whether the connection must have completed NICK + USER first.
    fn requires_registration(&self) -> bool {
        true
    }

    fn handle(&self, ctx: &mut Context<'_>, msg: &Message) -> HandlerResult;
}
