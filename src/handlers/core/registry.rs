//! Command handler registry and dispatch.

use super::context::{Context, Handler};
use crate::error::{HandlerError, HandlerResult};
use crate::handlers::{
    cap::CapHandler,
    channel::{InviteHandler, JoinHandler, NamesHandler, PartHandler, TopicHandler},
    connection::{NickHandler, PingHandler, PongHandler, QuitHandler, UserHandler},
    messaging::{NoticeHandler, PrivmsgHandler},
    mode::ModeHandler,
    user_query::{UserhostHandler, WhoisHandler},
};
use kestrel_proto::Message;
use std::collections::HashMap;
use tracing::{Level, debug, span};

/// Registry of command handlers, built once at startup and never mutated.
pub struct Registry {
    handlers: HashMap<&'static str, Box<dyn Handler>>,
}

impl Registry {
    /// Create a new registry with all handlers registered.
    pub fn new() -> Self {
        let all: Vec<Box<dyn Handler>> = vec![
            // Connection/registration handlers
            Box::new(NickHandler),
            Box::new(UserHandler),
            Box::new(PingHandler),
            Box::new(PongHandler),
            Box::new(QuitHandler),
            Box::new(CapHandler),
            // Channel handlers
            Box::new(JoinHandler),
            Box::new(PartHandler),
            Box::new(TopicHandler),
            Box::new(NamesHandler),
            Box::new(InviteHandler),
            Box::new(ModeHandler),
            // Messaging handlers
            Box::new(PrivmsgHandler),
            Box::new(NoticeHandler),
            // User query handlers
            Box::new(WhoisHandler),
            Box::new(UserhostHandler),
        ];

        let handlers = all.into_iter().map(|h| (h.name(), h)).collect();
        Self { handlers }
    }

    /// Whether a handler exists for `command` (any case).
    #[cfg(test)]
    pub fn knows(&self, command: &str) -> bool {
        self.handlers
            .contains_key(command.to_ascii_uppercase().as_str())
    }

    /// Dispatch a message to the appropriate handler.
    ///
    /// Unknown commands are logged and dropped. A handler that needs
    /// registration is not run for unregistered connections; they get
    /// ERR_NOTREGISTERED instead. Handler errors that map to a numeric are
    /// answered here, so only `Quit` reaches the caller.
    pub fn dispatch(&self, ctx: &mut Context<'_>, msg: &Message) -> HandlerResult {
        if msg.is_noop() {
            return Ok(());
        }

        let cmd_name = msg.command.to_ascii_uppercase();
        let Some(handler) = self.handlers.get(cmd_name.as_str()) else {
            debug!(command = %cmd_name, uid = ctx.uid, "Unknown command ignored");
            return Ok(());
        };

        let (nick, registered) = {
            let tables = ctx.matrix.lock();
            match tables.user(ctx.uid) {
                Some(user) => (user.display_nick().to_string(), user.registered),
                None => return Ok(()),
            }
        };

        let irc_span = span!(
            Level::DEBUG,
            "irc.command",
            command = %cmd_name,
            uid = ctx.uid,
            nick = %nick,
            remote_addr = %ctx.remote_addr,
        );
        let _enter = irc_span.enter();

        let result = if handler.requires_registration() && !registered {
            Err(HandlerError::NotRegistered)
        } else {
            handler.handle(ctx, msg)
        };

        match result {
            Err(e) => {
                debug!(command = %cmd_name, error = %e, code = e.error_code(), "Command error");
                match e.to_irc_reply(ctx.server_name(), &nick, &cmd_name) {
                    Some(reply) => {
                        ctx.matrix.lock().send(ctx.uid, reply);
                        Ok(())
                    }
                    None => Err(e),
                }
            }
            Ok(()) => Ok(()),
        }
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}
