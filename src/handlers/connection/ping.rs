//! PING and PONG handlers.

use super::super::{Context, Handler};
use crate::error::{HandlerError, HandlerResult};
use kestrel_proto::Message;

/// Handler for PING command.
pub struct PingHandler;

impl Handler for PingHandler {
    fn name(&self) -> &'static str {
        "PING"
    }

    fn requires_registration(&self) -> bool {
        false
    }

    fn handle(&self, ctx: &mut Context<'_>, msg: &Message) -> HandlerResult {
        // PING <token>
        let token = msg.param(0).ok_or(HandlerError::NeedMoreParams)?;

        let pong = Message::pong(ctx.server_name(), token).with_prefix(ctx.server_name());
        ctx.matrix.lock().send(ctx.uid, pong);
        Ok(())
    }
}

/// Handler for PONG command.
pub struct PongHandler;

impl Handler for PongHandler {
    fn name(&self) -> &'static str {
        "PONG"
    }

    fn requires_registration(&self) -> bool {
        false
    }

    fn handle(&self, _ctx: &mut Context<'_>, _msg: &Message) -> HandlerResult {
        // Just acknowledge PONG - idle timer is reset by the connection loop
        Ok(())
    }
}
