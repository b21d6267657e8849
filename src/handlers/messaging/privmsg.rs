//! PRIVMSG command handler.

use super::super::{Context, Handler};
use super::routing::{RouteOptions, route_message};
use crate::error::HandlerResult;
use kestrel_proto::Message;

/// Handler for PRIVMSG command.
///
/// `PRIVMSG <target>{,<target>} :<text>`
pub struct PrivmsgHandler;

impl Handler for PrivmsgHandler {
    fn name(&self) -> &'static str {
        "PRIVMSG"
    }

    fn handle(&self, ctx: &mut Context<'_>, msg: &Message) -> HandlerResult {
        let opts = RouteOptions {
            command: "PRIVMSG",
            is_notice: false,
        };
        route_message(ctx, msg, &opts)
    }
}
