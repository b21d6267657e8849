//! NOTICE command handler.

use super::super::{Context, Handler};
use super::routing::{RouteOptions, route_message};
use crate::error::HandlerResult;
use kestrel_proto::Message;

/// Handler for NOTICE command. Routes like PRIVMSG but never replies
/// with an error.
pub struct NoticeHandler;

impl Handler for NoticeHandler {
    fn name(&self) -> &'static str {
        "NOTICE"
    }

    fn handle(&self, ctx: &mut Context<'_>, msg: &Message) -> HandlerResult {
        let opts = RouteOptions {
            command: "NOTICE",
            is_notice: true,
        };
        route_message(ctx, msg, &opts)
    }
}
