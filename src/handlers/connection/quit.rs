//! QUIT handler for terminating client sessions.

use super::super::{Context, Handler};
use crate::error::{HandlerError, HandlerResult};
use kestrel_proto::Message;
use tracing::info;

/// Handler for QUIT command.
///
/// The session performs the actual teardown when it sees
/// [`HandlerError::Quit`].
pub struct QuitHandler;

impl Handler for QuitHandler {
    fn name(&self) -> &'static str {
        "QUIT"
    }

    fn requires_registration(&self) -> bool {
        false
    }

    fn handle(&self, ctx: &mut Context<'_>, msg: &Message) -> HandlerResult {
        let quit_msg = msg.param(0).filter(|m| !m.is_empty()).map(str::to_string);

        info!(uid = ctx.uid, message = ?quit_msg, "Client quit");

        // Signal quit by returning Quit error that connection loop will handle
        Err(HandlerError::Quit(quit_msg))
    }
}
