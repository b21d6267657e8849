//! MODE command handler.
//!
//! - User modes: `MODE nick [+/-modes]`
//! - Channel modes: `MODE channel [+/-modes [args...]]`

mod channel;
mod user;

use super::{Context, Handler};
use crate::error::{HandlerError, HandlerResult};
use kestrel_proto::{ChannelExt, Message};

/// Handler for MODE command.
pub struct ModeHandler;

impl Handler for ModeHandler {
    fn name(&self) -> &'static str {
        "MODE"
    }

    fn handle(&self, ctx: &mut Context<'_>, msg: &Message) -> HandlerResult {
        let target = msg.param(0).ok_or(HandlerError::NeedMoreParams)?;
        let modestring = msg.param(1);
        let args: Vec<&str> = msg.params.iter().skip(2).map(String::as_str).collect();

        if target.is_channel_name() {
            channel::handle_channel_mode(ctx, target, modestring, &args)
        } else {
            user::handle_user_mode(ctx, target, modestring)
        }
    }
}
