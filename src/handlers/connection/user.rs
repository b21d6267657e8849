//! USER command handler.

use super::super::{Context, Handler};
use super::welcome::complete_registration;
use crate::error::{HandlerError, HandlerResult};
use crate::state::UserModes;
use kestrel_proto::{Message, Response};

/// Handler for USER command.
///
/// `USER <user> <mode> <unused> :<realname>`
pub struct UserHandler;

impl Handler for UserHandler {
    fn name(&self) -> &'static str {
        "USER"
    }

    fn requires_registration(&self) -> bool {
        false
    }

    fn handle(&self, ctx: &mut Context<'_>, msg: &Message) -> HandlerResult {
        if msg.params.len() < 4 {
            return Err(HandlerError::NeedMoreParams);
        }
        let (mode, realname) = (&msg.params[1], &msg.params[3]);
        // '@' would make the hostmask ambiguous.
        let username = msg.params[0].replace('@', "");
        if username.is_empty() {
            return Err(HandlerError::NeedMoreParams);
        }

        let mut tables = ctx.matrix.lock();
        let Some(user) = tables.user_mut(ctx.uid) else {
            return Ok(());
        };

        if user.registered {
            let reply = ctx
                .reply(Response::ERR_ALREADYREGISTERED, &user.nick)
                .text("You may not reregister");
            tables.send(ctx.uid, reply.into_message());
            return Ok(());
        }

        user.user = username;
        user.realname = realname.clone();
        user.modes = UserModes::from_user_bits(mode);

        complete_registration(ctx.matrix, &mut tables, ctx.uid);
        Ok(())
    }
}
