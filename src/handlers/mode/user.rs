//! User mode handling.
//!
//! Users may query or change their own modes; IRC operators may also act
//! on other users.

use super::super::{Context, err_nosuchnick};
use crate::error::HandlerResult;
use kestrel_proto::{Message, Response};
use tracing::debug;

/// Handle user mode query/change.
pub fn handle_user_mode(
    ctx: &mut Context<'_>,
    target_nick: &str,
    modestring: Option<&str>,
) -> HandlerResult {
    let server = ctx.server_name();
    let mut tables = ctx.matrix.lock();
    let Some(requester) = tables.user(ctx.uid) else {
        return Ok(());
    };
    let nick = requester.nick.clone();
    let is_oper = requester.modes.is_oper();

    let Some(target) = tables.find_nick(target_nick) else {
        tables.send(ctx.uid, err_nosuchnick(server, &nick, target_nick));
        return Ok(());
    };

    if target != ctx.uid && !is_oper {
        let reply = ctx
            .reply(Response::ERR_USERSDONTMATCH, &nick)
            .text("Can't change mode for other users")
            .into_message();
        tables.send(ctx.uid, reply);
        return Ok(());
    }

    if let Some(modes) = modestring
        && let Some(user) = tables.user_mut(target)
        && user.modes.apply(modes)
    {
        debug!(nick = %user.nick, modes = %user.modes.as_mode_string(), by = %nick, "User modes changed");
    }

    let Some(current) = tables.user(target).map(|u| u.modes.as_mode_string()) else {
        return Ok(());
    };
    let umodeis = |to: &str| -> Message {
        ctx.reply(Response::RPL_UMODEIS, to)
            .arg(current.as_str())
            .into_message()
    };

    tables.send(ctx.uid, umodeis(&nick));
    if modestring.is_some() && target != ctx.uid {
        tables.send(target, umodeis(target_nick));
    }
    Ok(())
}
