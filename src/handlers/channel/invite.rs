//! INVITE command handler.

use super::super::{
    Context, Handler, err_chanoprivsneeded, err_nosuchchannel, err_nosuchnick, err_notonchannel,
};
use crate::error::{ChannelError, HandlerError, HandlerResult};
use crate::state::Rank;
use kestrel_proto::{Message, Response};
use tracing::debug;

/// Handler for INVITE command.
///
/// `INVITE <nick> <channel>`
pub struct InviteHandler;

impl Handler for InviteHandler {
    fn name(&self) -> &'static str {
        "INVITE"
    }

    fn handle(&self, ctx: &mut Context<'_>, msg: &Message) -> HandlerResult {
        let (Some(target_nick), Some(channel)) = (msg.param(0), msg.param(1)) else {
            return Err(HandlerError::NeedMoreParams);
        };
        let server = ctx.server_name();

        let mut tables = ctx.matrix.lock();
        let nick = tables.nick_of(ctx.uid).to_string();

        let Some(target) = tables.find_nick(target_nick) else {
            tables.send(ctx.uid, err_nosuchnick(server, &nick, target_nick));
            return Ok(());
        };
        let Some(chan) = tables.find_channel(channel) else {
            tables.send(ctx.uid, err_nosuchchannel(server, &nick, channel));
            return Ok(());
        };
        let name = chan.name.clone();

        if !chan.is_member(ctx.uid) {
            tables.send(ctx.uid, err_notonchannel(server, &nick, &name));
            return Ok(());
        }
        if chan.is_member(target) {
            let err = ChannelError::AlreadyOnChannel(target_nick.to_string());
            tables.send(ctx.uid, err.to_irc_reply(server, &nick, &name));
            return Ok(());
        }
        if chan.flags.invite_only && chan.rank_of(ctx.uid) < Rank::Operator {
            tables.send(ctx.uid, err_chanoprivsneeded(server, &nick, &name));
            return Ok(());
        }

        let Some(mask) = tables.user(ctx.uid).map(|u| u.hostmask()) else {
            return Ok(());
        };
        if let Some(chan) = tables.find_channel_mut(channel) {
            chan.invited.insert(target);
        }
        debug!(channel = %name, inviter = %nick, invitee = %target_nick, "Invited");

        let invite =
            Message::new("INVITE", vec![target_nick.to_string(), name.clone()]).with_prefix(mask);
        tables.broadcast(&name, invite.clone(), None);
        tables.send(target, invite);

        let reply = ctx
            .matrix
            .reply(Response::RPL_INVITING, &nick)
            .args([target_nick, name.as_str()])
            .into_message();
        tables.send(ctx.uid, reply);
        Ok(())
    }
}
