//! TOPIC command handler.

use super::super::{
    Context, Handler, err_chanoprivsneeded, err_nosuchchannel, err_notonchannel,
};
use crate::error::{HandlerError, HandlerResult};
use crate::state::{Matrix, Rank, Tables, Uid};
use kestrel_proto::{Message, Response};
use tracing::debug;

/// Send RPL_TOPIC, or RPL_NOTOPIC when none is set.
pub fn send_topic(matrix: &Matrix, tables: &Tables, uid: Uid, channel: &str) {
    let Some(chan) = tables.find_channel(channel) else {
        return;
    };
    let nick = tables.nick_of(uid);
    let reply = if chan.topic.is_empty() {
        matrix
            .reply(Response::RPL_NOTOPIC, nick)
            .arg(chan.name.as_str())
            .text("No topic is set")
    } else {
        matrix
            .reply(Response::RPL_TOPIC, nick)
            .arg(chan.name.as_str())
            .text(chan.topic.as_str())
    };
    tables.send(uid, reply.into_message());
}

/// Handler for TOPIC command.
///
/// `TOPIC <channel> [:<topic>]`
pub struct TopicHandler;

impl Handler for TopicHandler {
    fn name(&self) -> &'static str {
        "TOPIC"
    }

    fn handle(&self, ctx: &mut Context<'_>, msg: &Message) -> HandlerResult {
        let channel = msg.param(0).ok_or(HandlerError::NeedMoreParams)?;
        let server = ctx.server_name();

        let mut tables = ctx.matrix.lock();
        let nick = tables.nick_of(ctx.uid).to_string();
        let Some(chan) = tables.find_channel(channel) else {
            tables.send(ctx.uid, err_nosuchchannel(server, &nick, channel));
            return Ok(());
        };

        let Some(text) = msg.param(1) else {
            send_topic(ctx.matrix, &tables, ctx.uid, channel);
            return Ok(());
        };

        if !chan.is_member(ctx.uid) {
            tables.send(ctx.uid, err_notonchannel(server, &nick, &chan.name));
            return Ok(());
        }
        if chan.flags.topic_lock && chan.rank_of(ctx.uid) < Rank::HalfOp {
            tables.send(ctx.uid, err_chanoprivsneeded(server, &nick, &chan.name));
            return Ok(());
        }

        let Some(mask) = tables.user(ctx.uid).map(|u| u.hostmask()) else {
            return Ok(());
        };
        let Some(chan) = tables.find_channel_mut(channel) else {
            return Ok(());
        };
        chan.topic = text.to_string();
        let name = chan.name.clone();
        debug!(channel = %name, nick = %nick, "Topic changed");

        let notice = Message::new("TOPIC", vec![name.clone(), text.to_string()]).with_prefix(mask);
        tables.broadcast(&name, notice, None);
        Ok(())
    }
}
