//! JOIN command handler.

use super::super::{Context, Handler, err_nosuchchannel, split_targets};
use super::{send_names, send_topic};
use crate::error::{HandlerError, HandlerResult};
use kestrel_proto::{ChannelExt, Message};
use std::time::Instant;
use tracing::debug;

/// Handler for JOIN command.
///
/// `JOIN <channel>{,<channel>} [<key>{,<key>}]` or `JOIN 0` to leave
/// every channel.
pub struct JoinHandler;

impl Handler for JoinHandler {
    fn name(&self) -> &'static str {
        "JOIN"
    }

    fn handle(&self, ctx: &mut Context<'_>, msg: &Message) -> HandlerResult {
        let list = msg
            .param(0)
            .filter(|p| !p.is_empty())
            .ok_or(HandlerError::NeedMoreParams)?;
        let keys: Vec<&str> = msg.param(1).map(|k| k.split(',').collect()).unwrap_or_default();
        let server = ctx.server_name();
        let window = ctx.matrix.channel_config.creation_window();

        let mut tables = ctx.matrix.lock();
        let Some(user) = tables.user(ctx.uid) else {
            return Ok(());
        };
        let nick = user.nick.clone();
        let mask = user.hostmask();

        if list == "0" {
            let joined: Vec<String> = user.channels.iter().cloned().collect();
            for channel in joined {
                tables.part_channel(ctx.uid, &channel, None);
            }
            return Ok(());
        }

        for (idx, name) in split_targets(list).enumerate() {
            if !name.is_channel_name() {
                tables.send(ctx.uid, err_nosuchchannel(server, &nick, name));
                continue;
            }
            let key = keys.get(idx).copied().filter(|k| !k.is_empty());

            match tables.join_channel(ctx.uid, name, key, window, Instant::now()) {
                Err(e) => {
                    debug!(channel = %name, nick = %nick, error = %e, "Join refused");
                    tables.send(ctx.uid, e.to_irc_reply(server, &nick, name));
                }
                Ok(None) => {}
                Ok(Some(rank)) => {
                    let Some(chan_name) = tables.find_channel(name).map(|c| c.name.clone()) else {
                        continue;
                    };
                    debug!(channel = %chan_name, nick = %nick, %rank, "Joined");

                    let join = Message::join(chan_name.clone()).with_prefix(mask.clone());
                    tables.broadcast(&chan_name, join, None);
                    send_topic(ctx.matrix, &tables, ctx.uid, &chan_name);
                    send_names(ctx.matrix, &tables, ctx.uid, &chan_name);
                }
            }
        }
        Ok(())
    }
}
