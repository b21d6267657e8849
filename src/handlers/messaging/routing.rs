//! Target resolution and delivery shared by PRIVMSG and NOTICE.

use super::super::{Context, err_cannotsendtochan, err_nosuchnick, split_targets};
use crate::error::{HandlerError, HandlerResult};
use crate::state::{Channel, Rank, Uid};
use kestrel_proto::{ChannelExt, Message};
use tracing::debug;

/// Options for message routing behavior.
pub struct RouteOptions {
    /// Command name used on the relayed line.
    pub command: &'static str,
    /// Suppress every error reply.
    pub is_notice: bool,
}

/// Outcome of delivering to a channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelRouteResult {
    Sent,
    NoSuchChannel,
    CannotSend,
}

/// Outcome of delivering to a nick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserRouteResult {
    Sent,
    NoSuchNick,
}

/// Whether `uid` (known by `hostmask`) may speak in `chan`.
///
/// `+n` keeps non-members out, `+m` silences members below Voiced and a
/// matching ban silences anyone below Voiced.
pub fn can_send(chan: &Channel, uid: Uid, hostmask: &str) -> bool {
    let member = chan.is_member(uid);
    let rank = chan.rank_of(uid);

    if chan.flags.no_external && !member {
        return false;
    }
    if chan.flags.moderated && rank < Rank::Voiced {
        return false;
    }
    if rank < Rank::Voiced && chan.is_banned(hostmask) {
        return false;
    }
    true
}

/// Deliver `<command> <target> :<text>` to every comma-separated target.
pub fn route_message(ctx: &Context<'_>, msg: &Message, opts: &RouteOptions) -> HandlerResult {
    let (targets, text) = match (msg.param(0), msg.param(1)) {
        (Some(t), Some(x)) if !t.is_empty() && !x.is_empty() => (t, x),
        _ if opts.is_notice => return Ok(()),
        _ => return Err(HandlerError::NeedMoreParams),
    };
    let server = ctx.server_name();

    let tables = ctx.matrix.lock();
    let Some(sender) = tables.user(ctx.uid) else {
        return Ok(());
    };
    let nick = sender.nick.clone();
    let mask = sender.hostmask();

    for target in split_targets(targets) {
        let out = Message::new(opts.command, vec![target.to_string(), text.to_string()])
            .with_prefix(mask.clone());

        let error = if target.is_channel_name() {
            let result = match tables.find_channel(target) {
                None => ChannelRouteResult::NoSuchChannel,
                Some(chan) if !can_send(chan, ctx.uid, &mask) => ChannelRouteResult::CannotSend,
                Some(chan) => {
                    let name = chan.name.clone();
                    tables.broadcast(&name, out, Some(ctx.uid));
                    ChannelRouteResult::Sent
                }
            };
            match result {
                ChannelRouteResult::Sent => None,
                ChannelRouteResult::NoSuchChannel => Some(err_nosuchnick(server, &nick, target)),
                ChannelRouteResult::CannotSend => {
                    debug!(channel = %target, nick = %nick, "Message blocked by channel modes");
                    Some(err_cannotsendtochan(server, &nick, target))
                }
            }
        } else {
            let result = match tables.find_nick(target) {
                Some(uid) => {
                    tables.send(uid, out);
                    UserRouteResult::Sent
                }
                None => UserRouteResult::NoSuchNick,
            };
            match result {
                UserRouteResult::Sent => None,
                UserRouteResult::NoSuchNick => Some(err_nosuchnick(server, &nick, target)),
            }
        };

        if let Some(reply) = error
            && !opts.is_notice
        {
            tables.send(ctx.uid, reply);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    const MASK: &str = "eve!eve@10.0.0.1";

    #[test]
    fn test_can_send_open_channel() {
        let chan = Channel::new("#open", Instant::now());
        assert!(can_send(&chan, 1, MASK));
    }

    #[test]
    fn test_can_send_no_external() {
        let mut chan = Channel::new("#n", Instant::now());
        chan.flags.no_external = true;
        assert!(!can_send(&chan, 1, MASK));
        chan.members.insert(1, Rank::None);
        assert!(can_send(&chan, 1, MASK));
    }

    #[test]
    fn test_can_send_moderated() {
        let mut chan = Channel::new("#m", Instant::now());
        chan.flags.moderated = true;
        chan.members.insert(1, Rank::None);
        chan.members.insert(2, Rank::Voiced);
        assert!(!can_send(&chan, 1, MASK));
        assert!(can_send(&chan, 2, MASK));
    }

    #[test]
    fn test_can_send_banned_unless_voiced() {
        let mut chan = Channel::new("#b", Instant::now());
        chan.bans.push("eve!*@*".to_string());
        chan.members.insert(1, Rank::None);
        chan.members.insert(2, Rank::Voiced);
        assert!(!can_send(&chan, 1, MASK));
        assert!(can_send(&chan, 2, MASK));
    }
}
