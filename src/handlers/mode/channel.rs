//! Channel mode handling.
//!
//! Letters are walked left to right. Access-list letters without a mask
//! are list queries, member letters (`q a o h v`) take a nick, and the
//! remaining letters are channel flags. Every mutation is arbitrated by
//! the channel itself against the requester's rank; this module only
//! resolves arguments and reports outcomes.

use super::super::{
    Context, err_chanoprivsneeded, err_nosuchchannel, err_nosuchnick, err_usernotinchannel,
};
use crate::error::HandlerResult;
use crate::state::{
    Channel, ModeChange, ModeRejection, Rank, channel_key, flag_rank, is_list_letter,
    parse_mode_letters, render_changes,
};
use kestrel_proto::{Message, NickExt, Numeric, Response};
use tracing::debug;

/// Numerics for one access list: entry, end, and end text.
fn list_numerics(letter: char) -> (Response, Response, &'static str) {
    match letter {
        'e' => (
            Response::RPL_EXCEPTLIST,
            Response::RPL_ENDOFEXCEPTLIST,
            "End of channel exception list",
        ),
        'I' => (
            Response::RPL_INVITELIST,
            Response::RPL_ENDOFINVITELIST,
            "End of channel invite list",
        ),
        _ => (
            Response::RPL_BANLIST,
            Response::RPL_ENDOFBANLIST,
            "End of channel ban list",
        ),
    }
}

/// True when every letter names a member rank and the first argument
/// looks like a nick. Settles `+q`/`+a` between quiet/anonymous and
/// Creator/Admin.
fn is_member_request(letters: &[(bool, char)], args: &[&str]) -> bool {
    !letters.is_empty()
        && letters.iter().all(|&(_, c)| Rank::from_mode_letter(c).is_some())
        && args.first().is_some_and(|a| a.is_valid_nick())
}

/// Handle channel mode query/change.
pub fn handle_channel_mode(
    ctx: &mut Context<'_>,
    channel: &str,
    modestring: Option<&str>,
    args: &[&str],
) -> HandlerResult {
    let server = ctx.server_name();
    let mut guard = ctx.matrix.lock();
    let tables = &mut *guard;

    let Some(requester) = tables.user(ctx.uid) else {
        return Ok(());
    };
    let nick = requester.nick.clone();
    let mask = requester.hostmask();

    let key = channel_key(channel);
    let Some(chan) = tables.channels.get_mut(&key) else {
        tables.send(ctx.uid, err_nosuchchannel(server, &nick, channel));
        return Ok(());
    };
    let name = chan.name.clone();
    let reply = |code: Response| -> Numeric { ctx.reply(code, &nick).arg(name.as_str()) };

    let Some(modestring) = modestring else {
        let params = chan.mode_params(chan.is_member(ctx.uid));
        let msg = reply(Response::RPL_CHANNELMODEIS).args(params).into_message();
        tables.send(ctx.uid, msg);
        return Ok(());
    };

    let letters = parse_mode_letters(modestring);
    let member_request = is_member_request(&letters, args);
    let mut next_arg = args.iter().copied();

    let mut applied: Vec<ModeChange> = Vec::new();
    let mut replies: Vec<Message> = Vec::new();
    let mut denied = false;

    for (adding, letter) in letters {
        let outcome: Result<Option<ModeChange>, ModeRejection> = if is_list_letter(letter) {
            match next_arg.next() {
                None => {
                    replies.extend(list_query(chan, letter, &reply));
                    Ok(None)
                }
                Some(m) => chan
                    .change_access(ctx.uid, adding, letter, m)
                    .map(|changed| changed.map(|m| ModeChange::new(adding, letter, Some(m)))),
            }
        } else if let Some(level) = Rank::from_mode_letter(letter)
            && (member_request || flag_rank(letter).is_none())
        {
            let arg = next_arg
                .next()
                .or(args.first().copied().filter(|_| member_request));
            let Some(target_nick) = arg else {
                continue;
            };
            let Some(target) = tables.nicks.get(target_nick).copied() else {
                replies.push(err_nosuchnick(server, &nick, target_nick));
                continue;
            };
            if !chan.is_member(target) {
                replies.push(err_usernotinchannel(server, &nick, target_nick, &name));
                continue;
            }
            chan.change_rank(ctx.uid, adding, level, target).map(|changed| {
                changed.then(|| ModeChange::new(adding, letter, Some(target_nick.to_string())))
            })
        } else {
            let arg = match letter {
                'k' => next_arg.next(),
                'l' if adding => next_arg.next(),
                _ => None,
            };
            chan.change_flag(ctx.uid, adding, letter, arg)
        };

        match outcome {
            Ok(Some(change)) => applied.push(change),
            Ok(None) => {}
            Err(ModeRejection::Denied) => denied = true,
            Err(ModeRejection::Unknown(c)) => {
                let msg = ctx
                    .reply(Response::ERR_UNKNOWNMODE, &nick)
                    .arg(c.to_string())
                    .text(format!("is unknown mode char to me for {name}"))
                    .into_message();
                replies.push(msg);
            }
            Err(ModeRejection::MissingArg) => {
                debug!(channel = %name, letter = %letter, "Mode letter missing its argument");
            }
        }
    }

    if denied {
        replies.push(err_chanoprivsneeded(server, &nick, &name));
    }
    for msg in replies {
        tables.send(ctx.uid, msg);
    }

    if !applied.is_empty() {
        let mut params = vec![name.clone()];
        params.extend(render_changes(&applied));
        debug!(channel = %name, nick = %nick, modes = %params[1..].join(" "), "Channel modes changed");
        let out = Message::new("MODE", params).with_prefix(mask);
        tables.broadcast(&name, out, None);
    }
    Ok(())
}

/// Every entry of one access list followed by its end marker.
fn list_query(chan: &Channel, letter: char, reply: &dyn Fn(Response) -> Numeric) -> Vec<Message> {
    let (entry, end, end_text) = list_numerics(letter);
    let mut out: Vec<Message> = chan
        .access_list(letter)
        .unwrap_or_default()
        .iter()
        .map(|m| reply(entry).arg(m.as_str()).into_message())
        .collect();
    out.push(reply(end).text(end_text).into_message());
    out
}
