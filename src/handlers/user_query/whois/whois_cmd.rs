//! WHOIS command handler.

use crate::handlers::{Context, Handler, err_nosuchnick, split_targets};
use crate::error::{HandlerError, HandlerResult};
use crate::state::{Tables, Uid};
use kestrel_proto::{Message, Response};
use std::time::Instant;

/// Handler for WHOIS command.
///
/// `WHOIS [<server>] <nick>{,<nick>}`
pub struct WhoisHandler;

impl Handler for WhoisHandler {
    fn name(&self) -> &'static str {
        "WHOIS"
    }

    fn handle(&self, ctx: &mut Context<'_>, msg: &Message) -> HandlerResult {
        // With two parameters the first names a server.
        let targets = msg
            .param(1)
            .or(msg.param(0))
            .filter(|t| !t.is_empty())
            .ok_or(HandlerError::NeedMoreParams)?;

        let tables = ctx.matrix.lock();
        let nick = tables.nick_of(ctx.uid).to_string();

        for target in split_targets(targets) {
            match tables.find_nick(target) {
                Some(uid) => send_whois(ctx, &tables, &nick, uid),
                None => tables.send(ctx.uid, err_nosuchnick(ctx.server_name(), &nick, target)),
            }
            let end = ctx
                .reply(Response::RPL_ENDOFWHOIS, &nick)
                .arg(target)
                .text("End of WHOIS list")
                .into_message();
            tables.send(ctx.uid, end);
        }
        Ok(())
    }
}

/// Everything between the request and RPL_ENDOFWHOIS for one user.
fn send_whois(ctx: &Context<'_>, tables: &Tables, nick: &str, uid: Uid) {
    let Some(user) = tables.user(uid) else {
        return;
    };
    let info = &ctx.matrix.server_info;

    tables.send(
        ctx.uid,
        ctx.reply(Response::RPL_WHOISUSER, nick)
            .args([user.nick.as_str(), user.user.as_str(), user.host.as_str(), "*"])
            .text(user.realname.as_str())
            .into_message(),
    );

    let channels: Vec<String> = user
        .channels
        .iter()
        .filter_map(|key| tables.channels.get(key))
        .filter(|chan| !chan.flags.secret || chan.is_member(ctx.uid))
        .map(|chan| chan.rank_of(uid).decorate(&chan.name))
        .collect();
    if !channels.is_empty() {
        tables.send(
            ctx.uid,
            ctx.reply(Response::RPL_WHOISCHANNELS, nick)
                .arg(user.nick.as_str())
                .text(channels.join(" "))
                .into_message(),
        );
    }

    tables.send(
        ctx.uid,
        ctx.reply(Response::RPL_WHOISSERVER, nick)
            .args([user.nick.as_str(), info.name.as_str()])
            .text(info.description.as_str())
            .into_message(),
    );

    if user.modes.is_oper() {
        tables.send(
            ctx.uid,
            ctx.reply(Response::RPL_WHOISOPERATOR, nick)
                .arg(user.nick.as_str())
                .text("is an IRC operator")
                .into_message(),
        );
    }

    let idle = Instant::now().saturating_duration_since(user.last_active).as_secs();
    tables.send(
        ctx.uid,
        ctx.reply(Response::RPL_WHOISIDLE, nick)
            .args([user.nick.clone(), idle.to_string(), user.signon.to_string()])
            .text("seconds idle, signon time")
            .into_message(),
    );
}
