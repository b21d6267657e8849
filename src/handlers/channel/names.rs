//! NAMES command handler.

use super::super::{Context, Handler, split_targets};
use crate::error::HandlerResult;
use crate::state::{Matrix, Tables, Uid};
use kestrel_proto::{Message, Response};

/// Keep each RPL_NAMREPLY comfortably inside the 512-byte line limit.
const NAMES_LINE_BUDGET: usize = 400;

/// Send RPL_NAMREPLY lines and RPL_ENDOFNAMES for one channel.
///
/// Non-members see no invisible users and nothing at all of a private
/// or secret channel. IRC operators see everything.
pub fn send_names(matrix: &Matrix, tables: &Tables, uid: Uid, channel: &str) {
    let nick = tables.nick_of(uid).to_string();
    let oper = tables.user(uid).is_some_and(|u| u.modes.is_oper());

    let mut display_name = channel.to_string();
    if let Some(chan) = tables.find_channel(channel) {
        display_name = chan.name.clone();
        let insider = oper || chan.is_member(uid);
        let hidden = chan.flags.secret || chan.flags.private;

        if insider || !hidden {
            let names: Vec<String> = chan
                .members
                .iter()
                .filter_map(|(&member, rank)| {
                    let user = tables.user(member)?;
                    (insider || !user.modes.invisible).then(|| rank.decorate(&user.nick))
                })
                .collect();

            let symbol = chan.symbol().to_string();
            for chunk in chunk_names(&names) {
                let reply = matrix
                    .reply(Response::RPL_NAMREPLY, &nick)
                    .args([symbol.as_str(), chan.name.as_str()])
                    .text(chunk);
                tables.send(uid, reply.into_message());
            }
        }
    }

    let end = matrix
        .reply(Response::RPL_ENDOFNAMES, &nick)
        .arg(display_name)
        .text("End of NAMES list");
    tables.send(uid, end.into_message());
}

/// Group names into space-joined lines under the budget.
fn chunk_names(names: &[String]) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for name in names {
        if !current.is_empty() && current.len() + name.len() + 1 > NAMES_LINE_BUDGET {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(name);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Handler for NAMES command.
///
/// `NAMES [<channel>{,<channel>}]`
pub struct NamesHandler;

impl Handler for NamesHandler {
    fn name(&self) -> &'static str {
        "NAMES"
    }

    fn handle(&self, ctx: &mut Context<'_>, msg: &Message) -> HandlerResult {
        let tables = ctx.matrix.lock();

        match msg.param(0).filter(|p| !p.is_empty()) {
            Some(list) => {
                for channel in split_targets(list) {
                    send_names(ctx.matrix, &tables, ctx.uid, channel);
                }
            }
            None => {
                let oper = tables.user(ctx.uid).is_some_and(|u| u.modes.is_oper());
                let mut visible: Vec<&str> = tables
                    .channels
                    .values()
                    .filter(|c| oper || c.is_member(ctx.uid) || !(c.flags.secret || c.flags.private))
                    .map(|c| c.name.as_str())
                    .collect();
                visible.sort_unstable();
                for channel in visible {
                    send_names(ctx.matrix, &tables, ctx.uid, channel);
                }
            }
        }
        Ok(())
    }
}
