//! PART command handler.

use super::super::{Context, Handler, err_nosuchchannel, err_notonchannel, split_targets};
use crate::error::{HandlerError, HandlerResult};
use kestrel_proto::Message;

/// Handler for PART command.
///
/// `PART <channel>{,<channel>} [:<reason>]`
pub struct PartHandler;

impl Handler for PartHandler {
    fn name(&self) -> &'static str {
        "PART"
    }

    fn handle(&self, ctx: &mut Context<'_>, msg: &Message) -> HandlerResult {
        let list = msg.param(0).ok_or(HandlerError::NeedMoreParams)?;
        let reason = msg.param(1).filter(|r| !r.is_empty());
        let server = ctx.server_name();

        let mut tables = ctx.matrix.lock();
        let nick = tables.nick_of(ctx.uid).to_string();

        for channel in split_targets(list) {
            match tables.find_channel(channel) {
                None => tables.send(ctx.uid, err_nosuchchannel(server, &nick, channel)),
                Some(chan) if !chan.is_member(ctx.uid) => {
                    let reply = err_notonchannel(server, &nick, &chan.name);
                    tables.send(ctx.uid, reply);
                }
                Some(_) => {
                    tables.part_channel(ctx.uid, channel, reason);
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::handlers::test_support::Harness;

    #[test]
    fn test_part_broadcasts_with_reason() {
        let mut h = Harness::new();
        let bob = h.register_in("bob", &["#test"]);
        let alice = h.register_in("alice", &["#test"]);

        h.line(alice, "PART #test :see you").unwrap();
        let expected = vec![":alice!alice@127.0.0.1 PART #test :see you".to_string()];
        assert_eq!(h.drain(alice), expected);
        assert_eq!(h.drain(bob), expected);
        assert!(!h.matrix.lock().find_channel("#test").unwrap().is_member(alice));
    }

    #[test]
    fn test_part_errors() {
        let mut h = Harness::new();
        let _bob = h.register_in("bob", &["#test"]);
        let eve = h.register("eve");
        h.line(eve, "PART #nope,#test").unwrap();
        assert_eq!(h.codes(eve), vec!["403", "442"]);
    }
}
