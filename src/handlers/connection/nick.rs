//! NICK command handler.

use super::super::{Context, Handler};
use super::welcome::complete_registration;
use crate::error::HandlerResult;
use crate::state::NickInUse;
use kestrel_proto::{Message, NickExt, Response};
use tracing::{debug, info};

/// Handler for NICK command.
///
/// Claims are exact-case and decided under the registry lock, so two
/// racing claims for the same nick cannot both win.
pub struct NickHandler;

impl Handler for NickHandler {
    fn name(&self) -> &'static str {
        "NICK"
    }

    fn requires_registration(&self) -> bool {
        false
    }

    fn handle(&self, ctx: &mut Context<'_>, msg: &Message) -> HandlerResult {
        let mut tables = ctx.matrix.lock();
        let current = tables.nick_of(ctx.uid).to_string();

        // NICK <nickname>
        let Some(nick) = msg.param(0).filter(|n| !n.is_empty()) else {
            let reply = ctx
                .reply(Response::ERR_NONICKNAMEGIVEN, &current)
                .text("No nickname given");
            tables.send(ctx.uid, reply.into_message());
            return Ok(());
        };

        if !nick.is_valid_nick() {
            let reply = ctx
                .reply(Response::ERR_ERRONEOUSNICKNAME, &current)
                .arg(nick)
                .text("Erroneous nickname");
            tables.send(ctx.uid, reply.into_message());
            return Ok(());
        }

        let Some(user) = tables.user(ctx.uid) else {
            return Ok(());
        };
        let registered = user.registered;
        let old_mask = user.hostmask();

        match tables.claim_nick(ctx.uid, nick) {
            Err(NickInUse) => {
                let reply = ctx
                    .reply(Response::ERR_NICKNAMEINUSE, &current)
                    .arg(nick)
                    .text("Nickname is already in use");
                tables.send(ctx.uid, reply.into_message());
            }
            Ok(old) if registered => {
                if old != nick {
                    info!(uid = ctx.uid, old = %old, new = %nick, "Nick changed");
                    tables.broadcast_peers(ctx.uid, Message::nick(nick).with_prefix(old_mask));
                }
            }
            Ok(_) => {
                debug!(uid = ctx.uid, nick = %nick, "Nick set");
                complete_registration(ctx.matrix, &mut tables, ctx.uid);
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::handlers::test_support::Harness;

    #[test]
    fn test_nick_in_use() {
        let mut h = Harness::new();
        h.register("bob");
        let b = h.connect();
        h.line(b, "NICK bob").unwrap();
        assert_eq!(h.drain(b), vec![":irc.test 433 * bob :Nickname is already in use"]);
        // Case-sensitive: a different case is a different nick.
        h.line(b, "NICK Bob").unwrap();
        assert!(h.drain(b).is_empty());
    }

    #[test]
    fn test_missing_and_erroneous() {
        let mut h = Harness::new();
        let uid = h.connect();
        h.line(uid, "NICK").unwrap();
        h.line(uid, "NICK 9lives").unwrap();
        assert_eq!(
            h.drain(uid),
            vec![
                ":irc.test 431 * :No nickname given",
                ":irc.test 432 * 9lives :Erroneous nickname",
            ]
        );
    }

    #[test]
    fn test_change_broadcast_to_peers_once() {
        let mut h = Harness::new();
        let alice = h.register_in("alice", &["#a", "#b"]);
        let bob = h.register_in("bob", &["#a", "#b"]);
        let carol = h.register("carol");

        h.line(alice, "NICK alicia").unwrap();
        let expected = vec![":alice!alice@127.0.0.1 NICK alicia".to_string()];
        assert_eq!(h.drain(alice), expected);
        assert_eq!(h.drain(bob), expected);
        assert!(h.drain(carol).is_empty());

        let tables = h.matrix.lock();
        assert_eq!(tables.find_nick("alicia"), Some(alice));
        assert_eq!(tables.find_nick("alice"), None);
    }

    #[test]
    fn test_same_nick_again_is_silent() {
        let mut h = Harness::new();
        let bob = h.register("bob");
        h.line(bob, "NICK bob").unwrap();
        assert!(h.drain(bob).is_empty());
    }
}
