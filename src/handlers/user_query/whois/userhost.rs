//! USERHOST handler for resolving user@host pairs.

use crate::handlers::{Context, Handler};
use crate::error::{HandlerError, HandlerResult};
use kestrel_proto::{Message, Response};

/// Handler for USERHOST command.
///
/// `USERHOST nick [nick ...]`
///
/// Returns the user@host for up to 5 nicknames. Unknown nicks are left
/// out of the reply.
pub struct UserhostHandler;

impl Handler for UserhostHandler {
    fn name(&self) -> &'static str {
        "USERHOST"
    }

    fn handle(&self, ctx: &mut Context<'_>, msg: &Message) -> HandlerResult {
        if msg.params.is_empty() {
            return Err(HandlerError::NeedMoreParams);
        }

        let tables = ctx.matrix.lock();
        let nick = tables.nick_of(ctx.uid).to_string();

        // nick[*]=+/-user@host: * if oper, - if away, + otherwise
        let replies: Vec<String> = msg
            .params
            .iter()
            .take(5)
            .filter_map(|target| tables.find_nick(target).and_then(|uid| tables.user(uid)))
            .map(|user| {
                let oper_flag = if user.modes.is_oper() { "*" } else { "" };
                let away_flag = if user.modes.away { "-" } else { "+" };
                format!("{}{oper_flag}={away_flag}{}@{}", user.nick, user.user, user.host)
            })
            .collect();

        let reply = ctx
            .reply(Response::RPL_USERHOST, &nick)
            .text(replies.join(" "))
            .into_message();
        tables.send(ctx.uid, reply);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::handlers::test_support::Harness;

    #[test]
    fn test_userhost_known_and_unknown() {
        let mut h = Harness::new();
        let bob = h.register("bob");
        let _alice = h.register("alice");
        h.line(bob, "USERHOST alice ghost bob").unwrap();
        assert_eq!(
            h.drain(bob),
            vec![":irc.test 302 bob :alice=+alice@127.0.0.1 bob=+bob@127.0.0.1"]
        );
    }

    #[test]
    fn test_userhost_flags() {
        let mut h = Harness::new();
        let bob = h.register("bob");
        {
            let mut tables = h.matrix.lock();
            let user = tables.user_mut(bob).unwrap();
            user.modes.oper = true;
            user.modes.away = true;
        }
        h.line(bob, "USERHOST bob").unwrap();
        assert_eq!(h.drain(bob), vec![":irc.test 302 bob bob*=-bob@127.0.0.1"]);
    }

    #[test]
    fn test_userhost_needs_a_nick() {
        let mut h = Harness::new();
        let bob = h.register("bob");
        h.line(bob, "USERHOST").unwrap();
        assert_eq!(h.codes(bob), vec!["461"]);
    }
}
