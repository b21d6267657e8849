//! CAP command handler.
//!
//! Capability negotiation is advertisement only: one fixed capability is
//! offered and acknowledged. Its real effect is holding registration open
//! between `CAP LS` and `CAP END`, which clients expect.

use super::connection::complete_registration;
use super::{Context, Handler};
use crate::error::{HandlerError, HandlerResult};
use kestrel_proto::Message;
use tracing::debug;

/// Capabilities we advertise.
const SUPPORTED_CAPS: &str = "multi-prefix";

/// Handler for CAP command.
pub struct CapHandler;

impl Handler for CapHandler {
    fn name(&self) -> &'static str {
        "CAP"
    }

    fn requires_registration(&self) -> bool {
        false
    }

    fn handle(&self, ctx: &mut Context<'_>, msg: &Message) -> HandlerResult {
        let subcommand = msg
            .param(0)
            .ok_or(HandlerError::NeedMoreParams)?
            .to_ascii_uppercase();

        let mut tables = ctx.matrix.lock();
        let Some(user) = tables.user_mut(ctx.uid) else {
            return Ok(());
        };
        let target = user.display_nick().to_string();

        let reply = match subcommand.as_str() {
            "LS" => {
                if !user.registered {
                    user.cap_negotiating = true;
                }
                Some(("LS", SUPPORTED_CAPS))
            }
            "REQ" => Some(("ACK", SUPPORTED_CAPS)),
            "END" => {
                user.cap_negotiating = false;
                let reply = Message::new("CAP", vec![target.clone(), "END".to_string()]);
                tables.send_from_server(ctx.uid, reply);
                complete_registration(ctx.matrix, &mut tables, ctx.uid);
                None
            }
            "LIST" | "ACK" | "NAK" | "CLEAR" => None,
            other => {
                debug!(uid = ctx.uid, subcommand = %other, "Unknown CAP subcommand");
                None
            }
        };

        if let Some((verb, caps)) = reply {
            let reply = Message::new(
                "CAP",
                vec![target, verb.to_string(), caps.to_string()],
            );
            tables.send_from_server(ctx.uid, reply);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::handlers::test_support::Harness;

    #[test]
    fn test_cap_holds_registration_until_end() {
        let mut h = Harness::new();
        let uid = h.connect();
        h.line(uid, "CAP LS 302").unwrap();
        h.line(uid, "NICK bob").unwrap();
        h.line(uid, "USER bob 0 * :Bob").unwrap();
        assert_eq!(h.drain(uid), vec![":irc.test CAP * LS multi-prefix"]);
        assert!(!h.matrix.lock().user(uid).unwrap().registered);

        h.line(uid, "CAP REQ :multi-prefix").unwrap();
        assert_eq!(h.drain(uid), vec![":irc.test CAP bob ACK multi-prefix"]);

        h.line(uid, "CAP END").unwrap();
        let codes = h.codes(uid);
        assert_eq!(codes[0], "CAP");
        assert_eq!(codes[1], "001");
        assert!(h.matrix.lock().user(uid).unwrap().registered);
    }

    #[test]
    fn test_noop_subcommands() {
        let mut h = Harness::new();
        let uid = h.register("bob");
        for sub in ["LIST", "ACK", "NAK", "CLEAR", "BOGUS"] {
            h.line(uid, &format!("CAP {sub}")).unwrap();
        }
        assert!(h.drain(uid).is_empty());
    }

    #[test]
    fn test_ls_after_registration_does_not_hold() {
        let mut h = Harness::new();
        let uid = h.register("bob");
        h.line(uid, "CAP LS").unwrap();
        assert!(!h.matrix.lock().user(uid).unwrap().cap_negotiating);
    }
}
