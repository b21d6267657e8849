//! Welcome burst and registration completion.

use crate::state::{Matrix, Tables, Uid};
use kestrel_proto::{Message, Response};
use tracing::info;

/// User modes advertised in RPL_MYINFO.
const USER_MODES: &str = "aiwroOs";
/// Channel modes advertised in RPL_MYINFO.
const CHANNEL_MODES: &str = "aimnqpstklbeIohv";

/// Mark `uid` registered and send the welcome burst, if NICK and USER
/// are both in and CAP negotiation is not holding registration.
///
/// Returns whether registration completed on this call.
pub fn complete_registration(matrix: &Matrix, tables: &mut Tables, uid: Uid) -> bool {
    let Some(user) = tables.user_mut(uid) else {
        return false;
    };
    if !user.can_complete_registration() {
        return false;
    }
    user.registered = true;

    let nick = user.nick.clone();
    let hostmask = user.hostmask();
    let modes = user.modes.clone();
    info!(uid, nick = %nick, host = %user.host, "Client registered");

    let server = &matrix.server_info;
    let version = concat!("kestreld-", env!("CARGO_PKG_VERSION"));

    let mut burst = vec![
        matrix
            .reply(Response::RPL_WELCOME, &nick)
            .text(format!(
                "Welcome to the {} Internet Relay Network {}",
                server.network, hostmask
            ))
            .into_message(),
        matrix
            .reply(Response::RPL_YOURHOST, &nick)
            .text(format!("Your host is {}, running version {}", server.name, version))
            .into_message(),
        matrix
            .reply(Response::RPL_CREATED, &nick)
            .text(format!("This server was created {}", server.created))
            .into_message(),
        matrix
            .reply(Response::RPL_MYINFO, &nick)
            .args([server.name.as_str(), version, USER_MODES, CHANNEL_MODES])
            .into_message(),
    ];

    for line in matrix.isupport_lines() {
        burst.push(
            matrix
                .reply(Response::RPL_ISUPPORT, &nick)
                .args(line.split(' '))
                .text("are supported by this server")
                .into_message(),
        );
    }

    if server.motd.is_empty() {
        burst.push(
            matrix
                .reply(Response::ERR_NOMOTD, &nick)
                .text("MOTD File is missing")
                .into_message(),
        );
    } else {
        burst.push(
            matrix
                .reply(Response::RPL_MOTDSTART, &nick)
                .text(format!("- {} Message of the day - ", server.name))
                .into_message(),
        );
        for line in &server.motd {
            burst.push(
                matrix
                    .reply(Response::RPL_MOTD, &nick)
                    .text(format!("- {line}"))
                    .into_message(),
            );
        }
        burst.push(
            matrix
                .reply(Response::RPL_ENDOFMOTD, &nick)
                .text("End of MOTD command")
                .into_message(),
        );
    }

    if !modes.is_empty() {
        burst.push(
            Message::new("MODE", vec![nick.clone(), modes.as_mode_string()]).with_prefix(hostmask),
        );
    }

    for msg in burst {
        tables.send(uid, msg);
    }
    true
}
