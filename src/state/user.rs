//! Connected users and their personal modes.

use kestrel_proto::Message;
use std::collections::BTreeSet;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc;

use super::Uid;

/// User modes.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct UserModes {
    pub invisible: bool,      // +i
    pub away: bool,           // +a
    pub restricted: bool,     // +r
    pub oper: bool,           // +o
    pub local_oper: bool,     // +O
    pub wallops: bool,        // +w
    pub server_notices: bool, // +s
    /// Set by the server only; MODE cannot toggle it.
    pub registered: bool,     // +R
}

impl UserModes {
    /// Modes from the USER command's numeric mode field.
    ///
    /// Bit 8 sets invisible, 4 restricted, 2 wallops. Anything that is
    /// not a number yields no modes.
    pub fn from_user_bits(field: &str) -> Self {
        let bits = field.parse::<u32>().unwrap_or(0);
        Self {
            invisible: bits & 8 != 0,
            restricted: bits & 4 != 0,
            wallops: bits & 2 != 0,
            ..Self::default()
        }
    }

    /// True when no mode is set.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Convert modes to a string like "+iw".
    pub fn as_mode_string(&self) -> String {
        let mut s = String::from("+");
        for (set, letter) in [
            (self.away, 'a'),
            (self.invisible, 'i'),
            (self.wallops, 'w'),
            (self.restricted, 'r'),
            (self.oper, 'o'),
            (self.local_oper, 'O'),
            (self.server_notices, 's'),
            (self.registered, 'R'),
        ] {
            if set {
                s.push(letter);
            }
        }
        s
    }

    /// True for `+o` or `+O`.
    pub fn is_oper(&self) -> bool {
        self.oper || self.local_oper
    }

    /// Apply a `+iw-a` style string and return whether anything changed.
    ///
    /// `a`, `o` and `O` can only be removed this way; `i w r s` toggle.
    /// Unknown letters are skipped.
    pub fn apply(&mut self, modes: &str) -> bool {
        let mut adding = true;
        let mut changed = false;

        for c in modes.chars() {
            let flag = match c {
                '+' => {
                    adding = true;
                    continue;
                }
                '-' => {
                    adding = false;
                    continue;
                }
                'i' => &mut self.invisible,
                'w' => &mut self.wallops,
                'r' => &mut self.restricted,
                's' => &mut self.server_notices,
                'a' if !adding => &mut self.away,
                'o' if !adding => &mut self.oper,
                'O' if !adding => &mut self.local_oper,
                _ => continue,
            };
            if *flag != adding {
                *flag = adding;
                changed = true;
            }
        }

        changed
    }
}

/// A connected user.
///
/// Created when a connection is accepted; `nick` stays empty until a valid
/// NICK arrives and `registered` flips once both NICK and USER are in.
#[derive(Debug)]
pub struct User {
    pub uid: Uid,
    pub nick: String,
    pub user: String,
    pub realname: String,
    pub host: String,
    pub remote_addr: SocketAddr,
    pub registered: bool,
    /// Registration is held while CAP negotiation is open.
    pub cap_negotiating: bool,
    pub modes: UserModes,
    /// Joined channels by lowercase name.
    pub channels: BTreeSet<String>,
    /// Refreshed by every inbound line.
    pub last_active: Instant,
    /// Unix time the connection was accepted.
    pub signon: i64,
    pub(super) sender: mpsc::Sender<Arc<Message>>,
}

impl User {
    pub fn new(uid: Uid, remote_addr: SocketAddr, sender: mpsc::Sender<Arc<Message>>) -> Self {
        Self {
            uid,
            nick: String::new(),
            user: String::new(),
            realname: String::new(),
            host: remote_addr.ip().to_string(),
            remote_addr,
            registered: false,
            cap_negotiating: false,
            modes: UserModes::default(),
            channels: BTreeSet::new(),
            last_active: Instant::now(),
            signon: chrono::Utc::now().timestamp(),
            sender,
        }
    }

    /// `nick!user@host`, the prefix for everything this user originates.
    pub fn hostmask(&self) -> String {
        format!("{}!{}@{}", self.nick, self.user, self.host)
    }

    /// Nick for numeric targets: `*` until one is set.
    pub fn display_nick(&self) -> &str {
        if self.nick.is_empty() { "*" } else { &self.nick }
    }

    /// Both halves of the handshake are in and CAP is not holding it.
    pub fn can_complete_registration(&self) -> bool {
        !self.registered && !self.nick.is_empty() && !self.user.is_empty() && !self.cap_negotiating
    }
}
