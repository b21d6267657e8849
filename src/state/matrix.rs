//! The Matrix - the server registry.
//!
//! Users and channels live in one [`Tables`] value behind a single
//! `parking_lot::Mutex`. Every mutation (nick claims, joins, parts, mode
//! changes, quits, sweeps) happens while that lock is held, and the lock is
//! never held across an `.await`. Delivery to sessions is a `try_send` into
//! each user's bounded outbound queue, so a slow peer can never stall the
//! sender; a full queue schedules that peer's disconnect instead.

use kestrel_proto::{Message, Response};
use parking_lot::{Mutex, MutexGuard};
use std::collections::{BTreeSet, HashMap};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tracing::{debug, info, warn};

use super::lifecycle::{Disconnector, LifecycleManager};
use super::uid::UidGenerator;
use super::user::User;
use super::{Channel, Rank, Uid};
use crate::config::{ChannelConfig, Config, KeepaliveConfig, LimitsConfig};
use crate::error::ChannelError;

/// Reason attached to peers dropped for a full outbound queue.
pub const SENDQ_EXCEEDED: &str = "SendQ exceeded";

/// This server's identity information.
#[derive(Debug, Clone)]
pub struct ServerInfo {
    pub name: String,
    pub network: String,
    pub description: String,
    /// Human-readable start time for RPL_CREATED.
    pub created: String,
    pub motd: Vec<String>,
}

/// Lowercase key for the channel table (ASCII casemapping).
pub fn channel_key(name: &str) -> String {
    name.to_ascii_lowercase()
}

/// The nick is already held by another connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NickInUse;

/// Outcome of one idle sweep.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct SweepReport {
    pub pinged: usize,
    pub timed_out: usize,
}

/// Everything guarded by the registry lock.
pub struct Tables {
    /// All connected users, indexed by UID.
    pub users: HashMap<Uid, User>,
    /// Exact (case-sensitive) nick to UID.
    pub nicks: HashMap<String, Uid>,
    /// All channels, indexed by lowercase name.
    pub channels: HashMap<String, Channel>,
    server_name: String,
    disconnector: Disconnector,
}

impl Tables {
    fn new(server_name: String, disconnector: Disconnector) -> Self {
        Self {
            users: HashMap::new(),
            nicks: HashMap::new(),
            channels: HashMap::new(),
            server_name,
            disconnector,
        }
    }

    pub fn user(&self, uid: Uid) -> Option<&User> {
        self.users.get(&uid)
    }

    pub fn user_mut(&mut self, uid: Uid) -> Option<&mut User> {
        self.users.get_mut(&uid)
    }

    /// Exact-match nick lookup.
    pub fn find_nick(&self, nick: &str) -> Option<Uid> {
        self.nicks.get(nick).copied()
    }

    pub fn find_channel(&self, name: &str) -> Option<&Channel> {
        self.channels.get(&channel_key(name))
    }

    pub fn find_channel_mut(&mut self, name: &str) -> Option<&mut Channel> {
        self.channels.get_mut(&channel_key(name))
    }

    /// Nick of `uid`, or `*` when unknown or not yet set.
    pub fn nick_of(&self, uid: Uid) -> &str {
        self.users.get(&uid).map_or("*", User::display_nick)
    }

    // ------------------------------------------------------------------
    // Delivery
    // ------------------------------------------------------------------

    /// Queue a message for one user.
    pub fn send(&self, uid: Uid, msg: Message) {
        self.send_arc(uid, Arc::new(msg));
    }

    /// Queue a shared message for one user. A full queue schedules the
    /// user's disconnect; a closed one means the session is already gone.
    pub fn send_arc(&self, uid: Uid, msg: Arc<Message>) {
        let Some(user) = self.users.get(&uid) else {
            return;
        };
        match user.sender.try_send(msg) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => {
                warn!(uid, nick = %user.nick, "SendQ exceeded, disconnecting");
                self.disconnector.request(uid, SENDQ_EXCEEDED);
            }
            Err(TrySendError::Closed(_)) => {
                debug!(uid, "Outbound queue closed");
            }
        }
    }

    /// Queue a server numeric or notice with this server as prefix.
    pub fn send_from_server(&self, uid: Uid, msg: impl Into<Message>) {
        let mut msg = msg.into();
        if msg.prefix.is_none() {
            msg.prefix = Some(self.server_name.clone());
        }
        self.send(uid, msg);
    }

    /// Send to every member of a channel, optionally skipping one.
    pub fn broadcast(&self, channel: &str, msg: Message, except: Option<Uid>) {
        let Some(chan) = self.find_channel(channel) else {
            return;
        };
        let msg = Arc::new(msg);
        for &member in chan.members.keys() {
            if Some(member) != except {
                self.send_arc(member, Arc::clone(&msg));
            }
        }
    }

    /// `uid` plus everyone sharing at least one channel with it.
    pub fn peers_of(&self, uid: Uid) -> BTreeSet<Uid> {
        let mut peers = BTreeSet::from([uid]);
        if let Some(user) = self.users.get(&uid) {
            for key in &user.channels {
                if let Some(chan) = self.channels.get(key) {
                    peers.extend(chan.members.keys().copied());
                }
            }
        }
        peers
    }

    /// Send once to `uid` and each of its channel peers.
    pub fn broadcast_peers(&self, uid: Uid, msg: Message) {
        let msg = Arc::new(msg);
        for peer in self.peers_of(uid) {
            self.send_arc(peer, Arc::clone(&msg));
        }
    }

    // ------------------------------------------------------------------
    // Nicks
    // ------------------------------------------------------------------

    /// Claim `nick` for `uid`, releasing its previous nick. Returns the old
    /// nick (empty before the first claim).
    pub fn claim_nick(&mut self, uid: Uid, nick: &str) -> Result<String, NickInUse> {
        if let Some(&holder) = self.nicks.get(nick)
            && holder != uid
        {
            return Err(NickInUse);
        }
        let Some(user) = self.users.get_mut(&uid) else {
            return Err(NickInUse);
        };

        let old = std::mem::replace(&mut user.nick, nick.to_string());
        if !old.is_empty() {
            self.nicks.remove(&old);
        }
        self.nicks.insert(nick.to_string(), uid);
        Ok(old)
    }

    // ------------------------------------------------------------------
    // Channels
    // ------------------------------------------------------------------

    /// Join `uid` to `name`, creating the channel if needed. Returns the
    /// granted rank, or `Ok(None)` when already a member.
    pub fn join_channel(
        &mut self,
        uid: Uid,
        name: &str,
        key: Option<&str>,
        creation_window: Duration,
        now: Instant,
    ) -> Result<Option<Rank>, ChannelError> {
        let Some(user) = self.users.get(&uid) else {
            return Err(ChannelError::NoSuchChannel);
        };
        let hostmask = user.hostmask();
        let lower = channel_key(name);

        let chan = self.channels.entry(lower.clone()).or_insert_with(|| {
            info!(channel = %name, "Channel created");
            Channel::new(name, now)
        });
        if chan.is_member(uid) {
            return Ok(None);
        }
        let rank = chan.admit(uid, &hostmask, key, creation_window, now)?;

        if let Some(user) = self.users.get_mut(&uid) {
            user.channels.insert(lower);
        }
        Ok(Some(rank))
    }

    /// Broadcast `PART` to the channel (leaver included) and drop the
    /// membership. Returns false when `uid` was not a member.
    pub fn part_channel(&mut self, uid: Uid, name: &str, reason: Option<&str>) -> bool {
        let lower = channel_key(name);
        let Some(user) = self.users.get(&uid) else {
            return false;
        };
        let Some(chan) = self.channels.get(&lower) else {
            return false;
        };
        if !chan.is_member(uid) {
            return false;
        }

        let part = Message::part(chan.name.clone(), reason).with_prefix(user.hostmask());
        self.broadcast(&lower, part, None);

        if let Some(chan) = self.channels.get_mut(&lower) {
            chan.remove_member(uid);
        }
        if let Some(user) = self.users.get_mut(&uid) {
            user.channels.remove(&lower);
        }
        true
    }

    /// Destroy every channel with no members. Returns how many went.
    pub fn prune_channels(&mut self) -> usize {
        let before = self.channels.len();
        self.channels.retain(|_, chan| {
            let keep = !chan.members.is_empty();
            if !keep {
                info!(channel = %chan.name, "Channel destroyed");
            }
            keep
        });
        before - self.channels.len()
    }

    // ------------------------------------------------------------------
    // Users
    // ------------------------------------------------------------------

    /// Tear a user down: PART every joined channel with `reason`, queue
    /// the closing `ERROR`, and drop the user from both tables. Dropping
    /// the user drops its outbound sender, which ends the session once the
    /// queue drains. Returns false when the user was already gone.
    pub fn remove_user(&mut self, uid: Uid, reason: &str) -> bool {
        let Some(user) = self.users.get(&uid) else {
            return false;
        };
        let joined: Vec<String> = user.channels.iter().cloned().collect();
        let host = user.host.clone();

        for key in &joined {
            self.part_channel(uid, key, Some(reason));
        }
        for chan in self.channels.values_mut() {
            chan.invited.remove(&uid);
        }

        self.send(uid, Message::error(format!("Closing Link: {host} ({reason})")));

        let Some(user) = self.users.remove(&uid) else {
            return false;
        };
        if !user.nick.is_empty() && self.nicks.get(&user.nick) == Some(&uid) {
            self.nicks.remove(&user.nick);
        }
        info!(uid, nick = %user.nick, reason, "User removed");
        true
    }
}

/// The Matrix - central shared state container.
pub struct Matrix {
    /// This server's identity.
    pub server_info: ServerInfo,
    pub keepalive: KeepaliveConfig,
    pub channel_config: ChannelConfig,
    pub limits: LimitsConfig,
    /// UID generator for new connections.
    pub uid_gen: UidGenerator,
    pub lifecycle: LifecycleManager,
    tables: Mutex<Tables>,
}

impl Matrix {
    pub fn new(config: &Config, disconnect_tx: mpsc::Sender<(Uid, String)>) -> Self {
        let lifecycle = LifecycleManager::new(disconnect_tx);
        let server_info = ServerInfo {
            name: config.server.name.clone(),
            network: config.server.network.clone(),
            description: config.server.description.clone(),
            created: chrono::Utc::now().format("%a %b %e %Y at %H:%M:%S UTC").to_string(),
            motd: config.server.motd.clone(),
        };
        let tables = Tables::new(server_info.name.clone(), lifecycle.disconnector.clone());

        Self {
            server_info,
            keepalive: config.keepalive.clone(),
            channel_config: config.channels.clone(),
            limits: config.limits.clone(),
            uid_gen: UidGenerator::new(),
            lifecycle,
            tables: Mutex::new(tables),
        }
    }

    /// Take the registry lock. Never hold the guard across an `.await`.
    pub fn lock(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock()
    }

    /// Register a freshly accepted connection and hand back its outbound
    /// queue.
    pub fn connect(&self, remote_addr: SocketAddr) -> (Uid, mpsc::Receiver<Arc<Message>>) {
        let uid = self.uid_gen.next();
        let (tx, rx) = mpsc::channel(self.limits.sendq.max(1));
        let user = User::new(uid, remote_addr, tx);
        self.lock().users.insert(uid, user);
        (uid, rx)
    }

    /// Registry-level quit. Idempotent.
    pub fn quit(&self, uid: Uid, reason: &str) -> bool {
        self.lock().remove_user(uid, reason)
    }

    /// Record activity from `uid`.
    pub fn touch(&self, uid: Uid) {
        if let Some(user) = self.lock().user_mut(uid) {
            user.last_active = Instant::now();
        }
    }

    /// PING everyone idle past `ping_after`; drop everyone idle past
    /// `timeout_after` with "ping timeout".
    pub fn sweep_idle(&self, now: Instant) -> SweepReport {
        let ping_after = self.keepalive.ping_after();
        let timeout_after = self.keepalive.timeout_after();
        let host = &self.server_info.name;

        let mut tables = self.lock();
        let mut report = SweepReport::default();
        let mut expired = Vec::new();

        for user in tables.users.values() {
            let idle = now.saturating_duration_since(user.last_active);
            if idle >= timeout_after {
                expired.push(user.uid);
            } else if idle >= ping_after {
                report.pinged += 1;
                tables.send(user.uid, Message::ping(host.clone()).with_prefix(host.clone()));
            }
        }

        for uid in expired {
            info!(uid, "Ping timeout");
            if tables.remove_user(uid, "ping timeout") {
                report.timed_out += 1;
            }
        }
        report
    }

    /// Destroy empty channels.
    pub fn prune_channels(&self) -> usize {
        self.lock().prune_channels()
    }

    /// Number of connected users.
    pub fn user_count(&self) -> usize {
        self.lock().users.len()
    }

    /// RPL_ISUPPORT tokens advertised after registration, one line each.
    pub fn isupport_lines(&self) -> [String; 2] {
        [
            format!(
                "CASEMAPPING=ascii PREFIX={} NETWORK={} NICKLEN={}",
                super::rank::isupport_prefix(),
                self.server_info.network,
                kestrel_proto::nick::NICK_MAX_LEN,
            ),
            format!(
                "CHANTYPES={} CHANMODES=beI,k,l,aimnpqst CHANNELLEN={} INVEX=I EXCEPTS=e",
                kestrel_proto::chan::CHANNEL_PREFIXES,
                kestrel_proto::chan::CHANNEL_MAX_LEN,
            ),
        ]
    }

    /// Numeric builder prefixed with this server's name.
    pub fn reply(&self, code: Response, target: &str) -> kestrel_proto::Numeric {
        code.reply(self.server_info.name.clone(), target)
    }
}
