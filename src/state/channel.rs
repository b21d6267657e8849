//! Channels and the mode authority that guards them.
//!
//! Every mutation a requester can attempt through MODE is decided here
//! against the requester's [`Rank`]; the handler only parses arguments,
//! resolves nicks and reports the outcome.

use kestrel_proto::{matches_hostmask, normalize_mask};
use std::collections::{BTreeMap, HashSet};
use std::time::{Duration, Instant};

use super::{Rank, Uid};
use crate::error::ChannelError;

/// Boolean channel flags.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ChannelFlags {
    pub anonymous: bool,   // +a
    pub invite_only: bool, // +i
    pub moderated: bool,   // +m
    pub no_external: bool, // +n
    pub quiet: bool,       // +q
    pub private: bool,     // +p
    pub secret: bool,      // +s
    pub topic_lock: bool,  // +t
}

impl ChannelFlags {
    const LETTERS: [char; 8] = ['a', 'i', 'm', 'n', 'q', 'p', 's', 't'];

    fn get(&self, letter: char) -> Option<bool> {
        Some(match letter {
            'a' => self.anonymous,
            'i' => self.invite_only,
            'm' => self.moderated,
            'n' => self.no_external,
            'q' => self.quiet,
            'p' => self.private,
            's' => self.secret,
            't' => self.topic_lock,
            _ => return None,
        })
    }

    fn get_mut(&mut self, letter: char) -> Option<&mut bool> {
        Some(match letter {
            'a' => &mut self.anonymous,
            'i' => &mut self.invite_only,
            'm' => &mut self.moderated,
            'n' => &mut self.no_external,
            'q' => &mut self.quiet,
            'p' => &mut self.private,
            's' => &mut self.secret,
            't' => &mut self.topic_lock,
            _ => return None,
        })
    }
}

/// Minimum rank needed to toggle a channel flag, `k` and `l` included.
pub fn flag_rank(letter: char) -> Option<Rank> {
    match letter {
        'a' | 'i' | 'n' | 'k' | 'l' => Some(Rank::Operator),
        'm' | 't' => Some(Rank::HalfOp),
        'p' | 's' | 'q' => Some(Rank::Admin),
        _ => None,
    }
}

/// True for the access-list letters `b`, `e` and `I`.
pub fn is_list_letter(letter: char) -> bool {
    matches!(letter, 'b' | 'e' | 'I')
}

/// One applied mode change, as it will be broadcast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModeChange {
    pub adding: bool,
    pub letter: char,
    pub arg: Option<String>,
}

impl ModeChange {
    pub fn new(adding: bool, letter: char, arg: Option<String>) -> Self {
        Self {
            adding,
            letter,
            arg,
        }
    }
}

/// Why a single requested change was not applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeRejection {
    /// The requester's rank is too low.
    Denied,
    /// Not a channel mode letter.
    Unknown(char),
    /// `+k` or `+l` without a usable argument.
    MissingArg,
}

/// Render applied changes as MODE parameters: `["+o-v", "bob", "carol"]`.
///
/// Sign characters are only emitted when the direction flips.
pub fn render_changes(changes: &[ModeChange]) -> Vec<String> {
    let mut letters = String::new();
    let mut args = Vec::new();
    let mut sign = None;

    for change in changes {
        if sign != Some(change.adding) {
            letters.push(if change.adding { '+' } else { '-' });
            sign = Some(change.adding);
        }
        letters.push(change.letter);
        args.extend(change.arg.clone());
    }

    let mut out = Vec::with_capacity(args.len() + 1);
    out.push(letters);
    out.extend(args);
    out
}

/// Split `+ov-b` into `(adding, letter)` pairs. A missing leading sign
/// means adding.
pub fn parse_mode_letters(modes: &str) -> Vec<(bool, char)> {
    let mut adding = true;
    let mut out = Vec::new();
    for c in modes.chars() {
        match c {
            '+' => adding = true,
            '-' => adding = false,
            c => out.push((adding, c)),
        }
    }
    out
}

/// An active channel.
#[derive(Debug)]
pub struct Channel {
    /// Name as first joined, case preserved.
    pub name: String,
    pub created: Instant,
    /// Empty means no topic.
    pub topic: String,
    pub flags: ChannelFlags,
    /// Empty means no key.
    pub key: String,
    pub limit: Option<usize>,
    pub members: BTreeMap<Uid, Rank>,
    pub invited: HashSet<Uid>,
    pub bans: Vec<String>,
    pub excepts: Vec<String>,
    pub invex: Vec<String>,
}

impl Channel {
    pub fn new(name: impl Into<String>, now: Instant) -> Self {
        Self {
            name: name.into(),
            created: now,
            topic: String::new(),
            flags: ChannelFlags::default(),
            key: String::new(),
            limit: None,
            members: BTreeMap::new(),
            invited: HashSet::new(),
            bans: Vec::new(),
            excepts: Vec::new(),
            invex: Vec::new(),
        }
    }

    pub fn is_member(&self, uid: Uid) -> bool {
        self.members.contains_key(&uid)
    }

    /// Rank of `uid`, `None` for non-members.
    pub fn rank_of(&self, uid: Uid) -> Rank {
        self.members.get(&uid).copied().unwrap_or_default()
    }

    /// Explicitly invited, or implied by holding voice or better.
    pub fn is_invited(&self, uid: Uid) -> bool {
        self.invited.contains(&uid) || self.rank_of(uid) >= Rank::Voiced
    }

    /// Banned unless an exception mask also matches.
    pub fn is_banned(&self, hostmask: &str) -> bool {
        self.bans.iter().any(|m| matches_hostmask(m, hostmask))
            && !self.excepts.iter().any(|m| matches_hostmask(m, hostmask))
    }

    /// NAMES visibility symbol.
    pub fn symbol(&self) -> char {
        if self.flags.secret {
            '@'
        } else if self.flags.private {
            '*'
        } else {
            '='
        }
    }

    /// Admit `uid` after checking key, invite, limit and bans, in that order.
    ///
    /// The first joiner inside the creation window becomes Creator.
    pub fn admit(
        &mut self,
        uid: Uid,
        hostmask: &str,
        key: Option<&str>,
        creation_window: Duration,
        now: Instant,
    ) -> Result<Rank, ChannelError> {
        if !self.key.is_empty() && key != Some(self.key.as_str()) {
            return Err(ChannelError::BadKey);
        }

        if self.flags.invite_only
            && !self.is_invited(uid)
            && !self.invex.iter().any(|m| matches_hostmask(m, hostmask))
        {
            return Err(ChannelError::InviteOnly);
        }

        if let Some(limit) = self.limit
            && self.members.len() >= limit
        {
            return Err(ChannelError::ChannelFull);
        }

        if self.is_banned(hostmask) {
            return Err(ChannelError::Banned);
        }

        let rank = if self.members.is_empty()
            && now.saturating_duration_since(self.created) < creation_window
        {
            Rank::Creator
        } else {
            Rank::None
        };
        self.members.insert(uid, rank);
        Ok(rank)
    }

    /// Drop membership and any pending invite.
    pub fn remove_member(&mut self, uid: Uid) -> bool {
        self.invited.remove(&uid);
        self.members.remove(&uid).is_some()
    }

    /// Current modes as RPL_CHANNELMODEIS parameters; the key is masked
    /// unless `show_key`.
    pub fn mode_params(&self, show_key: bool) -> Vec<String> {
        let mut letters = String::from("+");
        let mut args = Vec::new();

        for letter in ChannelFlags::LETTERS {
            if self.flags.get(letter) == Some(true) {
                letters.push(letter);
            }
        }
        if !self.key.is_empty() {
            letters.push('k');
            args.push(if show_key { self.key.clone() } else { "*".to_string() });
        }
        if let Some(limit) = self.limit {
            letters.push('l');
            args.push(limit.to_string());
        }

        let mut out = vec![letters];
        out.extend(args);
        out
    }

    /// Grant (`+`) or revoke (`-`) a member rank on `target`.
    ///
    /// Granting raises the target only if it is below `level`; revoking
    /// clears it only if the target holds exactly `level`. Anyone may
    /// revoke their own rank. Returns whether the rank changed.
    pub fn change_rank(
        &mut self,
        requester: Uid,
        adding: bool,
        level: Rank,
        target: Uid,
    ) -> Result<bool, ModeRejection> {
        let self_demotion = !adding && requester == target;
        if !self_demotion && !self.rank_of(requester).can_grant(level) {
            return Err(ModeRejection::Denied);
        }

        let Some(current) = self.members.get_mut(&target) else {
            return Ok(false);
        };

        if adding && *current < level {
            *current = level;
            Ok(true)
        } else if !adding && *current == level {
            *current = Rank::None;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// The access list behind `b`, `e` or `I`.
    pub fn access_list(&self, letter: char) -> Option<&[String]> {
        match letter {
            'b' => Some(&self.bans),
            'e' => Some(&self.excepts),
            'I' => Some(&self.invex),
            _ => None,
        }
    }

    fn access_list_mut(&mut self, letter: char) -> Option<&mut Vec<String>> {
        match letter {
            'b' => Some(&mut self.bans),
            'e' => Some(&mut self.excepts),
            'I' => Some(&mut self.invex),
            _ => None,
        }
    }

    /// Add or remove one mask. Returns the normalized mask when the list
    /// actually changed, `None` for a no-op.
    pub fn change_access(
        &mut self,
        requester: Uid,
        adding: bool,
        letter: char,
        mask: &str,
    ) -> Result<Option<String>, ModeRejection> {
        if self.rank_of(requester) < Rank::Operator {
            return Err(ModeRejection::Denied);
        }
        let list = self
            .access_list_mut(letter)
            .ok_or(ModeRejection::Unknown(letter))?;

        let mask = normalize_mask(mask);
        let present = list.iter().position(|m| m.eq_ignore_ascii_case(&mask));
        match (adding, present) {
            (true, None) => {
                list.push(mask.clone());
                Ok(Some(mask))
            }
            (false, Some(idx)) => {
                let removed = list.remove(idx);
                Ok(Some(removed))
            }
            _ => Ok(None),
        }
    }

    /// Toggle a channel flag, `k` or `l`.
    ///
    /// `p` and `s` are mutually exclusive; setting one while the other is
    /// set is ignored. Returns the change to broadcast, if any.
    pub fn change_flag(
        &mut self,
        requester: Uid,
        adding: bool,
        letter: char,
        arg: Option<&str>,
    ) -> Result<Option<ModeChange>, ModeRejection> {
        let required = flag_rank(letter).ok_or(ModeRejection::Unknown(letter))?;
        if self.rank_of(requester) < required {
            return Err(ModeRejection::Denied);
        }

        match letter {
            'k' => self.change_key(adding, arg),
            'l' => self.change_limit(adding, arg),
            _ => {
                let conflict = match letter {
                    'p' => self.flags.secret,
                    's' => self.flags.private,
                    _ => false,
                };
                if adding && conflict {
                    return Ok(None);
                }
                let Some(flag) = self.flags.get_mut(letter) else {
                    return Err(ModeRejection::Unknown(letter));
                };
                if *flag == adding {
                    return Ok(None);
                }
                *flag = adding;
                Ok(Some(ModeChange::new(adding, letter, None)))
            }
        }
    }

    fn change_key(
        &mut self,
        adding: bool,
        arg: Option<&str>,
    ) -> Result<Option<ModeChange>, ModeRejection> {
        if adding {
            let key = arg
                .filter(|k| !k.is_empty() && !k.contains(' '))
                .ok_or(ModeRejection::MissingArg)?;
            if self.key == key {
                return Ok(None);
            }
            self.key = key.to_string();
            Ok(Some(ModeChange::new(true, 'k', Some(self.key.clone()))))
        } else if self.key.is_empty() {
            Ok(None)
        } else {
            self.key.clear();
            Ok(Some(ModeChange::new(false, 'k', Some("*".to_string()))))
        }
    }

    fn change_limit(
        &mut self,
        adding: bool,
        arg: Option<&str>,
    ) -> Result<Option<ModeChange>, ModeRejection> {
        if adding {
            let limit = arg
                .and_then(|a| a.parse::<usize>().ok())
                .filter(|&n| n > 0)
                .ok_or(ModeRejection::MissingArg)?;
            if self.limit == Some(limit) {
                return Ok(None);
            }
            self.limit = Some(limit);
            Ok(Some(ModeChange::new(true, 'l', Some(limit.to_string()))))
        } else if self.limit.take().is_some() {
            Ok(Some(ModeChange::new(false, 'l', None)))
        } else {
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOW: Duration = Duration::from_secs(5);

    fn channel_with(members: &[(Uid, Rank)]) -> Channel {
        let mut chan = Channel::new("#test", Instant::now());
        for &(uid, rank) in members {
            chan.members.insert(uid, rank);
        }
        chan
    }

    #[test]
    fn test_first_joiner_becomes_creator() {
        let now = Instant::now();
        let mut chan = Channel::new("#test", now);
        assert_eq!(chan.admit(1, "a!a@h", None, WINDOW, now), Ok(Rank::Creator));
        assert_eq!(chan.admit(2, "b!b@h", None, WINDOW, now), Ok(Rank::None));
    }

    #[test]
    fn test_empty_channel_after_window_grants_nothing() {
        let created = Instant::now();
        let mut chan = Channel::new("#test", created);
        let later = created + Duration::from_secs(10);
        assert_eq!(chan.admit(1, "a!a@h", None, WINDOW, later), Ok(Rank::None));
    }

    #[test]
    fn test_admit_checks() {
        let now = Instant::now();
        let mut chan = channel_with(&[(1, Rank::Creator)]);

        chan.key = "secret".into();
        assert_eq!(chan.admit(2, "b!b@h", None, WINDOW, now), Err(ChannelError::BadKey));
        assert_eq!(
            chan.admit(2, "b!b@h", Some("wrong"), WINDOW, now),
            Err(ChannelError::BadKey)
        );
        chan.key.clear();

        chan.flags.invite_only = true;
        assert_eq!(chan.admit(2, "b!b@h", None, WINDOW, now), Err(ChannelError::InviteOnly));
        chan.invex.push("b!*@*".into());
        assert!(chan.admit(2, "b!b@h", None, WINDOW, now).is_ok());
        chan.invited.insert(3);
        assert!(chan.admit(3, "c!c@h", None, WINDOW, now).is_ok());
        chan.flags.invite_only = false;

        chan.limit = Some(3);
        assert_eq!(chan.admit(4, "d!d@h", None, WINDOW, now), Err(ChannelError::ChannelFull));
        chan.limit = None;

        chan.bans.push("*!*@spam.net".into());
        assert_eq!(chan.admit(4, "d!d@spam.net", None, WINDOW, now), Err(ChannelError::Banned));
        chan.excepts.push("d!*@*".into());
        assert!(chan.admit(4, "d!d@spam.net", None, WINDOW, now).is_ok());
    }

    #[test]
    fn test_invited_implied_by_voice() {
        let mut chan = channel_with(&[(1, Rank::Voiced), (2, Rank::None)]);
        assert!(chan.is_invited(1));
        assert!(!chan.is_invited(2));
        chan.invited.insert(2);
        assert!(chan.is_invited(2));
        chan.remove_member(2);
        assert!(!chan.is_invited(2));
    }

    #[test]
    fn test_non_operator_cannot_grant_op() {
        let mut chan = channel_with(&[(1, Rank::None), (2, Rank::None)]);
        assert_eq!(chan.change_rank(1, true, Rank::Operator, 2), Err(ModeRejection::Denied));
        assert_eq!(chan.rank_of(2), Rank::None);
    }

    #[test]
    fn test_grant_raises_only() {
        let mut chan = channel_with(&[(1, Rank::Creator), (2, Rank::Operator)]);
        assert_eq!(chan.change_rank(1, true, Rank::Voiced, 2), Ok(false));
        assert_eq!(chan.rank_of(2), Rank::Operator);
        assert_eq!(chan.change_rank(1, true, Rank::Admin, 2), Ok(true));
        assert_eq!(chan.rank_of(2), Rank::Admin);
    }

    #[test]
    fn test_revoke_requires_exact_level() {
        let mut chan = channel_with(&[(1, Rank::Creator), (2, Rank::Operator)]);
        assert_eq!(chan.change_rank(1, false, Rank::Voiced, 2), Ok(false));
        assert_eq!(chan.rank_of(2), Rank::Operator);
        assert_eq!(chan.change_rank(1, false, Rank::Operator, 2), Ok(true));
        assert_eq!(chan.rank_of(2), Rank::None);
    }

    #[test]
    fn test_self_demotion_always_allowed() {
        let mut chan = channel_with(&[(1, Rank::Creator), (2, Rank::Voiced)]);
        assert_eq!(chan.change_rank(2, false, Rank::Voiced, 2), Ok(true));
        assert_eq!(chan.change_rank(1, false, Rank::Creator, 1), Ok(true));
        assert_eq!(chan.rank_of(1), Rank::None);
        // ...but not self-promotion.
        assert_eq!(chan.change_rank(2, true, Rank::Voiced, 2), Err(ModeRejection::Denied));
    }

    #[test]
    fn test_creator_cannot_be_granted() {
        let mut chan = channel_with(&[(1, Rank::Creator), (2, Rank::Admin)]);
        assert_eq!(chan.change_rank(1, true, Rank::Creator, 2), Err(ModeRejection::Denied));
    }

    #[test]
    fn test_access_add_is_idempotent() {
        let mut chan = channel_with(&[(1, Rank::Operator)]);
        assert_eq!(
            chan.change_access(1, true, 'b', "*!*@spammer.com"),
            Ok(Some("*!*@spammer.com".to_string()))
        );
        assert_eq!(chan.change_access(1, true, 'b', "*!*@spammer.com"), Ok(None));
        assert_eq!(chan.bans.len(), 1);

        assert_eq!(chan.change_access(1, false, 'b', "*!*@other"), Ok(None));
        assert_eq!(
            chan.change_access(1, false, 'b', "*!*@SPAMMER.com"),
            Ok(Some("*!*@spammer.com".to_string()))
        );
        assert!(chan.bans.is_empty());
    }

    #[test]
    fn test_access_normalizes_and_needs_operator() {
        let mut chan = channel_with(&[(1, Rank::HalfOp), (2, Rank::Operator)]);
        assert_eq!(chan.change_access(1, true, 'e', "bob"), Err(ModeRejection::Denied));
        assert_eq!(chan.change_access(2, true, 'I', "bob"), Ok(Some("bob!*@*".to_string())));
        assert_eq!(chan.invex, vec!["bob!*@*"]);
    }

    #[test]
    fn test_flag_gates() {
        let mut chan = channel_with(&[(1, Rank::HalfOp), (2, Rank::Operator), (3, Rank::Admin)]);
        assert!(chan.change_flag(1, true, 'm', None).unwrap().is_some());
        assert_eq!(chan.change_flag(1, true, 'i', None), Err(ModeRejection::Denied));
        assert!(chan.change_flag(2, true, 'i', None).unwrap().is_some());
        assert_eq!(chan.change_flag(2, true, 's', None), Err(ModeRejection::Denied));
        assert!(chan.change_flag(3, true, 's', None).unwrap().is_some());
        assert_eq!(chan.change_flag(3, true, 'x', None), Err(ModeRejection::Unknown('x')));
    }

    #[test]
    fn test_private_and_secret_exclusive() {
        let mut chan = channel_with(&[(1, Rank::Admin)]);
        assert!(chan.change_flag(1, true, 's', None).unwrap().is_some());
        assert_eq!(chan.change_flag(1, true, 'p', None), Ok(None));
        assert!(!chan.flags.private);
        assert!(chan.change_flag(1, false, 's', None).unwrap().is_some());
        assert!(chan.change_flag(1, true, 'p', None).unwrap().is_some());
        assert_eq!(chan.change_flag(1, true, 's', None), Ok(None));
        assert!(!(chan.flags.private && chan.flags.secret));
    }

    #[test]
    fn test_key_and_limit() {
        let mut chan = channel_with(&[(1, Rank::Operator)]);
        assert_eq!(chan.change_flag(1, true, 'k', None), Err(ModeRejection::MissingArg));
        assert_eq!(
            chan.change_flag(1, true, 'k', Some("pw")),
            Ok(Some(ModeChange::new(true, 'k', Some("pw".into()))))
        );
        assert_eq!(chan.change_flag(1, true, 'l', Some("zero")), Err(ModeRejection::MissingArg));
        assert!(chan.change_flag(1, true, 'l', Some("10")).unwrap().is_some());
        chan.flags.no_external = true;
        chan.flags.topic_lock = true;

        assert_eq!(chan.mode_params(true), vec!["+ntkl", "pw", "10"]);
        assert_eq!(chan.mode_params(false), vec!["+ntkl", "*", "10"]);

        assert!(chan.change_flag(1, false, 'k', None).unwrap().is_some());
        assert!(chan.change_flag(1, false, 'l', None).unwrap().is_some());
        assert_eq!(chan.change_flag(1, false, 'l', None), Ok(None));
        assert_eq!(chan.mode_params(true), vec!["+nt"]);
    }

    #[test]
    fn test_render_changes() {
        let changes = [
            ModeChange::new(true, 'o', Some("bob".into())),
            ModeChange::new(true, 'v', Some("bob".into())),
            ModeChange::new(false, 'm', None),
        ];
        assert_eq!(render_changes(&changes), vec!["+ov-m", "bob", "bob"]);
    }

    #[test]
    fn test_parse_mode_letters() {
        assert_eq!(
            parse_mode_letters("+o-v+b"),
            vec![(true, 'o'), (false, 'v'), (true, 'b')]
        );
        assert_eq!(parse_mode_letters("nt"), vec![(true, 'n'), (true, 't')]);
    }
}
