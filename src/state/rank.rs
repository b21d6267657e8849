//! Channel membership ranks.
//!
//! A single ordinal replaces per-level booleans: holding a rank grants
//! everything below it, so permission checks are plain comparisons.

use std::fmt;

/// Privilege level of one member in one channel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Rank {
    #[default]
    None,
    Voiced,
    HalfOp,
    Operator,
    Admin,
    Creator,
}

impl Rank {
    /// Ranks from highest to lowest, in ISUPPORT `PREFIX` order.
    pub const DESCENDING: [Rank; 5] = [
        Rank::Creator,
        Rank::Admin,
        Rank::Operator,
        Rank::HalfOp,
        Rank::Voiced,
    ];

    /// Rank conferred by a member-mode letter.
    pub fn from_mode_letter(letter: char) -> Option<Self> {
        match letter {
            'q' => Some(Rank::Creator),
            'a' => Some(Rank::Admin),
            'o' => Some(Rank::Operator),
            'h' => Some(Rank::HalfOp),
            'v' => Some(Rank::Voiced),
            _ => None,
        }
    }

    pub fn mode_letter(self) -> Option<char> {
        match self {
            Rank::Creator => Some('q'),
            Rank::Admin => Some('a'),
            Rank::Operator => Some('o'),
            Rank::HalfOp => Some('h'),
            Rank::Voiced => Some('v'),
            Rank::None => None,
        }
    }

    /// NAMES / WHOIS prefix character.
    pub fn prefix(self) -> Option<char> {
        match self {
            Rank::Creator => Some('~'),
            Rank::Admin => Some('&'),
            Rank::Operator => Some('@'),
            Rank::HalfOp => Some('%'),
            Rank::Voiced => Some('+'),
            Rank::None => None,
        }
    }

    /// Minimum rank a requester must hold to grant or revoke `self`.
    ///
    /// Voice is managed by half-ops. Creator can never be granted because
    /// a channel has exactly one, assigned at creation.
    pub fn required_to_grant(self) -> Rank {
        match self {
            Rank::Voiced => Rank::HalfOp,
            other => other,
        }
    }

    /// Whether a requester holding `self` may change another member to
    /// or from `target_level`.
    pub fn can_grant(self, target_level: Rank) -> bool {
        target_level != Rank::Creator && self >= target_level.required_to_grant()
    }

    /// `~nick`, `@nick` or bare `nick`.
    pub fn decorate(self, nick: &str) -> String {
        match self.prefix() {
            Some(p) => format!("{p}{nick}"),
            None => nick.to_string(),
        }
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Rank::None => "none",
            Rank::Voiced => "voiced",
            Rank::HalfOp => "halfop",
            Rank::Operator => "operator",
            Rank::Admin => "admin",
            Rank::Creator => "creator",
        };
        f.write_str(name)
    }
}

/// ISUPPORT `PREFIX=(qaohv)~&@%+`.
pub fn isupport_prefix() -> String {
    let letters: String = Rank::DESCENDING.iter().filter_map(|r| r.mode_letter()).collect();
    let prefixes: String = Rank::DESCENDING.iter().filter_map(|r| r.prefix()).collect();
    format!("({letters}){prefixes}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_order() {
        assert!(Rank::None < Rank::Voiced);
        assert!(Rank::Voiced < Rank::HalfOp);
        assert!(Rank::HalfOp < Rank::Operator);
        assert!(Rank::Operator < Rank::Admin);
        assert!(Rank::Admin < Rank::Creator);
    }

    #[test]
    fn test_operator_passes_lower_checks() {
        let op = Rank::Operator;
        assert!(op >= Rank::HalfOp);
        assert!(op >= Rank::Voiced);
        assert!(op.can_grant(Rank::Voiced));
        assert!(op.can_grant(Rank::HalfOp));
        assert!(op.can_grant(Rank::Operator));
        assert!(!op.can_grant(Rank::Admin));
    }

    #[test]
    fn test_creator_is_never_grantable() {
        assert!(!Rank::Creator.can_grant(Rank::Creator));
        assert!(Rank::Creator.can_grant(Rank::Admin));
    }

    #[test]
    fn test_halfop_manages_voice_only() {
        assert!(Rank::HalfOp.can_grant(Rank::Voiced));
        assert!(Rank::HalfOp.can_grant(Rank::HalfOp));
        assert!(!Rank::HalfOp.can_grant(Rank::Operator));
        assert!(!Rank::Voiced.can_grant(Rank::Voiced));
        assert!(!Rank::None.can_grant(Rank::Voiced));
    }

    #[test]
    fn test_letters_round_trip() {
        for rank in Rank::DESCENDING {
            let letter = rank.mode_letter().unwrap();
            assert_eq!(Rank::from_mode_letter(letter), Some(rank));
        }
        assert_eq!(Rank::from_mode_letter('b'), None);
    }

    #[test]
    fn test_prefix_string() {
        assert_eq!(isupport_prefix(), "(qaohv)~&@%+");
        assert_eq!(Rank::Creator.decorate("bob"), "~bob");
        assert_eq!(Rank::None.decorate("bob"), "bob");
    }
}
