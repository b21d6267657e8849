//! Channel name validation.

/// Sigils that open a channel name.
pub const CHANNEL_PREFIXES: &str = "#&+!";

/// Longest channel name accepted, sigil included.
pub const CHANNEL_MAX_LEN: usize = 50;

/// Extension trait for channel-name checks.
pub trait ChannelExt {
    /// Starts with one of `#&+!`, is at most 50 characters, and contains
    /// no space, comma, colon, BEL, NUL, CR or LF.
    ///
    /// ```
    /// use kestrel_proto::ChannelExt;
    ///
    /// assert!("#rust".is_channel_name());
    /// assert!(!"rust".is_channel_name());
    /// assert!(!"#a,b".is_channel_name());
    /// ```
    fn is_channel_name(&self) -> bool;
}

impl ChannelExt for str {
    fn is_channel_name(&self) -> bool {
        let mut chars = self.chars();
        let Some(first) = chars.next() else {
            return false;
        };

        CHANNEL_PREFIXES.contains(first)
            && self.chars().count() <= CHANNEL_MAX_LEN
            && chars.all(|c| !matches!(c, ' ' | ',' | ':' | '\x07' | '\0' | '\r' | '\n'))
    }
}
