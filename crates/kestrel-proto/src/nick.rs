//! Nickname validation.

/// Longest nickname accepted.
pub const NICK_MAX_LEN: usize = 30;

/// `[ ] \ ` ^ _ { | }`
#[inline]
fn is_special(c: char) -> bool {
    matches!(c, '[' | ']' | '\\' | '`' | '_' | '^' | '{' | '|' | '}')
}

/// Extension trait for nickname checks.
pub trait NickExt {
    /// A letter or special character first, then letters, digits,
    /// specials or `-`, at most [`NICK_MAX_LEN`] characters.
    ///
    /// ```
    /// use kestrel_proto::NickExt;
    ///
    /// assert!("bob".is_valid_nick());
    /// assert!("[away]".is_valid_nick());
    /// assert!(!"9lives".is_valid_nick());
    /// assert!(!"*!*@host".is_valid_nick());
    /// ```
    fn is_valid_nick(&self) -> bool;
}

impl NickExt for str {
    fn is_valid_nick(&self) -> bool {
        let mut chars = self.chars();
        let Some(first) = chars.next() else {
            return false;
        };

        self.len() <= NICK_MAX_LEN
            && (first.is_ascii_alphabetic() || is_special(first))
            && chars.all(|c| c.is_ascii_alphanumeric() || is_special(c) || c == '-')
    }
}
