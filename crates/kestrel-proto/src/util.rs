//! String helpers shared by the codec and the daemon.

/// Truncate to at most `max_bytes` without splitting a UTF-8 codepoint.
///
/// ```
/// use kestrel_proto::util::truncate_utf8_safe;
///
/// assert_eq!(truncate_utf8_safe("hello world", 5), "hello");
/// assert_eq!(truncate_utf8_safe("café", 4), "caf");
/// ```
#[inline]
pub fn truncate_utf8_safe(s: &str, max_bytes: usize) -> &str {
    if s.len() <= max_bytes {
        return s;
    }

    let mut end = max_bytes;
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }

    &s[..end]
}

/// Glob match with `*` (any run) and `?` (one char), ASCII case-insensitive.
///
/// Iterative two-pointer scan: on mismatch it rewinds to the most recent
/// `*` and lets it absorb one more character, so adversarial masks cost
/// O(pattern × text) time and constant stack.
///
/// ```
/// use kestrel_proto::util::wildcard_match;
///
/// assert!(wildcard_match("*!*@spammer.com", "eve!e@SPAMMER.com"));
/// assert!(wildcard_match("te?t", "test"));
/// assert!(!wildcard_match("*!admin@*", "nick!user@host"));
/// ```
pub fn wildcard_match(pattern: &str, text: &str) -> bool {
    let pattern: Vec<char> = pattern.chars().map(|c| c.to_ascii_lowercase()).collect();
    let text: Vec<char> = text.chars().map(|c| c.to_ascii_lowercase()).collect();

    let (mut p, mut t) = (0, 0);
    let mut star: Option<usize> = None;
    let mut resume = 0;

    while t < text.len() {
        match pattern.get(p) {
            Some('*') => {
                star = Some(p);
                resume = t;
                p += 1;
            }
            Some(&c) if c == '?' || c == text[t] => {
                p += 1;
                t += 1;
            }
            _ => match star {
                Some(sp) => {
                    p = sp + 1;
                    resume += 1;
                    t = resume;
                }
                None => return false,
            },
        }
    }

    pattern[p..].iter().all(|&c| c == '*')
}

/// Match a `nick!user@host` string against a ban-style mask.
#[inline]
pub fn matches_hostmask(mask: &str, hostmask: &str) -> bool {
    wildcard_match(mask, hostmask)
}

/// Expand a partial mask to full `nick!user@host` form.
///
/// ```
/// use kestrel_proto::util::normalize_mask;
///
/// assert_eq!(normalize_mask("bob"), "bob!*@*");
/// assert_eq!(normalize_mask("*@spam.net"), "*!*@spam.net");
/// assert_eq!(normalize_mask("bob!b"), "bob!b@*");
/// assert_eq!(normalize_mask("*!*@host"), "*!*@host");
/// ```
pub fn normalize_mask(mask: &str) -> String {
    match (mask.find('!'), mask.find('@')) {
        (Some(_), Some(_)) => mask.to_string(),
        (Some(_), None) => format!("{}@*", mask),
        (None, Some(_)) => format!("*!{}", mask),
        (None, None) => format!("{}!*@*", mask),
    }
}
