/// An owned IRC message.
///
/// `params` holds the middle parameters followed by the trailing one, if
/// any; the wire form decides which parameter needs the `:` marker, so
/// the struct does not record it.
///
/// # Example
///
/// ```
/// use kestrel_proto::Message;
///
/// let msg: Message = ":alice!a@h PRIVMSG #chan :hello there".parse().unwrap();
/// assert_eq!(msg.prefix.as_deref(), Some("alice!a@h"));
/// assert_eq!(msg.params, vec!["#chan", "hello there"]);
///
/// let reply = Message::privmsg("#chan", "hi").with_prefix("bob!b@h");
/// assert_eq!(reply.to_string(), ":bob!b@h PRIVMSG #chan hi");
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Message {
    /// Message source (`server` or `nick!user@host`).
    pub prefix: Option<String>,
    /// Command name or three-digit numeric, stored as received.
    pub command: String,
    /// Ordered parameters; the last one may contain spaces.
    pub params: Vec<String>,
}

impl Message {
    /// Create a message without a prefix.
    pub fn new<C>(command: C, params: Vec<String>) -> Self
    where
        C: Into<String>,
    {
        Self {
            prefix: None,
            command: command.into(),
            params,
        }
    }

    /// Parse a line, yielding a message with an empty command when the
    /// line does not match the grammar.
    ///
    /// ```
    /// use kestrel_proto::Message;
    ///
    /// assert!(Message::parse(":only-a-prefix").is_noop());
    /// assert_eq!(Message::parse("PING x").command, "PING");
    /// ```
    pub fn parse(line: &str) -> Self {
        line.parse().unwrap_or_default()
    }

    /// Set the prefix.
    #[must_use]
    pub fn with_prefix<P>(mut self, prefix: P) -> Self
    where
        P: Into<String>,
    {
        self.prefix = Some(prefix.into());
        self
    }

    /// True for the placeholder produced by a failed parse.
    pub fn is_noop(&self) -> bool {
        self.command.is_empty()
    }

    /// Case-insensitive command comparison.
    pub fn is_command(&self, name: &str) -> bool {
        self.command.eq_ignore_ascii_case(name)
    }

    /// Parameter at `index`, if present.
    pub fn param(&self, index: usize) -> Option<&str> {
        self.params.get(index).map(String::as_str)
    }

    /// The last parameter, if any.
    pub fn last_param(&self) -> Option<&str> {
        self.params.last().map(String::as_str)
    }

    /// Nickname portion of a `nick!user@host` prefix.
    pub fn source_nickname(&self) -> Option<&str> {
        self.prefix
            .as_deref()
            .map(|p| p.split(['!', '@']).next().unwrap_or(p))
    }

    /// `PRIVMSG <target> :<text>`
    #[must_use]
    pub fn privmsg<T, M>(target: T, text: M) -> Self
    where
        T: Into<String>,
        M: Into<String>,
    {
        Self::new("PRIVMSG", vec![target.into(), text.into()])
    }

    /// `NOTICE <target> :<text>`
    #[must_use]
    pub fn notice<T, M>(target: T, text: M) -> Self
    where
        T: Into<String>,
        M: Into<String>,
    {
        Self::new("NOTICE", vec![target.into(), text.into()])
    }

    /// `PING <token>`
    #[must_use]
    pub fn ping<S>(token: S) -> Self
    where
        S: Into<String>,
    {
        Self::new("PING", vec![token.into()])
    }

    /// `PONG <server> :<token>`
    #[must_use]
    pub fn pong<S, T>(server: S, token: T) -> Self
    where
        S: Into<String>,
        T: Into<String>,
    {
        Self::new("PONG", vec![server.into(), token.into()])
    }

    /// `JOIN <channel>`
    #[must_use]
    pub fn join<C>(channel: C) -> Self
    where
        C: Into<String>,
    {
        Self::new("JOIN", vec![channel.into()])
    }

    /// `PART <channel> [:<reason>]`
    #[must_use]
    pub fn part<C>(channel: C, reason: Option<&str>) -> Self
    where
        C: Into<String>,
    {
        let mut params = vec![channel.into()];
        if let Some(reason) = reason {
            params.push(reason.to_string());
        }
        Self::new("PART", params)
    }

    /// `NICK <nickname>`
    #[must_use]
    pub fn nick<N>(nickname: N) -> Self
    where
        N: Into<String>,
    {
        Self::new("NICK", vec![nickname.into()])
    }

    /// `ERROR :<text>`
    #[must_use]
    pub fn error<M>(text: M) -> Self
    where
        M: Into<String>,
    {
        Self::new("ERROR", vec![text.into()])
    }
}
