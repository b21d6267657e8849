//! Numeric reply formatter.
//!
//! Every numeric has the shape `:<host> <code> <target> [args...] :<text>`.

use crate::message::Message;

use super::Response;

/// Builder for one numeric reply.
///
/// ```
/// use kestrel_proto::{Numeric, Response};
///
/// let msg = Numeric::new("irc.test", Response::RPL_NOTOPIC, "bob")
///     .arg("#test")
///     .text("No topic is set")
///     .into_message();
/// assert_eq!(msg.to_string(), ":irc.test 331 bob #test :No topic is set");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
#[must_use = "a numeric does nothing until converted into a message"]
pub struct Numeric {
    host: String,
    code: Response,
    target: String,
    args: Vec<String>,
    text: Option<String>,
}

impl Numeric {
    /// Start a reply from `host` to `target`. An empty target becomes `*`.
    pub fn new(host: impl Into<String>, code: Response, target: impl Into<String>) -> Self {
        let target = target.into();
        Self {
            host: host.into(),
            code,
            target: if target.is_empty() { "*".to_string() } else { target },
            args: Vec::new(),
            text: None,
        }
    }

    /// Append one middle parameter.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append several middle parameters.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Set the human-readable trailing text.
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// The reply code.
    pub fn code(&self) -> Response {
        self.code
    }

    /// Render through the message type.
    pub fn into_message(self) -> Message {
        let mut params = Vec::with_capacity(self.args.len() + 2);
        params.push(self.target);
        params.extend(self.args);
        params.extend(self.text);

        Message {
            prefix: Some(self.host),
            command: self.code.to_string(),
            params,
        }
    }
}

impl From<Numeric> for Message {
    fn from(numeric: Numeric) -> Self {
        numeric.into_message()
    }
}

impl Response {
    /// Shorthand for [`Numeric::new`].
    pub fn reply(self, host: impl Into<String>, target: impl Into<String>) -> Numeric {
        Numeric::new(host, self, target)
    }
}
