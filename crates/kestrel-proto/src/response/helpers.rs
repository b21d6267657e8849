//! Code conversion and display for [`Response`].

use std::fmt;
use std::str::FromStr;

use super::Response;

/// Every variant, used for reverse lookup.
const ALL: &[Response] = &[
    Response::RPL_WELCOME,
    Response::RPL_YOURHOST,
    Response::RPL_CREATED,
    Response::RPL_MYINFO,
    Response::RPL_ISUPPORT,
    Response::RPL_UMODEIS,
    Response::RPL_USERHOST,
    Response::RPL_WHOISUSER,
    Response::RPL_WHOISSERVER,
    Response::RPL_WHOISOPERATOR,
    Response::RPL_WHOISIDLE,
    Response::RPL_ENDOFWHOIS,
    Response::RPL_WHOISCHANNELS,
    Response::RPL_CHANNELMODEIS,
    Response::RPL_NOTOPIC,
    Response::RPL_TOPIC,
    Response::RPL_INVITING,
    Response::RPL_INVITELIST,
    Response::RPL_ENDOFINVITELIST,
    Response::RPL_EXCEPTLIST,
    Response::RPL_ENDOFEXCEPTLIST,
    Response::RPL_NAMREPLY,
    Response::RPL_ENDOFNAMES,
    Response::RPL_BANLIST,
    Response::RPL_ENDOFBANLIST,
    Response::RPL_MOTD,
    Response::RPL_MOTDSTART,
    Response::RPL_ENDOFMOTD,
    Response::ERR_NOSUCHNICK,
    Response::ERR_NOSUCHCHANNEL,
    Response::ERR_CANNOTSENDTOCHAN,
    Response::ERR_UNKNOWNCOMMAND,
    Response::ERR_NOMOTD,
    Response::ERR_NONICKNAMEGIVEN,
    Response::ERR_ERRONEOUSNICKNAME,
    Response::ERR_NICKNAMEINUSE,
    Response::ERR_USERNOTINCHANNEL,
    Response::ERR_NOTONCHANNEL,
    Response::ERR_USERONCHANNEL,
    Response::ERR_NOTREGISTERED,
    Response::ERR_NEEDMOREPARAMS,
    Response::ERR_ALREADYREGISTERED,
    Response::ERR_CHANNELISFULL,
    Response::ERR_UNKNOWNMODE,
    Response::ERR_INVITEONLYCHAN,
    Response::ERR_BANNEDFROMCHAN,
    Response::ERR_BADCHANNELKEY,
    Response::ERR_CHANOPRIVSNEEDED,
    Response::ERR_USERSDONTMATCH,
];

impl Response {
    /// The numeric value.
    #[inline]
    pub fn code(&self) -> u16 {
        *self as u16
    }

    /// Reverse lookup of a numeric value.
    pub fn from_code(code: u16) -> Option<Response> {
        ALL.iter().copied().find(|r| r.code() == code)
    }

    /// 400-599 are errors.
    #[inline]
    pub fn is_error(&self) -> bool {
        (400..600).contains(&self.code())
    }
}

impl fmt::Display for Response {
    /// Zero-padded three-digit form, as sent on the wire.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:03}", self.code())
    }
}

/// Error from parsing a numeric string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown numeric: {0}")]
pub struct ParseResponseError(
    /// The rejected input.
    pub String,
);

impl FromStr for Response {
    type Err = ParseResponseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<u16>()
            .ok()
            .filter(|_| s.len() == 3)
            .and_then(Response::from_code)
            .ok_or_else(|| ParseResponseError(s.to_string()))
    }
}
