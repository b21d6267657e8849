//! Unified error handling for kestreld.
//!
//! Handler errors abort the current command; channel errors carry the one
//! numeric the requester should see.

use kestrel_proto::{Message, Response};
use thiserror::Error;

// ============================================================================
// Handler Errors (command processing)
// ============================================================================

/// Errors that can occur during command handling.
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("not enough parameters")]
    NeedMoreParams,

    #[error("not registered")]
    NotRegistered,

    #[error("client quit: {0:?}")]
    Quit(Option<String>),
}

impl HandlerError {
    /// Get a static error code string for log fields.
    #[inline]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NeedMoreParams => "need_more_params",
            Self::NotRegistered => "not_registered",
            Self::Quit(_) => "quit",
        }
    }

    /// Convert to an IRC error reply message.
    ///
    /// Returns `None` for errors that don't warrant a client-visible reply.
    pub fn to_irc_reply(&self, server_name: &str, nick: &str, cmd_name: &str) -> Option<Message> {
        let reply = match self {
            Self::NeedMoreParams => Response::ERR_NEEDMOREPARAMS
                .reply(server_name, nick)
                .arg(cmd_name)
                .text("Not enough parameters"),
            Self::NotRegistered => Response::ERR_NOTREGISTERED
                .reply(server_name, nick)
                .arg(cmd_name)
                .text("You have not registered"),
            Self::Quit(_) => return None,
        };
        Some(reply.into_message())
    }
}

/// Result type for command handlers.
pub type HandlerResult = Result<(), HandlerError>;

// ============================================================================
// Channel Errors
// ============================================================================

/// Channel operation errors, each mapping to exactly one numeric.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChannelError {
    #[error("cannot join channel (+k)")]
    BadKey,

    #[error("cannot join channel (+i)")]
    InviteOnly,

    #[error("cannot join channel (+l)")]
    ChannelFull,

    #[error("cannot join channel (+b)")]
    Banned,

    #[error("no such channel")]
    NoSuchChannel,

    #[error("{0} is already on channel")]
    AlreadyOnChannel(String),
}

impl ChannelError {
    /// Convert to an IRC error reply message.
    pub fn to_irc_reply(&self, server_name: &str, nick: &str, channel: &str) -> Message {
        let reply = match self {
            Self::BadKey => Response::ERR_BADCHANNELKEY
                .reply(server_name, nick)
                .arg(channel)
                .text("Cannot join channel (+k)"),
            Self::InviteOnly => Response::ERR_INVITEONLYCHAN
                .reply(server_name, nick)
                .arg(channel)
                .text("Cannot join channel (+i)"),
            Self::ChannelFull => Response::ERR_CHANNELISFULL
                .reply(server_name, nick)
                .arg(channel)
                .text("Cannot join channel (+l)"),
            Self::Banned => Response::ERR_BANNEDFROMCHAN
                .reply(server_name, nick)
                .arg(channel)
                .text("Cannot join channel (+b)"),
            Self::NoSuchChannel => Response::ERR_NOSUCHCHANNEL
                .reply(server_name, nick)
                .arg(channel)
                .text("No such channel"),
            Self::AlreadyOnChannel(target) => Response::ERR_USERONCHANNEL
                .reply(server_name, nick)
                .args([target.as_str(), channel])
                .text("is already on channel"),
        };
        reply.into_message()
    }
}
