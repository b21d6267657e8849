//! Helper functions for IRC command handlers.
//!
//! Common error replies and target parsing shared across handlers.

use kestrel_proto::{Message, Response};

// ============================================================================
// Common reply helpers
// ============================================================================

/// Create ERR_NOSUCHNICK reply (401) - no such nick/channel.
pub fn err_nosuchnick(server_name: &str, nick: &str, target: &str) -> Message {
    Response::ERR_NOSUCHNICK
        .reply(server_name, nick)
        .arg(target)
        .text("No such nick/channel")
        .into_message()
}

/// Create ERR_NOSUCHCHANNEL reply (403) - no such channel.
pub fn err_nosuchchannel(server_name: &str, nick: &str, channel: &str) -> Message {
    Response::ERR_NOSUCHCHANNEL
        .reply(server_name, nick)
        .arg(channel)
        .text("No such channel")
        .into_message()
}

/// Create ERR_NOTONCHANNEL reply (442) - you're not on that channel.
pub fn err_notonchannel(server_name: &str, nick: &str, channel: &str) -> Message {
    Response::ERR_NOTONCHANNEL
        .reply(server_name, nick)
        .arg(channel)
        .text("You're not on that channel")
        .into_message()
}

/// Create ERR_CHANOPRIVSNEEDED reply (482) - you're not channel operator.
pub fn err_chanoprivsneeded(server_name: &str, nick: &str, channel: &str) -> Message {
    Response::ERR_CHANOPRIVSNEEDED
        .reply(server_name, nick)
        .arg(channel)
        .text("You're not channel operator")
        .into_message()
}

/// Create ERR_USERNOTINCHANNEL reply (441) - they aren't on that channel.
pub fn err_usernotinchannel(server_name: &str, nick: &str, target: &str, channel: &str) -> Message {
    Response::ERR_USERNOTINCHANNEL
        .reply(server_name, nick)
        .args([target, channel])
        .text("They aren't on that channel")
        .into_message()
}

/// Create ERR_CANNOTSENDTOCHAN reply (404).
pub fn err_cannotsendtochan(server_name: &str, nick: &str, channel: &str) -> Message {
    Response::ERR_CANNOTSENDTOCHAN
        .reply(server_name, nick)
        .arg(channel)
        .text("Cannot send to channel")
        .into_message()
}

// ============================================================================
// Target parsing
// ============================================================================

/// Split a comma-separated target list, dropping empty entries.
pub fn split_targets(list: &str) -> impl Iterator<Item = &str> {
    list.split(',').filter(|t| !t.is_empty())
}
