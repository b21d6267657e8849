//! IRC command handlers.
//!
//! This module contains the Handler trait and command registry for dispatching
//! incoming IRC messages to appropriate handlers.

mod cap;
mod channel;
mod connection;
mod core;
mod helpers;
mod messaging;
mod mode;
mod user_query;

#[cfg(test)]
mod test_support;

pub use core::{Context, Handler, Registry};
pub use helpers::{
    err_cannotsendtochan, err_chanoprivsneeded, err_nosuchchannel, err_nosuchnick,
    err_notonchannel, err_usernotinchannel, split_targets,
};
