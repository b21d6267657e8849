//! The IRC message type and its wire grammar.

mod parse;
mod serialize;
mod types;

pub use types::Message;
