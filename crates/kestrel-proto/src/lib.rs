//! # kestrel-proto
//!
//! Wire-level building blocks for the Kestrel IRC daemon: the message
//! grammar, a tokio codec, numeric replies, and the name and mask rules
//! the server enforces.
//!
//! ```rust
//! use kestrel_proto::{Message, Response};
//!
//! let msg: Message = "NICK bob".parse().unwrap();
//! assert!(msg.is_command("nick"));
//!
//! let reply = Response::ERR_NICKNAMEINUSE
//!     .reply("irc.test", "*")
//!     .arg("bob")
//!     .text("Nickname is already in use")
//!     .into_message();
//! assert_eq!(reply.to_string(), ":irc.test 433 * bob :Nickname is already in use");
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod chan;
pub mod error;
#[cfg(feature = "tokio")]
pub mod irc;
#[cfg(feature = "tokio")]
pub mod line;
pub mod message;
pub mod nick;
pub mod response;
pub mod util;

pub use self::chan::ChannelExt;
pub use self::error::{MessageParseError, ProtocolError};
#[cfg(feature = "tokio")]
pub use self::irc::IrcCodec;
#[cfg(feature = "tokio")]
pub use self::line::LineCodec;
pub use self::message::Message;
pub use self::nick::NickExt;
pub use self::response::{Numeric, Response};
pub use self::util::{matches_hostmask, normalize_mask, wildcard_match};
