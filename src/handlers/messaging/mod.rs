//! Messaging command handlers (PRIVMSG, NOTICE).
//!
//! Both commands share one routing path; they differ only in whether a
//! failed delivery is reported back to the sender.

mod notice;
mod privmsg;
mod routing;

pub use notice::NoticeHandler;
pub use privmsg::PrivmsgHandler;
