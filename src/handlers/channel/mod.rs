//! Channel membership and query handlers.

mod invite;
mod join;
mod names;
mod part;
mod topic;

pub use invite::InviteHandler;
pub use join::JoinHandler;
pub use names::{NamesHandler, send_names};
pub use part::PartHandler;
pub use topic::{TopicHandler, send_topic};
