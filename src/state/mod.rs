//! State management module.
//!
//! Contains the Matrix (server registry) and the entities it owns.

mod channel;
mod lifecycle;
mod matrix;
mod rank;
mod uid;
mod user;

pub use channel::{
    Channel, ModeChange, ModeRejection, flag_rank, is_list_letter, parse_mode_letters,
    render_changes,
};
pub use matrix::{Matrix, NickInUse, Tables, channel_key};
pub use rank::Rank;
pub use uid::Uid;
pub use user::UserModes;

#[cfg(test)]
pub(crate) use matrix::tests::test_matrix;
