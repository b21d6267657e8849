//! Network module.
//!
//! Contains the Gateway (TCP listeners) and the per-client Connection
//! session.

mod connection;
mod gateway;

pub use connection::Connection;
pub use gateway::Gateway;
