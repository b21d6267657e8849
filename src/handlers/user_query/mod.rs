//! User query handlers: WHOIS, USERHOST
//!
//! RFC 2812 §3.6 - User based queries

mod whois;

pub use whois::{UserhostHandler, WhoisHandler};
