//! WHOIS family handlers: WHOIS, USERHOST.

mod userhost;
mod whois_cmd;

pub use userhost::UserhostHandler;
pub use whois_cmd::WhoisHandler;
