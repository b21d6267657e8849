//! Core handler infrastructure: the handler trait, the per-command
//! context and the command registry.

mod context;
mod registry;

pub use context::{Context, Handler};
pub use registry::Registry;
