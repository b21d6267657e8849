//! Error types for the protocol crate.

use thiserror::Error;

/// Convenience alias for results carrying a [`ProtocolError`].
pub type Result<T, E = ProtocolError> = std::result::Result<T, E>;

/// Top-level protocol errors.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProtocolError {
    /// I/O error while reading or writing a stream.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// A line could not be parsed into a message.
    #[error("invalid message: {string}")]
    InvalidMessage {
        /// The offending line.
        string: String,
        /// Why it was rejected.
        #[source]
        cause: MessageParseError,
    },

    /// An outbound message exceeded the line limit.
    #[error("message too long: {actual} bytes (limit: {limit})")]
    MessageTooLong {
        /// Actual length in bytes.
        actual: usize,
        /// Configured limit.
        limit: usize,
    },
}

/// Reasons a line does not match the message grammar.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum MessageParseError {
    /// Nothing but whitespace and line terminators.
    #[error("empty message")]
    EmptyMessage,

    /// A `:` prefix marker with no prefix, or no command after it.
    #[error("invalid prefix: {0}")]
    InvalidPrefix(String),

    /// The command token is missing or is neither letters nor a 3-digit code.
    #[error("invalid command")]
    InvalidCommand,
}
