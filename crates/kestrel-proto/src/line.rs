//! Newline-delimited framing for tokio.

use bytes::{BufMut, BytesMut};
use tokio_util::codec::{Decoder, Encoder};

use crate::error;

/// Default line limit in bytes, terminator included.
pub const DEFAULT_MAX_LINE: usize = 512;

/// Codec that frames newline-terminated lines.
///
/// Inbound lines longer than `max_len` are dropped up to the next newline
/// rather than failing the stream. Bytes that are not valid UTF-8 are
/// replaced. Only I/O failures surface as errors.
pub struct LineCodec {
    /// Index of next byte to check for newline
    next_index: usize,
    max_len: usize,
    /// Set while skipping the remainder of an overlong line.
    discarding: bool,
}

impl LineCodec {
    /// Codec with the default 512-byte limit.
    pub fn new() -> Self {
        Self::with_max_len(DEFAULT_MAX_LINE)
    }

    /// Codec with a custom limit.
    pub fn with_max_len(max_len: usize) -> Self {
        Self {
            next_index: 0,
            max_len,
            discarding: false,
        }
    }

    /// The configured limit.
    pub fn max_len(&self) -> usize {
        self.max_len
    }
}

impl Default for LineCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl Decoder for LineCodec {
    type Item = String;
    type Error = error::ProtocolError;

    fn decode(&mut self, src: &mut BytesMut) -> error::Result<Option<String>> {
        loop {
            let newline = src[self.next_index..].iter().position(|b| *b == b'\n');

            match (self.discarding, newline) {
                (true, Some(offset)) => {
                    let dropped = src.split_to(self.next_index + offset + 1);
                    self.next_index = 0;
                    self.discarding = false;
                    #[cfg(feature = "tracing")]
                    tracing::warn!(bytes = dropped.len(), "Discarded overlong line tail");
                    #[cfg(not(feature = "tracing"))]
                    let _ = dropped;
                }
                (true, None) => {
                    src.clear();
                    self.next_index = 0;
                    return Ok(None);
                }
                (false, Some(offset)) => {
                    let line = src.split_to(self.next_index + offset + 1);
                    self.next_index = 0;

                    if line.len() > self.max_len {
                        #[cfg(feature = "tracing")]
                        tracing::warn!(
                            actual = line.len(),
                            limit = self.max_len,
                            "Dropped overlong line"
                        );
                        continue;
                    }

                    let text = String::from_utf8_lossy(&line)
                        .trim_end_matches(['\r', '\n'])
                        .to_string();
                    return Ok(Some(text));
                }
                (false, None) => {
                    if src.len() > self.max_len {
                        // Keep skipping until the terminator shows up.
                        src.clear();
                        self.next_index = 0;
                        self.discarding = true;
                        return Ok(None);
                    }
                    self.next_index = src.len();
                    return Ok(None);
                }
            }
        }
    }
}

impl Encoder<String> for LineCodec {
    type Error = error::ProtocolError;

    fn encode(&mut self, line: String, dst: &mut BytesMut) -> error::Result<()> {
        // Two bytes are reserved for CRLF.
        if line.len() + 2 > self.max_len {
            return Err(error::ProtocolError::MessageTooLong {
                actual: line.len() + 2,
                limit: self.max_len,
            });
        }

        dst.reserve(line.len() + 2);
        dst.put_slice(line.as_bytes());
        dst.put_slice(b"\r\n");
        Ok(())
    }
}
