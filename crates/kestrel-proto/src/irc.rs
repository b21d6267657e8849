//! Tokio codec for [`Message`] values.

use std::borrow::Borrow;

use bytes::BytesMut;
use tokio_util::codec::{Decoder, Encoder};

use crate::error;
use crate::line::LineCodec;
use crate::message::Message;
use crate::util::truncate_utf8_safe;

/// Frames lines with [`LineCodec`] and converts them to and from [`Message`].
///
/// Decoding never fails on bad input: a line that does not match the
/// grammar decodes to a message with an empty command.
#[derive(Default)]
pub struct IrcCodec {
    inner: LineCodec,
}

impl IrcCodec {
    /// Codec with the default 512-byte line limit.
    pub fn new() -> Self {
        Self::default()
    }

    /// Codec with a custom line limit.
    pub fn with_max_len(max_len: usize) -> Self {
        Self {
            inner: LineCodec::with_max_len(max_len),
        }
    }

    /// Render a message for the wire: cut at the first embedded line break
    /// and clip to `max_len` less the terminator.
    pub fn sanitize(msg: &Message, max_len: usize) -> String {
        let mut line = msg.to_string();
        if let Some(pos) = line.find(['\r', '\n']) {
            line.truncate(pos);
        }
        let keep = truncate_utf8_safe(&line, max_len.saturating_sub(2)).len();
        line.truncate(keep);
        line
    }
}

impl Decoder for IrcCodec {
    type Item = Message;
    type Error = error::ProtocolError;

    fn decode(&mut self, src: &mut BytesMut) -> error::Result<Option<Message>> {
        Ok(self.inner.decode(src)?.map(|line| Message::parse(&line)))
    }
}

impl<M> Encoder<M> for IrcCodec
where
    M: Borrow<Message>,
{
    type Error = error::ProtocolError;

    fn encode(&mut self, msg: M, dst: &mut BytesMut) -> error::Result<()> {
        let line = Self::sanitize(msg.borrow(), self.inner.max_len());
        self.inner.encode(line, dst)
    }
}
