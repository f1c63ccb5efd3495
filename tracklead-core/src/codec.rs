//! Tag/length framing shared by the detection ingest stream and the
//! microcontroller link.
//!
//! ```text
//! tag:     u8
//! len:     u16 (little-endian, length of `payload`)
//! payload: [u8] (bincode)
//! ```

use bytes::{Buf, BufMut, Bytes, BytesMut};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio_util::codec::{Decoder, Encoder};

use crate::error::TrackError;

/// Size of the `tag` + `len` prefix.
pub const FRAME_HEADER_LEN: usize = 3;

/// Largest payload a frame can carry.
pub const MAX_PAYLOAD_LEN: usize = u16::MAX as usize;

/// One tagged frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub tag: u8,
    pub payload: Bytes,
}

impl Frame {
    /// A frame with no payload.
    pub fn empty(tag: u8) -> Self {
        Self {
            tag,
            payload: Bytes::new(),
        }
    }

    /// Serialise `value` with bincode into a frame.
    pub fn encode<T: Serialize>(tag: u8, value: &T) -> Result<Self, TrackError> {
        let payload = bincode::serialize(value)?;
        if payload.len() > MAX_PAYLOAD_LEN {
            return Err(TrackError::FrameTooLarge {
                size: payload.len(),
                max: MAX_PAYLOAD_LEN,
            });
        }
        Ok(Self {
            tag,
            payload: Bytes::from(payload),
        })
    }

    /// Deserialise the payload.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, TrackError> {
        Ok(bincode::deserialize(&self.payload)?)
    }

    /// Header and payload as one contiguous buffer.
    pub fn to_bytes(&self) -> Result<Bytes, TrackError> {
        let mut buf = BytesMut::with_capacity(FRAME_HEADER_LEN + self.payload.len());
        FrameCodec.encode(self.clone(), &mut buf)?;
        Ok(buf.freeze())
    }
}

/// `tokio_util` codec for [`Frame`].
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameCodec;

impl Decoder for FrameCodec {
    type Item = Frame;
    type Error = TrackError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        if src.len() < FRAME_HEADER_LEN {
            return Ok(None);
        }

        let len = u16::from_le_bytes([src[1], src[2]]) as usize;
        if src.len() < FRAME_HEADER_LEN + len {
            src.reserve(FRAME_HEADER_LEN + len - src.len());
            return Ok(None);
        }

        let tag = src.get_u8();
        src.advance(2);
        let payload = src.split_to(len).freeze();
        Ok(Some(Frame { tag, payload }))
    }
}

impl Encoder<Frame> for FrameCodec {
    type Error = TrackError;

    fn encode(&mut self, item: Frame, dst: &mut BytesMut) -> Result<(), Self::Error> {
        if item.payload.len() > MAX_PAYLOAD_LEN {
            return Err(TrackError::FrameTooLarge {
                size: item.payload.len(),
                max: MAX_PAYLOAD_LEN,
            });
        }
        dst.reserve(FRAME_HEADER_LEN + item.payload.len());
        dst.put_u8(item.tag);
        dst.put_u16_le(item.payload.len() as u16);
        dst.extend_from_slice(&item.payload);
        Ok(())
    }
}
