//! Frame - the binary unit delivered to the gateway
//!
//! Layout (all lengths big-endian u16):
//!
//! ```text
//! [0]       command (0)
//! [1..3]    device token length (32)
//! [3..35]   device token bytes
//! [35..37]  payload length
//! [37..]    payload (compact JSON)
//! ```
//!
//! For every frame within the ceiling the high length bytes are 0, which is
//! why they are often described as fixed marker bytes.

use bytes::{BufMut, Bytes, BytesMut};
use thiserror::Error;

use crate::error::EncodeError;
use crate::token::{DEVICE_TOKEN_LEN, DeviceToken};

/// Simple notification command
pub const COMMAND: u8 = 0;

/// Bytes before the payload: command + token length + token + payload length
pub const HEADER_LEN: usize = 1 + 2 + DEVICE_TOKEN_LEN + 2;

/// Hard frame size limit enforced by the gateway
pub const MAX_FRAME_SIZE: usize = 256;

/// Errors from [`Frame::parse`]
#[derive(Error, Debug, PartialEq, Eq)]
pub enum FrameError {
    #[error("Frame too short: {0} bytes")]
    Truncated(usize),

    #[error("Unknown command byte: {0}")]
    UnknownCommand(u8),

    #[error("Unexpected device token length: {0}")]
    TokenLength(u16),

    #[error("Payload length mismatch: header says {declared}, frame carries {actual}")]
    PayloadLength { declared: usize, actual: usize },
}

/// An assembled frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    bytes: Bytes,
}

impl Frame {
    /// Assemble a frame from a decoded token and serialized payload
    ///
    /// The result may exceed [`MAX_FRAME_SIZE`]; size policy belongs to the
    /// encoder. Payloads that cannot be described by the length field fail.
    pub fn assemble(token: &DeviceToken, payload: &[u8]) -> Result<Self, EncodeError> {
        let payload_len = u16::try_from(payload.len()).map_err(|_| EncodeError::PayloadTooLarge {
            size: payload.len(),
            max: u16::MAX as usize,
        })?;

        let mut buf = BytesMut::with_capacity(HEADER_LEN + payload.len());
        buf.put_u8(COMMAND);
        buf.put_u16(DEVICE_TOKEN_LEN as u16);
        buf.put_slice(token.as_bytes());
        buf.put_u16(payload_len);
        buf.put_slice(payload);

        Ok(Self {
            bytes: buf.freeze(),
        })
    }

    /// Check and wrap raw frame bytes
    pub fn parse(bytes: impl Into<Bytes>) -> Result<Self, FrameError> {
        let bytes = bytes.into();

        if bytes.len() < HEADER_LEN {
            return Err(FrameError::Truncated(bytes.len()));
        }

        if bytes[0] != COMMAND {
            return Err(FrameError::UnknownCommand(bytes[0]));
        }

        let token_len = u16::from_be_bytes([bytes[1], bytes[2]]);
        if token_len as usize != DEVICE_TOKEN_LEN {
            return Err(FrameError::TokenLength(token_len));
        }

        let declared = u16::from_be_bytes([bytes[HEADER_LEN - 2], bytes[HEADER_LEN - 1]]) as usize;
        let actual = bytes.len() - HEADER_LEN;
        if declared != actual {
            return Err(FrameError::PayloadLength { declared, actual });
        }

        Ok(Self { bytes })
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn command(&self) -> u8 {
        self.bytes[0]
    }

    pub fn device_token(&self) -> &[u8] {
        &self.bytes[3..3 + DEVICE_TOKEN_LEN]
    }

    pub fn payload(&self) -> &[u8] {
        &self.bytes[HEADER_LEN..]
    }

    /// Whether the frame is within the protocol ceiling, [`MAX_FRAME_SIZE`]
    ///
    /// A stricter configured limit is checked with [`Frame::fits_within`].
    pub fn fits(&self) -> bool {
        self.fits_within(MAX_FRAME_SIZE)
    }

    /// Whether the frame is within `limit` bytes
    pub fn fits_within(&self, limit: usize) -> bool {
        self.len() <= limit
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Bytes {
        self.bytes
    }
}

impl AsRef<[u8]> for Frame {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}
