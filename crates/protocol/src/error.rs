//! Encoder errors

use thiserror::Error;

use crate::frame::Frame;
use pushwire_payload::PayloadError;

#[derive(Error, Debug)]
pub enum EncodeError {
    /// The frame does not fit even after truncating the alert. The attempted
    /// frame is kept for diagnostics and must never be sent.
    #[error("Message size exceeded: {size} bytes (max: {limit})")]
    ExceededMessageSize {
        size: usize,
        limit: usize,
        frame: Frame,
    },

    #[error("Invalid device token: {0}")]
    InvalidDeviceToken(String),

    #[error("Payload too large for the length field: {size} bytes (max: {max})")]
    PayloadTooLarge { size: usize, max: usize },

    #[error("Invalid encoder config: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Payload(#[from] PayloadError),
}

impl EncodeError {
    /// The rejected frame, if this is a size failure
    pub fn frame(&self) -> Option<&Frame> {
        match self {
            EncodeError::ExceededMessageSize { frame, .. } => Some(frame),
            _ => None,
        }
    }
}
