//! pushwire protocol - Binary frame encoding for the push gateway
//!
//! This crate defines:
//! - `Frame`: command byte, device token and payload with length prefixes
//! - `DeviceToken`: 32-byte device identifier parsed from hex text
//! - `FrameEncoder`: fits a notification into the 256-byte ceiling,
//!   truncating the alert when needed
//!
//! Encoding is pure and synchronous; an encoder can be shared freely
//! between threads.

mod encoder;
mod error;
mod frame;
mod token;

pub use encoder::*;
pub use error::*;
pub use frame::*;
pub use token::*;

pub use pushwire_payload::{Notification, Payload, PayloadBuilder, Sound};
