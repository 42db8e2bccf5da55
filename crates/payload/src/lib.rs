//! pushwire payload - Notification model and JSON payload builder
//!
//! This crate defines:
//! - `Notification`: alert, badge, sound and custom properties
//! - `PayloadBuilder`: ordered `aps` + custom property fields
//! - `Payload`: compact JSON serialization and parsing
//! - Character and byte-safe truncation helpers

mod builder;
mod notification;
mod truncate;

pub use builder::*;
pub use notification::*;
pub use truncate::*;
