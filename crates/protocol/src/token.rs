//! Device token parsing

use std::fmt;
use std::str::FromStr;

use crate::error::EncodeError;

/// Decoded device token length in bytes
pub const DEVICE_TOKEN_LEN: usize = 32;

/// Raw device identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DeviceToken([u8; DEVICE_TOKEN_LEN]);

impl DeviceToken {
    pub fn from_bytes(bytes: [u8; DEVICE_TOKEN_LEN]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; DEVICE_TOKEN_LEN] {
        &self.0
    }
}

/// Strip `<`, `>` and whitespace as printed by some device APIs
pub fn normalize_device_token(raw: &str) -> String {
    raw.chars()
        .filter(|c| *c != '<' && *c != '>' && !c.is_whitespace())
        .collect()
}

impl FromStr for DeviceToken {
    type Err = EncodeError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let normalized = normalize_device_token(raw);
        let mut bytes = [0u8; DEVICE_TOKEN_LEN];

        hex::decode_to_slice(&normalized, &mut bytes).map_err(|e| {
            EncodeError::InvalidDeviceToken(format!("{} ({} hex digits)", e, normalized.len()))
        })?;

        Ok(Self(bytes))
    }
}

impl fmt::Display for DeviceToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}
