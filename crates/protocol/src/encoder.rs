//! FrameEncoder - notification to size-limited frame

use pushwire_payload::{
    DEFAULT_SOUND, ELLIPSIS, Notification, Payload, PayloadBuilder, truncate_escaped,
};
use serde::Deserialize;
use tracing::{debug, trace, warn};

use crate::error::EncodeError;
use crate::frame::{Frame, HEADER_LEN, MAX_FRAME_SIZE};
use crate::token::DeviceToken;

/// Smallest frame that can carry a payload: header + `{"aps":{}}`
pub const MIN_FRAME_SIZE: usize = HEADER_LEN + 10;

/// Encoder configuration
#[derive(Debug, Clone, Deserialize)]
pub struct EncoderConfig {
    /// Frame ceiling in bytes, at most the protocol limit
    #[serde(default = "default_max_frame_size")]
    pub max_frame_size: usize,

    /// File name sent for the boolean sound flag
    #[serde(default = "default_sound")]
    pub default_sound: String,
}

fn default_max_frame_size() -> usize {
    MAX_FRAME_SIZE
}

fn default_sound() -> String {
    DEFAULT_SOUND.to_string()
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            max_frame_size: default_max_frame_size(),
            default_sound: default_sound(),
        }
    }
}

impl EncoderConfig {
    pub fn validate(&self) -> Result<(), EncodeError> {
        if !(MIN_FRAME_SIZE..=MAX_FRAME_SIZE).contains(&self.max_frame_size) {
            return Err(EncodeError::InvalidConfig(format!(
                "max_frame_size must be within {}..={}, got {}",
                MIN_FRAME_SIZE, MAX_FRAME_SIZE, self.max_frame_size
            )));
        }

        if self.default_sound.is_empty() {
            return Err(EncodeError::InvalidConfig(
                "default_sound must not be empty".to_string(),
            ));
        }

        Ok(())
    }
}

/// Result of a successful encode
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodeOutcome {
    pub frame: Frame,

    /// The alert had to be shortened to fit
    pub truncated: bool,
}

/// Stateless encoder, safe to share across threads
#[derive(Debug, Clone)]
pub struct FrameEncoder {
    builder: PayloadBuilder,
    max_frame_size: usize,
}

impl Default for FrameEncoder {
    fn default() -> Self {
        Self {
            builder: PayloadBuilder::default(),
            max_frame_size: MAX_FRAME_SIZE,
        }
    }
}

impl FrameEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &EncoderConfig) -> Result<Self, EncodeError> {
        config.validate()?;

        Ok(Self {
            builder: PayloadBuilder::with_default_sound(config.default_sound.clone()),
            max_frame_size: config.max_frame_size,
        })
    }

    pub fn max_frame_size(&self) -> usize {
        self.max_frame_size
    }

    pub fn builder(&self) -> &PayloadBuilder {
        &self.builder
    }

    /// Encode a notification for a raw (possibly `<...>` wrapped) token
    pub fn encode(
        &self,
        notification: &Notification,
        device_token: &str,
    ) -> Result<Frame, EncodeError> {
        let token: DeviceToken = device_token.parse()?;
        self.encode_for(notification, &token).map(|outcome| outcome.frame)
    }

    /// Encode for an already decoded token
    ///
    /// When the first attempt is over the ceiling, the alert is cut once to
    /// the room left by an alert-blank payload. A frame that still does not
    /// fit is rejected.
    pub fn encode_for(
        &self,
        notification: &Notification,
        token: &DeviceToken,
    ) -> Result<EncodeOutcome, EncodeError> {
        let frame = self.assemble(token, &self.builder.build_fields(notification))?;
        trace!("Encoded frame: {} bytes", frame.len());

        if frame.len() <= self.max_frame_size {
            return Ok(EncodeOutcome {
                frame,
                truncated: false,
            });
        }

        let Some(alert) = notification.alert() else {
            warn!(
                "Frame of {} bytes exceeds {} and has no alert to truncate",
                frame.len(),
                self.max_frame_size
            );
            return Err(self.exceeded(frame));
        };

        // Baseline keeps `"alert":""` in the payload rather than dropping the key
        let blank = self.builder.build_fields_with_alert(notification, Some(""));
        let baseline = self.assemble(token, &blank)?.len();
        let allowed = (self.max_frame_size - 1).saturating_sub(baseline);

        debug!(
            "Frame of {} bytes over limit, truncating alert of {} bytes to {} (baseline {})",
            frame.len(),
            alert.len(),
            allowed,
            baseline
        );

        // `allowed` counts serialized bytes, so escapes are charged in full
        let short_alert = truncate_escaped(alert, allowed, ELLIPSIS);
        let payload = self.builder.build_fields_with_alert(notification, Some(&short_alert));
        let frame = self.assemble(token, &payload)?;
        trace!("Re-encoded frame: {} bytes", frame.len());

        if frame.len() > self.max_frame_size {
            warn!(
                "Frame of {} bytes exceeds {} after truncating the alert",
                frame.len(),
                self.max_frame_size
            );
            return Err(self.exceeded(frame));
        }

        Ok(EncodeOutcome {
            frame,
            truncated: true,
        })
    }

    fn assemble(&self, token: &DeviceToken, payload: &Payload) -> Result<Frame, EncodeError> {
        let bytes = payload.serialize()?;
        Frame::assemble(token, &bytes)
    }

    fn exceeded(&self, frame: Frame) -> EncodeError {
        EncodeError::ExceededMessageSize {
            size: frame.len(),
            limit: self.max_frame_size,
            frame,
        }
    }
}
