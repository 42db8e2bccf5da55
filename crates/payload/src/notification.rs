//! Notification - the logical message handed to the encoder

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::truncate::{ELLIPSIS, truncate_chars};

/// Maximum alert length in characters accepted by [`Notification::set_alert`]
pub const MAX_ALERT_CHARS: usize = 150;

/// Sound played on delivery
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sound {
    /// Boolean `true` flag, rendered as the builder's default sound file
    Default,
    /// Explicit sound file name, rendered verbatim
    Named(String),
}

impl From<&str> for Sound {
    fn from(name: &str) -> Self {
        Sound::Named(name.to_owned())
    }
}

impl From<String> for Sound {
    fn from(name: String) -> Self {
        Sound::Named(name)
    }
}

/// A push notification before encoding
///
/// Every display field is optional; unset fields never show up in the
/// payload. Custom properties keep their insertion order.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "NotificationRepr")]
pub struct Notification {
    alert: Option<String>,

    /// Badge count
    pub badge: Option<u32>,

    /// Sound to play, `None` when silent
    pub sound: Option<Sound>,

    custom_properties: Map<String, Value>,
}

impl Notification {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the alert text, cutting it to [`MAX_ALERT_CHARS`] characters
    ///
    /// Empty text clears the alert.
    pub fn set_alert(&mut self, text: impl AsRef<str>) {
        let text = text.as_ref();
        self.alert = if text.is_empty() {
            None
        } else {
            Some(truncate_chars(text, MAX_ALERT_CHARS, ELLIPSIS))
        };
    }

    pub fn alert(&self) -> Option<&str> {
        self.alert.as_deref()
    }

    /// Add or replace a custom property, keeping its original position
    pub fn set_custom_property(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.custom_properties.insert(key.into(), value.into());
    }

    pub fn custom_properties(&self) -> &Map<String, Value> {
        &self.custom_properties
    }

    pub fn with_alert(mut self, text: impl AsRef<str>) -> Self {
        self.set_alert(text);
        self
    }

    pub fn with_badge(mut self, badge: u32) -> Self {
        self.badge = Some(badge);
        self
    }

    pub fn with_sound(mut self, sound: impl Into<Sound>) -> Self {
        self.sound = Some(sound.into());
        self
    }

    /// Shorthand for the boolean sound flag
    pub fn with_default_sound(mut self) -> Self {
        self.sound = Some(Sound::Default);
        self
    }

    pub fn with_custom_property(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set_custom_property(key, value);
        self
    }
}

/// Wire shape accepted when deserializing a notification (e.g. from JSON)
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct NotificationRepr {
    alert: Option<String>,
    badge: Option<BadgeRepr>,
    sound: Option<SoundRepr>,
    custom_properties: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum BadgeRepr {
    Count(u64),
    Float(f64),
}

impl BadgeRepr {
    /// Truncates toward zero; negatives clamp to 0, huge values to `u32::MAX`
    fn into_count(self) -> u32 {
        match self {
            BadgeRepr::Count(n) => u32::try_from(n).unwrap_or(u32::MAX),
            BadgeRepr::Float(f) => f as u32,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SoundRepr {
    Flag(bool),
    Name(String),
}

impl From<NotificationRepr> for Notification {
    fn from(repr: NotificationRepr) -> Self {
        let mut notification = Notification {
            badge: repr.badge.map(BadgeRepr::into_count),
            sound: match repr.sound {
                Some(SoundRepr::Flag(true)) => Some(Sound::Default),
                Some(SoundRepr::Flag(false)) | None => None,
                Some(SoundRepr::Name(name)) => Some(Sound::Named(name)),
            },
            custom_properties: repr.custom_properties,
            ..Default::default()
        };

        if let Some(alert) = repr.alert {
            notification.set_alert(alert);
        }

        notification
    }
}
