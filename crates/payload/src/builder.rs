//! Payload construction and serialization

use serde_json::{Map, Value};
use thiserror::Error;
use tracing::warn;

use crate::notification::{Notification, Sound};

/// Sound file used when a notification only sets the sound flag
pub const DEFAULT_SOUND: &str = "1.aiff";

/// Key of the standard display sub-object
pub const APS_KEY: &str = "aps";

#[derive(Error, Debug)]
pub enum PayloadError {
    #[error("Payload serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Payload is not a JSON object")]
    NotAnObject,
}

/// Ordered key/value payload: `aps` first, then custom properties
#[derive(Debug, Clone, PartialEq)]
pub struct Payload(Map<String, Value>);

impl Payload {
    /// Compact JSON bytes, keys in insertion order
    pub fn serialize(&self) -> Result<Vec<u8>, PayloadError> {
        Ok(serde_json::to_vec(&self.0)?)
    }

    /// Parse serialized payload bytes back into a structure
    pub fn parse(bytes: &[u8]) -> Result<Self, PayloadError> {
        match serde_json::from_slice::<Value>(bytes)? {
            Value::Object(map) => Ok(Self(map)),
            _ => Err(PayloadError::NotAnObject),
        }
    }

    pub fn aps(&self) -> Option<&Map<String, Value>> {
        self.0.get(APS_KEY).and_then(Value::as_object)
    }

    pub fn alert(&self) -> Option<&str> {
        self.aps()?.get("alert")?.as_str()
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

/// Turns a [`Notification`] into a [`Payload`]
#[derive(Debug, Clone)]
pub struct PayloadBuilder {
    default_sound: String,
}

impl Default for PayloadBuilder {
    fn default() -> Self {
        Self {
            default_sound: DEFAULT_SOUND.to_owned(),
        }
    }
}

impl PayloadBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder that renders [`Sound::Default`] as `name`
    pub fn with_default_sound(name: impl Into<String>) -> Self {
        Self {
            default_sound: name.into(),
        }
    }

    pub fn default_sound(&self) -> &str {
        &self.default_sound
    }

    /// Build the payload fields for a notification
    pub fn build_fields(&self, notification: &Notification) -> Payload {
        self.build_fields_with_alert(notification, notification.alert())
    }

    /// Build the payload fields with `alert` standing in for the
    /// notification's own alert. The notification is left untouched.
    ///
    /// `Some("")` still emits an empty `alert` key.
    pub fn build_fields_with_alert(
        &self,
        notification: &Notification,
        alert: Option<&str>,
    ) -> Payload {
        let mut aps = Map::new();

        if let Some(alert) = alert {
            aps.insert("alert".into(), Value::String(alert.to_owned()));
        }

        if let Some(badge) = notification.badge {
            aps.insert("badge".into(), Value::from(badge));
        }

        match &notification.sound {
            Some(Sound::Default) => {
                aps.insert("sound".into(), Value::String(self.default_sound.clone()));
            }
            Some(Sound::Named(name)) => {
                aps.insert("sound".into(), Value::String(name.clone()));
            }
            None => {}
        }

        let mut fields = Map::new();
        fields.insert(APS_KEY.into(), Value::Object(aps));

        for (key, value) in notification.custom_properties() {
            if key == APS_KEY {
                warn!("Skipping custom property that collides with \"{}\"", APS_KEY);
                continue;
            }
            fields.insert(key.clone(), Value::String(stringify(value)));
        }

        Payload(fields)
    }
}

/// Build and serialize in one go with the default builder
pub fn serialize(notification: &Notification) -> Result<Vec<u8>, PayloadError> {
    PayloadBuilder::default().build_fields(notification).serialize()
}

/// String form of an arbitrary custom value
fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
