//! Inbound turn envelope, Alexa-shaped.
//!
//! Deserialization is deliberately tolerant: everything except the `request`
//! object is optional, slots are kept as raw JSON so a malformed slot shape
//! reads as "absent" instead of failing the whole envelope, and unrecognized
//! confirmation statuses normalize to `None`.

use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Clone, Debug, Deserialize)]
pub struct TurnRequest {
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub session: Option<Session>,
    #[serde(default)]
    pub context: Option<Context>,
    pub request: Request,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(tag = "type")]
pub enum Request {
    #[serde(rename = "LaunchRequest")]
    Launch,
    #[serde(rename = "IntentRequest")]
    Intent {
        #[serde(default)]
        intent: Intent,
    },
    #[serde(rename = "SessionEndedRequest")]
    SessionEnded {
        #[serde(default)]
        reason: Option<String>,
    },
    #[serde(other)]
    Unsupported,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct Intent {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub slots: Map<String, Value>,
    #[serde(rename = "confirmationStatus", default)]
    pub confirmation_status: ConfirmationStatus,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ConfirmationStatus {
    Confirmed,
    Denied,
    #[default]
    #[serde(other)]
    None,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct Session {
    #[serde(default)]
    pub attributes: Map<String, Value>,
    #[serde(default)]
    pub user: Option<User>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct User {
    #[serde(rename = "userId", default)]
    pub user_id: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct Context {
    #[serde(rename = "System", default)]
    pub system: Option<System>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct System {
    #[serde(default)]
    pub device: Option<Device>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct Device {
    #[serde(rename = "deviceId", default)]
    pub device_id: Option<String>,
}

impl Intent {
    /// Spoken value for a slot, or `None` when the slot is missing, empty, or
    /// the payload shape around it is not what the platform documents.
    pub fn slot_value(&self, name: &str) -> Option<String> {
        let raw = self.slots.get(name)?.get("value")?;
        let spoken = match raw {
            Value::String(text) => text.trim().to_string(),
            Value::Number(number) => number.to_string(),
            _ => return None,
        };
        (!spoken.is_empty()).then_some(spoken)
    }
}

impl TurnRequest {
    pub fn session_attributes(&self) -> Map<String, Value> {
        self.session.as_ref().map(|session| session.attributes.clone()).unwrap_or_default()
    }

    pub fn user_id(&self) -> Option<&str> {
        self.session.as_ref()?.user.as_ref()?.user_id.as_deref()
    }

    pub fn device_id(&self) -> Option<&str> {
        self.context.as_ref()?.system.as_ref()?.device.as_ref()?.device_id.as_deref()
    }
}
