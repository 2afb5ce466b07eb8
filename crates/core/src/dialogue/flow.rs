//! Flow marker and the session-attribute bag backing the inclusion form.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const KEY_FLOW: &str = "flow";
pub const KEY_MATERIAL: &str = "material";
pub const KEY_QUANTIDADE: &str = "quantidade";
pub const KEY_SETOR: &str = "setor";

/// Current step of the stock-inclusion form. Stored in the bag as the
/// uppercase wire name; anything unrecognized reads back as "no flow".
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Flow {
    AskMaterial,
    AskQtd,
    AskSetor,
    Confirm,
}

impl Flow {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::AskMaterial => "ASK_MATERIAL",
            Self::AskQtd => "ASK_QTD",
            Self::AskSetor => "ASK_SETOR",
            Self::Confirm => "CONFIRM",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "ASK_MATERIAL" => Some(Self::AskMaterial),
            "ASK_QTD" => Some(Self::AskQtd),
            "ASK_SETOR" => Some(Self::AskSetor),
            "CONFIRM" => Some(Self::Confirm),
            _ => None,
        }
    }
}

/// The in-progress form as read from the caller-echoed attribute bag.
///
/// The bag is untrusted input: values may be missing, malformed, or stale on
/// any turn, so every field is optional and `quantidade`/`setor` stay raw
/// strings until the turn that needs them parsed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SessionState {
    pub flow: Option<Flow>,
    pub material: Option<String>,
    pub quantidade: Option<String>,
    pub setor: Option<String>,
}

impl SessionState {
    pub fn from_attributes(attributes: &Map<String, Value>) -> Self {
        Self {
            flow: read_string(attributes, KEY_FLOW).and_then(|raw| Flow::parse(&raw)),
            material: read_string(attributes, KEY_MATERIAL),
            quantidade: read_string(attributes, KEY_QUANTIDADE),
            setor: read_string(attributes, KEY_SETOR),
        }
    }

    pub fn to_attributes(&self) -> Map<String, Value> {
        let mut attributes = Map::new();
        if let Some(flow) = self.flow {
            attributes.insert(KEY_FLOW.to_string(), Value::from(flow.as_str()));
        }
        if let Some(material) = &self.material {
            attributes.insert(KEY_MATERIAL.to_string(), Value::from(material.clone()));
        }
        if let Some(quantidade) = &self.quantidade {
            attributes.insert(KEY_QUANTIDADE.to_string(), Value::from(quantidade.clone()));
        }
        if let Some(setor) = &self.setor {
            attributes.insert(KEY_SETOR.to_string(), Value::from(setor.clone()));
        }
        attributes
    }

    /// Full restart after a negation: everything collected is discarded and
    /// the form points back at the first question.
    pub fn restart() -> Self {
        Self { flow: Some(Flow::AskMaterial), ..Self::default() }
    }

    pub fn in_progress(&self) -> bool {
        self.flow.is_some()
    }
}

fn read_string(attributes: &Map<String, Value>, key: &str) -> Option<String> {
    let value = match attributes.get(key)? {
        Value::String(text) => text.trim().to_string(),
        Value::Number(number) => number.to_string(),
        _ => return None,
    };
    (!value.is_empty()).then_some(value)
}

/// Quantity rule: an integer strictly greater than zero. Everything else
/// (non-numeric, zero, negative) is a validation failure, never a crash.
pub fn parse_positive_int(raw: &str) -> Option<i64> {
    raw.trim().parse::<i64>().ok().filter(|value| *value > 0)
}

/// Sector codes are plain integers, sign included so stale garbage like
/// `"-1"` still round-trips to a committable value check.
pub fn parse_int(raw: &str) -> Option<i64> {
    raw.trim().parse::<i64>().ok()
}
