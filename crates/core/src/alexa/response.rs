//! Outbound turn envelope and its builder.
//!
//! The builder owns the platform's reply invariants: speech is wrapped in
//! SSML markup, a continuing response always carries a reprompt (repeating
//! the main speech when none is supplied), and a terminal response never
//! carries one.

use serde::Serialize;
use serde_json::{Map, Value};

pub const ENVELOPE_VERSION: &str = "1.0";

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TurnResponse {
    pub version: &'static str,
    #[serde(skip_serializing_if = "Map::is_empty")]
    pub session_attributes: Map<String, Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<ResponseBody>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseBody {
    pub output_speech: OutputSpeech,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reprompt: Option<Reprompt>,
    pub should_end_session: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct OutputSpeech {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub ssml: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Reprompt {
    pub output_speech: OutputSpeech,
}

fn ssml(text: &str) -> OutputSpeech {
    OutputSpeech { kind: "SSML", ssml: format!("<speak>{text}</speak>") }
}

#[derive(Clone, Debug)]
pub struct ResponseBuilder {
    speech: String,
    reprompt: Option<String>,
    end_session: bool,
    attributes: Map<String, Value>,
}

impl ResponseBuilder {
    pub fn speak(text: impl Into<String>) -> Self {
        Self { speech: text.into(), reprompt: None, end_session: false, attributes: Map::new() }
    }

    pub fn reprompt(mut self, text: impl Into<String>) -> Self {
        self.reprompt = Some(text.into());
        self
    }

    pub fn end_session(mut self, end: bool) -> Self {
        self.end_session = end;
        self
    }

    pub fn attributes(mut self, attributes: Map<String, Value>) -> Self {
        self.attributes = attributes;
        self
    }

    pub fn build(self) -> TurnResponse {
        let reprompt = if self.end_session {
            None
        } else {
            let text = self.reprompt.as_deref().unwrap_or(&self.speech);
            Some(Reprompt { output_speech: ssml(text) })
        };

        TurnResponse {
            version: ENVELOPE_VERSION,
            session_attributes: self.attributes,
            response: Some(ResponseBody {
                output_speech: ssml(&self.speech),
                reprompt,
                should_end_session: self.end_session,
            }),
        }
    }
}

impl TurnResponse {
    /// Bare acknowledgment for `SessionEndedRequest`: version only, no speech.
    pub fn session_ended_ack() -> Self {
        Self { version: ENVELOPE_VERSION, session_attributes: Map::new(), response: None }
    }
}
