//! Outbound response model and the voice-platform response envelope

use serde::{Deserialize, Serialize};

const ENVELOPE_VERSION: &str = "1.0";
const SPEECH_TYPE_SSML: &str = "SSML";
const CARD_TYPE_SIMPLE: &str = "Simple";

/// Display card: a title plus plain text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    pub title: String,
    pub content: String,
}

/// Response produced by a handler
///
/// Speech and reprompt carry SSML-capable text. `reprompt` being set means
/// the platform keeps listening.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpeechResponse {
    pub speech: Option<String>,
    pub reprompt: Option<String>,
    pub card: Option<Card>,
    pub should_end_session: Option<bool>,
}

impl SpeechResponse {
    /// Acknowledgement with no speech
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn speak(speech: impl Into<String>) -> Self {
        Self {
            speech: Some(speech.into()),
            ..Self::default()
        }
    }

    /// Keep the session open and re-ask with `reprompt`
    pub fn ask(mut self, reprompt: impl Into<String>) -> Self {
        self.reprompt = Some(reprompt.into());
        self.should_end_session = Some(false);
        self
    }

    pub fn end_session(mut self) -> Self {
        self.reprompt = None;
        self.should_end_session = Some(true);
        self
    }

    pub fn with_card(mut self, card: Card) -> Self {
        self.card = Some(card);
        self
    }

    /// Speech as a complete SSML document
    pub fn speech_ssml(&self) -> Option<String> {
        self.speech.as_deref().map(wrap_ssml)
    }

    pub fn into_envelope(self) -> ResponseEnvelope {
        ResponseEnvelope {
            version: ENVELOPE_VERSION.to_string(),
            response: ResponseBody {
                output_speech: self.speech.as_deref().map(OutputSpeech::ssml),
                reprompt: self.reprompt.as_deref().map(|text| Reprompt {
                    output_speech: OutputSpeech::ssml(text),
                }),
                card: self.card.map(|card| CardBody {
                    card_type: CARD_TYPE_SIMPLE.to_string(),
                    title: card.title,
                    content: card.content,
                }),
                should_end_session: self.should_end_session,
            },
        }
    }
}

/// Wrap text in `<speak>` unless it already is a speak document
pub fn wrap_ssml(text: &str) -> String {
    let trimmed = text.trim();
    if trimmed.starts_with("<speak>") && trimmed.ends_with("</speak>") {
        trimmed.to_string()
    } else {
        format!("<speak>{trimmed}</speak>")
    }
}

/// Voice-platform response envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseEnvelope {
    pub version: String,
    pub response: ResponseBody,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_speech: Option<OutputSpeech>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reprompt: Option<Reprompt>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card: Option<CardBody>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub should_end_session: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputSpeech {
    #[serde(rename = "type")]
    pub speech_type: String,
    pub ssml: String,
}

impl OutputSpeech {
    fn ssml(text: &str) -> Self {
        Self {
            speech_type: SPEECH_TYPE_SSML.to_string(),
            ssml: wrap_ssml(text),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reprompt {
    pub output_speech: OutputSpeech,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardBody {
    #[serde(rename = "type")]
    pub card_type: String,
    pub title: String,
    pub content: String,
}
