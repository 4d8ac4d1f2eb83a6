//! Inbound request envelope and the request model handlers read

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const LAUNCH_REQUEST: &str = "LaunchRequest";
pub const INTENT_REQUEST: &str = "IntentRequest";
pub const SESSION_ENDED_REQUEST: &str = "SessionEndedRequest";

/// Voice-platform request envelope, as posted to the webhook
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestEnvelope {
    #[serde(default)]
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session: Option<Session>,
    pub request: RequestBody,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub user_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestBody {
    #[serde(rename = "type")]
    pub request_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intent: Option<IntentBody>,
    /// Only present on session-ended requests
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntentBody {
    pub name: String,
    #[serde(default)]
    pub slots: BTreeMap<String, Slot>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Slot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

/// The closed set of intents this skill knows
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    WhatAreMyThings,
    TurnOnOff,
    AskByFriendlyName,
    Help,
    Cancel,
    Stop,
    Fallback,
    /// Any other intent name; has no handler
    Unknown(String),
}

impl Intent {
    /// Exact, case-sensitive match on the intent name
    pub fn from_name(name: &str) -> Self {
        match name {
            "WhatAreMyThingsIntent" => Self::WhatAreMyThings,
            "TurnOnOffIntent" => Self::TurnOnOff,
            "AskByMyFriendlyThingNameIntent" => Self::AskByFriendlyName,
            "AMAZON.HelpIntent" => Self::Help,
            "AMAZON.CancelIntent" => Self::Cancel,
            "AMAZON.StopIntent" => Self::Stop,
            "AMAZON.FallbackIntent" => Self::Fallback,
            other => Self::Unknown(other.to_string()),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::WhatAreMyThings => "WhatAreMyThingsIntent",
            Self::TurnOnOff => "TurnOnOffIntent",
            Self::AskByFriendlyName => "AskByMyFriendlyThingNameIntent",
            Self::Help => "AMAZON.HelpIntent",
            Self::Cancel => "AMAZON.CancelIntent",
            Self::Stop => "AMAZON.StopIntent",
            Self::Fallback => "AMAZON.FallbackIntent",
            Self::Unknown(name) => name,
        }
    }
}

/// Request kinds, one per routing state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestKind {
    Launch,
    Intent(Intent),
    SessionEnded { reason: Option<String> },
    /// A request type outside the supported set
    Unsupported(String),
}

/// One inbound request, read-only for the handlers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntentRequest {
    pub kind: RequestKind,
    /// Slot values by slot name; slots without a value are left out
    pub slots: BTreeMap<String, String>,
    pub user_id: Option<String>,
    pub request_id: Option<String>,
}

impl IntentRequest {
    pub fn new(kind: RequestKind) -> Self {
        Self {
            kind,
            slots: BTreeMap::new(),
            user_id: None,
            request_id: None,
        }
    }

    /// Intent request with no slots
    #[allow(dead_code)] // Used in tests
    pub fn intent(intent: Intent) -> Self {
        Self::new(RequestKind::Intent(intent))
    }

    #[allow(dead_code)] // Used in tests
    pub fn with_slot(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.slots.insert(name.into(), value.into());
        self
    }

    pub fn slot(&self, name: &str) -> Option<&str> {
        self.slots.get(name).map(String::as_str)
    }

    /// Short label for logs: request type or intent name
    pub fn label(&self) -> &str {
        match &self.kind {
            RequestKind::Launch => LAUNCH_REQUEST,
            RequestKind::Intent(intent) => intent.name(),
            RequestKind::SessionEnded { .. } => SESSION_ENDED_REQUEST,
            RequestKind::Unsupported(request_type) => request_type,
        }
    }
}

impl From<RequestEnvelope> for IntentRequest {
    fn from(envelope: RequestEnvelope) -> Self {
        let RequestEnvelope {
            session, request, ..
        } = envelope;

        let (kind, slots) = match request.request_type.as_str() {
            LAUNCH_REQUEST => (RequestKind::Launch, BTreeMap::new()),
            SESSION_ENDED_REQUEST => (
                RequestKind::SessionEnded {
                    reason: request.reason,
                },
                BTreeMap::new(),
            ),
            INTENT_REQUEST => {
                let (name, slots) = request
                    .intent
                    .map(|intent| (intent.name, intent.slots))
                    .unwrap_or_default();
                let slots = slots
                    .into_iter()
                    .filter_map(|(key, slot)| slot.value.map(|value| (key, value)))
                    .collect();
                (RequestKind::Intent(Intent::from_name(&name)), slots)
            }
            other => (RequestKind::Unsupported(other.to_string()), BTreeMap::new()),
        };

        Self {
            kind,
            slots,
            user_id: session.and_then(|s| s.user).map(|u| u.user_id),
            request_id: request.request_id,
        }
    }
}
