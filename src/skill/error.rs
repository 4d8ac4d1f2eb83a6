//! Handler fault types
//!
//! Recoverable conditions (missing slot, unknown friendly name) never show up
//! here; handlers answer those with an apology. Everything in `SkillError`
//! ends at the global boundary as the fixed problem response.

use crate::shadow::ShadowError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SkillError {
    #[error("Shadow transport failed: {0}")]
    Transport(#[from] ShadowError),
    #[error("Shadow of {thing} has no {section}.{field}")]
    MissingField {
        thing: String,
        section: &'static str,
        field: &'static str,
    },
    #[error("No handler for intent {0}")]
    UnknownIntent(String),
    #[error("No handler for request type {0}")]
    UnsupportedRequest(String),
    #[error("Handler panicked: {0}")]
    Panicked(String),
}

impl SkillError {
    pub fn missing_field(thing: &str, section: &'static str, field: &'static str) -> Self {
        Self::MissingField {
            thing: thing.to_string(),
            section,
            field,
        }
    }

    /// Build from a caught panic payload
    pub fn from_panic(payload: &(dyn std::any::Any + Send)) -> Self {
        let message = payload
            .downcast_ref::<&str>()
            .map(ToString::to_string)
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "unknown panic".to_string());
        Self::Panicked(message)
    }

    /// Short label for logs
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Transport(e) => e.kind.as_str(),
            Self::MissingField { .. } => "missing_field",
            Self::UnknownIntent(_) => "unknown_intent",
            Self::UnsupportedRequest(_) => "unsupported_request",
            Self::Panicked(_) => "panic",
        }
    }
}
