//! Device-shadow transport error types

use thiserror::Error;

/// Shadow transport error with classification
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct ShadowError {
    pub kind: ShadowErrorKind,
    pub message: String,
}

impl ShadowError {
    pub fn new(kind: ShadowErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(ShadowErrorKind::Network, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ShadowErrorKind::NotFound, message)
    }

    pub fn auth(message: impl Into<String>) -> Self {
        Self::new(ShadowErrorKind::Auth, message)
    }

    pub fn rate_limit(message: impl Into<String>) -> Self {
        Self::new(ShadowErrorKind::RateLimit, message)
    }

    pub fn server_error(message: impl Into<String>) -> Self {
        Self::new(ShadowErrorKind::ServerError, message)
    }

    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::new(ShadowErrorKind::InvalidResponse, message)
    }

    pub fn unknown(message: impl Into<String>) -> Self {
        Self::new(ShadowErrorKind::Unknown, message)
    }

    /// Classify a non-success HTTP status from the shadow service
    pub fn from_status(status: u16, body: &str) -> Self {
        match status {
            401 | 403 => Self::auth(format!("Authentication failed: {body}")),
            404 => Self::not_found(format!("Thing or shadow not found: {body}")),
            429 => Self::rate_limit(format!("Rate limited: {body}")),
            500..=599 => Self::server_error(format!("Server error ({status}): {body}")),
            _ => Self::unknown(format!("Unexpected status {status}: {body}")),
        }
    }
}

/// Error classification for diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShadowErrorKind {
    /// Connection failures and timeouts
    Network,
    /// Unknown thing or no shadow document yet (404)
    NotFound,
    /// Credentials rejected (401, 403)
    Auth,
    /// Throttled by the service (429)
    RateLimit,
    /// Service-side failure (5xx)
    ServerError,
    /// Body could not be decoded as a shadow document
    InvalidResponse,
    /// Anything else
    Unknown,
}

impl ShadowErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Network => "network",
            Self::NotFound => "not_found",
            Self::Auth => "auth",
            Self::RateLimit => "rate_limit",
            Self::ServerError => "server_error",
            Self::InvalidResponse => "invalid_response",
            Self::Unknown => "unknown",
        }
    }
}
