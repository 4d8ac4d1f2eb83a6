//! Intent routing and handlers
//!
//! Dispatch is a single exhaustive match over the request kind. Each request
//! produces exactly one response; nothing is kept between requests.

use super::error::SkillError;
use super::request::{Intent, IntentRequest, RequestKind};
use super::response::SpeechResponse;
use super::ssml::escape_ssml;
use crate::config::SkillConfig;
use crate::shadow::{value_to_speech, DesiredUpdate, ShadowClient};
use serde_json::Value;
use std::sync::Arc;

pub const FRIENDLY_NAME_SLOT: &str = "MyFriendlyThingName";
pub const ON_OFF_SLOT: &str = "OnOff";

const LED_FIELD: &str = "led";
const TEMPERATURE_FIELD: &str = "temperature";

pub const TURN_NOT_FOUND_SPEECH: &str =
    "I can not find the name of the device you are asking for, please try again";
pub const ASK_NOT_FOUND_SPEECH: &str =
    "I can not find the device you are asking for, please try again";
pub const GOODBYE_SPEECH: &str = "Goodbye!";

/// Requested LED state; anything but "on" means off
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedState {
    On,
    Off,
}

impl LedState {
    pub fn from_slot(value: Option<&str>) -> Self {
        if value == Some("on") {
            Self::On
        } else {
            Self::Off
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::On => "on",
            Self::Off => "off",
        }
    }
}

/// Why a friendly name did not lead to a device
#[derive(Debug, Clone, PartialEq, Eq)]
enum LookupMiss {
    SlotMissing,
    NameNotFound(String),
}

/// Routes requests to handlers
pub struct IntentRouter<C> {
    config: Arc<SkillConfig>,
    help_text: String,
    shadow: C,
}

impl<C: ShadowClient> IntentRouter<C> {
    pub fn new(config: Arc<SkillConfig>, shadow: C) -> Self {
        let help_text = escape_ssml(&config.help_text());
        Self {
            config,
            help_text,
            shadow,
        }
    }

    #[allow(dead_code)] // Used in tests
    pub fn help_text(&self) -> &str {
        &self.help_text
    }

    pub async fn dispatch(&self, request: &IntentRequest) -> Result<SpeechResponse, SkillError> {
        match &request.kind {
            RequestKind::Launch | RequestKind::Intent(Intent::WhatAreMyThings) => {
                Ok(self.launch(request))
            }
            RequestKind::Intent(Intent::TurnOnOff) => self.turn_on_off(request).await,
            RequestKind::Intent(Intent::AskByFriendlyName) => {
                self.ask_by_friendly_name(request).await
            }
            RequestKind::Intent(Intent::Help) => Ok(self.help()),
            RequestKind::Intent(Intent::Cancel | Intent::Stop) => Ok(Self::goodbye()),
            RequestKind::Intent(Intent::Fallback) => Ok(self.fallback()),
            RequestKind::SessionEnded { reason } => {
                tracing::info!(reason = ?reason, "Session ended");
                Ok(SpeechResponse::empty())
            }
            RequestKind::Intent(Intent::Unknown(name)) => {
                Err(SkillError::UnknownIntent(name.clone()))
            }
            RequestKind::Unsupported(request_type) => {
                Err(SkillError::UnsupportedRequest(request_type.clone()))
            }
        }
    }

    fn launch(&self, request: &IntentRequest) -> SpeechResponse {
        tracing::info!(user_id = ?request.user_id, "Launch request received");

        let devices = &self.config.devices;
        let count = devices.len();
        let names = devices
            .names()
            .map(escape_ssml)
            .collect::<Vec<_>>()
            .join(", ");
        let speech = format!(
            "Welcome to {}. You have a total of {count} things. They are: {names}. {}",
            escape_ssml(&self.config.skill_name),
            self.help_text
        );

        SpeechResponse::speak(speech).ask(&self.help_text)
    }

    /// Resolve the friendly-name slot to `(spoken name, device id)`
    fn lookup<'r>(&'r self, request: &'r IntentRequest) -> Result<(&'r str, &'r str), LookupMiss> {
        let name = request
            .slot(FRIENDLY_NAME_SLOT)
            .ok_or(LookupMiss::SlotMissing)?;
        let device = self
            .config
            .devices
            .resolve(name)
            .ok_or_else(|| LookupMiss::NameNotFound(name.to_string()))?;
        Ok((name, device))
    }

    fn not_found(&self, miss: &LookupMiss, speech: &str) -> SpeechResponse {
        match miss {
            LookupMiss::SlotMissing => tracing::info!("No friendly name in slots"),
            LookupMiss::NameNotFound(name) => {
                tracing::info!(friendly_name = %name, "Unrecognised friendly name");
            }
        }
        SpeechResponse::speak(speech).ask(&self.help_text)
    }

    async fn turn_on_off(&self, request: &IntentRequest) -> Result<SpeechResponse, SkillError> {
        let (name, thing) = match self.lookup(request) {
            Ok(found) => found,
            Err(miss) => return Ok(self.not_found(&miss, TURN_NOT_FOUND_SPEECH)),
        };

        let led = LedState::from_slot(request.slot(ON_OFF_SLOT));
        tracing::info!(friendly_name = %name, thing, led = led.as_str(), "Turning thing on/off");

        // Shadow update and direct event are independent; no rollback if the
        // second one fails.
        let update = DesiredUpdate::field(LED_FIELD, Value::from(led.as_str()));
        self.shadow.update_desired(thing, &update).await?;

        let event = Value::Object(update.fields().clone());
        self.shadow
            .publish(&self.config.event_topic, self.config.event_qos, &event)
            .await?;

        // Reported state lags the update, so confirm with the desired value.
        let shadow = self.shadow.get_shadow(thing).await?;
        tracing::debug!(thing, shadow = ?shadow, "Shadow after update");
        let confirmed = shadow
            .desired_field(LED_FIELD)
            .ok_or_else(|| SkillError::missing_field(thing, "desired", LED_FIELD))?;

        let speech = format!(
            "turning {} {}",
            escape_ssml(name),
            escape_ssml(&value_to_speech(confirmed))
        );
        Ok(SpeechResponse::speak(speech).ask(&self.help_text))
    }

    async fn ask_by_friendly_name(
        &self,
        request: &IntentRequest,
    ) -> Result<SpeechResponse, SkillError> {
        let (name, thing) = match self.lookup(request) {
            Ok(found) => found,
            Err(miss) => return Ok(self.not_found(&miss, ASK_NOT_FOUND_SPEECH)),
        };

        tracing::info!(friendly_name = %name, thing, "Reading thing status");
        let shadow = self.shadow.get_shadow(thing).await?;
        tracing::debug!(thing, shadow = ?shadow, "Shadow read");
        let temperature = shadow
            .reported_field(TEMPERATURE_FIELD)
            .ok_or_else(|| SkillError::missing_field(thing, "reported", TEMPERATURE_FIELD))?;

        let speech = format!(
            "the temperature of {} is {} degrees",
            escape_ssml(name),
            escape_ssml(&value_to_speech(temperature))
        );
        Ok(SpeechResponse::speak(speech).ask(&self.help_text))
    }

    fn help(&self) -> SpeechResponse {
        SpeechResponse::speak(&self.help_text).ask(&self.help_text)
    }

    fn goodbye() -> SpeechResponse {
        SpeechResponse::speak(GOODBYE_SPEECH).end_session()
    }

    fn fallback(&self) -> SpeechResponse {
        let speech = format!(
            "The {} skill can't help you with that. {}",
            escape_ssml(&self.config.skill_name),
            self.help_text
        );
        SpeechResponse::speak(speech).ask(&self.help_text)
    }
}
