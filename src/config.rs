//! Process configuration
//!
//! Read once at startup from the environment and immutable afterwards.

use crate::shadow::Qos;
use crate::skill::FriendlyNameMap;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_SKILL_NAME: &str = "My Things";
pub const DEFAULT_DEVICES: &str = "thermostat=simulated-device-for-training";
pub const DEFAULT_EVENT_TOPIC: &str = "iotdemo/topic/sub";
pub const DEFAULT_SHADOW_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("Invalid value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
    #[error("Invalid device entry '{0}', expected 'friendly name=device id'")]
    InvalidDeviceEntry(String),
    #[error("Duplicate friendly name: {0}")]
    DuplicateName(String),
    #[error("At least one device must be configured")]
    NoDevices,
}

/// Static skill configuration
#[derive(Debug, Clone)]
pub struct SkillConfig {
    /// Display name, used as card title and in fallback speech
    pub skill_name: String,
    pub devices: FriendlyNameMap,
    /// Topic that receives direct device events
    pub event_topic: String,
    pub event_qos: Qos,
}

impl SkillConfig {
    pub fn new(
        skill_name: impl Into<String>,
        devices: FriendlyNameMap,
        event_topic: impl Into<String>,
    ) -> Self {
        Self {
            skill_name: skill_name.into(),
            devices,
            event_topic: event_topic.into(),
            event_qos: Qos::AtMostOnce,
        }
    }

    pub fn with_event_qos(mut self, qos: Qos) -> Self {
        self.event_qos = qos;
        self
    }

    /// Help phrase, built around the first configured device
    pub fn help_text(&self) -> String {
        let example = self.devices.names().next().unwrap_or_default();
        format!(
            "You can ask a thing for its status, or turn it on or off. \
             You can say, ask {example}, or say, turn on {example}."
        )
    }
}

/// Connection settings for the device-shadow service
#[derive(Debug, Clone)]
pub struct ShadowConfig {
    pub endpoint: String,
    pub api_key: Option<String>,
    pub timeout: Duration,
}

/// Complete process configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub skill: SkillConfig,
    pub shadow: ShadowConfig,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; empty values count as unset
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let port = match get("MY_THINGS_PORT") {
            Some(p) => p.trim().parse().map_err(|e| ConfigError::Invalid {
                key: "MY_THINGS_PORT",
                reason: format!("{e}"),
            })?,
            None => DEFAULT_PORT,
        };

        let devices = FriendlyNameMap::parse(
            &get("MY_THINGS_DEVICES").unwrap_or_else(|| DEFAULT_DEVICES.to_string()),
        )?;

        let event_qos = match get("MY_THINGS_EVENT_QOS").as_deref().map(str::trim) {
            None | Some("0") => Qos::AtMostOnce,
            Some("1") => Qos::AtLeastOnce,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    key: "MY_THINGS_EVENT_QOS",
                    reason: format!("expected 0 or 1, got {other}"),
                })
            }
        };

        let skill = SkillConfig::new(
            get("MY_THINGS_SKILL_NAME").unwrap_or_else(|| DEFAULT_SKILL_NAME.to_string()),
            devices,
            get("MY_THINGS_EVENT_TOPIC").unwrap_or_else(|| DEFAULT_EVENT_TOPIC.to_string()),
        )
        .with_event_qos(event_qos);

        let timeout = match get("SHADOW_TIMEOUT_SECS") {
            Some(secs) => {
                let secs: u64 = secs.trim().parse().map_err(|e| ConfigError::Invalid {
                    key: "SHADOW_TIMEOUT_SECS",
                    reason: format!("{e}"),
                })?;
                if secs == 0 {
                    return Err(ConfigError::Invalid {
                        key: "SHADOW_TIMEOUT_SECS",
                        reason: "must be at least 1 second".to_string(),
                    });
                }
                Duration::from_secs(secs)
            }
            None => DEFAULT_SHADOW_TIMEOUT,
        };

        let shadow = ShadowConfig {
            endpoint: get("SHADOW_ENDPOINT").ok_or(ConfigError::Missing("SHADOW_ENDPOINT"))?,
            api_key: get("SHADOW_API_KEY"),
            timeout,
        };

        Ok(Self {
            port,
            skill,
            shadow,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_vars(vars(&[("SHADOW_ENDPOINT", "http://localhost:8443")]))
            .unwrap();

        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.skill.skill_name, "My Things");
        assert_eq!(config.skill.event_topic, "iotdemo/topic/sub");
        assert_eq!(config.skill.event_qos, Qos::AtMostOnce);
        assert_eq!(
            config.skill.devices.resolve("thermostat"),
            Some("simulated-device-for-training")
        );
        assert_eq!(config.shadow.timeout, DEFAULT_SHADOW_TIMEOUT);
        assert!(config.shadow.api_key.is_none());
    }

    #[test]
    fn test_endpoint_required() {
        let err = Config::from_vars(vars(&[])).unwrap_err();
        assert_eq!(err, ConfigError::Missing("SHADOW_ENDPOINT"));
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_vars(vars(&[
            ("SHADOW_ENDPOINT", "https://iot.example.com"),
            ("SHADOW_API_KEY", "secret"),
            ("SHADOW_TIMEOUT_SECS", "5"),
            ("MY_THINGS_PORT", "9000"),
            ("MY_THINGS_SKILL_NAME", "Home"),
            ("MY_THINGS_DEVICES", "lamp=dev-lamp, fan=dev-fan"),
            ("MY_THINGS_EVENT_QOS", "1"),
        ]))
        .unwrap();

        assert_eq!(config.skill.event_qos, Qos::AtLeastOnce);

        assert_eq!(config.port, 9000);
        assert_eq!(config.skill.skill_name, "Home");
        assert_eq!(config.skill.devices.len(), 2);
        assert_eq!(config.shadow.api_key.as_deref(), Some("secret"));
        assert_eq!(config.shadow.timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_invalid_port() {
        let err = Config::from_vars(vars(&[
            ("SHADOW_ENDPOINT", "http://localhost"),
            ("MY_THINGS_PORT", "eighty"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "MY_THINGS_PORT", .. }));
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let err = Config::from_vars(vars(&[
            ("SHADOW_ENDPOINT", "http://localhost"),
            ("SHADOW_TIMEOUT_SECS", "0"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "SHADOW_TIMEOUT_SECS", .. }));
    }

    #[test]
    fn test_invalid_qos() {
        let err = Config::from_vars(vars(&[
            ("SHADOW_ENDPOINT", "http://localhost"),
            ("MY_THINGS_EVENT_QOS", "2"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "MY_THINGS_EVENT_QOS", .. }));
    }

    #[test]
    fn test_help_text_uses_first_device() {
        let config = Config::from_vars(vars(&[("SHADOW_ENDPOINT", "http://localhost")])).unwrap();
        assert_eq!(
            config.skill.help_text(),
            "You can ask a thing for its status, or turn it on or off. \
             You can say, ask thermostat, or say, turn on thermostat."
        );
    }
}
