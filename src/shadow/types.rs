//! Shadow document wire types

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Full shadow document as returned by the service
///
/// Only `state` is interpreted; service metadata is ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShadowDocument {
    #[serde(default)]
    pub state: ShadowState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
}

/// Desired and reported halves of a shadow
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShadowState {
    #[serde(default)]
    pub desired: Map<String, Value>,
    #[serde(default)]
    pub reported: Map<String, Value>,
}

impl ShadowDocument {
    pub fn desired_field(&self, field: &str) -> Option<&Value> {
        self.state.desired.get(field)
    }

    pub fn reported_field(&self, field: &str) -> Option<&Value> {
        self.state.reported.get(field)
    }
}

/// Partial desired-state update, carrying only the changed fields
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DesiredUpdate {
    state: DesiredOnly,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
struct DesiredOnly {
    desired: Map<String, Value>,
}

impl DesiredUpdate {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self {
            state: DesiredOnly { desired: fields },
        }
    }

    /// Update carrying a single field
    pub fn field(name: impl Into<String>, value: Value) -> Self {
        let mut fields = Map::new();
        fields.insert(name.into(), value);
        Self::new(fields)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.state.desired
    }
}

/// Delivery quality for topic publishes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Qos {
    #[default]
    AtMostOnce,
    AtLeastOnce,
}

impl Qos {
    pub fn level(self) -> u8 {
        match self {
            Qos::AtMostOnce => 0,
            Qos::AtLeastOnce => 1,
        }
    }
}

/// Render a shadow leaf value the way it should be spoken
///
/// Strings are spoken without JSON quoting.
pub fn value_to_speech(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
