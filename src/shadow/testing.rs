//! Mock shadow client for testing
//!
//! Records every call in order and answers from queued results, so handler
//! tests can assert exactly which remote calls were made.

use super::{DesiredUpdate, Qos, ShadowClient, ShadowDocument, ShadowError};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::Mutex;

/// One recorded call against the mock
#[derive(Debug, Clone, PartialEq)]
pub enum ShadowCall {
    GetShadow {
        thing: String,
    },
    UpdateDesired {
        thing: String,
        desired: Value,
    },
    Publish {
        topic: String,
        qos: Qos,
        payload: Value,
    },
}

/// Mock shadow client that returns queued results
///
/// Calls with nothing queued fail with a network error, except `publish`
/// and `update_desired` which succeed by default.
#[allow(dead_code)]
pub struct MockShadowClient {
    shadows: Mutex<VecDeque<Result<ShadowDocument, ShadowError>>>,
    updates: Mutex<VecDeque<Result<(), ShadowError>>>,
    publishes: Mutex<VecDeque<Result<(), ShadowError>>>,
    /// Record of all calls made
    pub calls: Mutex<Vec<ShadowCall>>,
}

#[allow(dead_code)]
impl MockShadowClient {
    pub fn new() -> Self {
        Self {
            shadows: Mutex::new(VecDeque::new()),
            updates: Mutex::new(VecDeque::new()),
            publishes: Mutex::new(VecDeque::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Queue the result of the next `get_shadow`
    pub fn queue_shadow(&self, result: Result<ShadowDocument, ShadowError>) {
        self.shadows.lock().unwrap().push_back(result);
    }

    /// Queue a shadow document built from a JSON value
    pub fn queue_shadow_json(&self, document: Value) {
        let doc = serde_json::from_value(document).expect("mock shadow must be a valid document");
        self.queue_shadow(Ok(doc));
    }

    /// Queue the result of the next `update_desired`
    pub fn queue_update(&self, result: Result<(), ShadowError>) {
        self.updates.lock().unwrap().push_back(result);
    }

    /// Queue the result of the next `publish`
    pub fn queue_publish(&self, result: Result<(), ShadowError>) {
        self.publishes.lock().unwrap().push_back(result);
    }

    /// Get recorded calls
    pub fn recorded_calls(&self) -> Vec<ShadowCall> {
        self.calls.lock().unwrap().clone()
    }
}

impl Default for MockShadowClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ShadowClient for MockShadowClient {
    async fn get_shadow(&self, thing: &str) -> Result<ShadowDocument, ShadowError> {
        self.calls.lock().unwrap().push(ShadowCall::GetShadow {
            thing: thing.to_string(),
        });
        self.shadows
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ShadowError::network("No mock shadow queued")))
    }

    async fn update_desired(
        &self,
        thing: &str,
        update: &DesiredUpdate,
    ) -> Result<(), ShadowError> {
        self.calls.lock().unwrap().push(ShadowCall::UpdateDesired {
            thing: thing.to_string(),
            desired: Value::Object(update.fields().clone()),
        });
        self.updates.lock().unwrap().pop_front().unwrap_or(Ok(()))
    }

    async fn publish(&self, topic: &str, qos: Qos, payload: &Value) -> Result<(), ShadowError> {
        self.calls.lock().unwrap().push(ShadowCall::Publish {
            topic: topic.to_string(),
            qos,
            payload: payload.clone(),
        });
        self.publishes.lock().unwrap().pop_front().unwrap_or(Ok(()))
    }
}
