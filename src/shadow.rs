//! Device-shadow client abstraction
//!
//! Thin call wrappers around the remote device-management service. No
//! retries and no local caching: every call goes to the service and any
//! failure is returned to the caller unchanged.

mod error;
mod http;
mod types;

#[cfg(test)]
pub mod testing;

#[allow(unused_imports)] // ShadowErrorKind is matched on in tests
pub use error::{ShadowError, ShadowErrorKind};
pub use http::HttpShadowClient;
pub use types::{value_to_speech, DesiredUpdate, Qos, ShadowDocument};

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

/// Operations against the device-shadow service
#[async_trait]
pub trait ShadowClient: Send + Sync {
    /// Fetch the current shadow document of a thing
    async fn get_shadow(&self, thing: &str) -> Result<ShadowDocument, ShadowError>;

    /// Merge a partial desired-state document into the thing's shadow
    async fn update_desired(&self, thing: &str, update: &DesiredUpdate)
        -> Result<(), ShadowError>;

    /// Publish a short payload to a topic, independent of the shadow
    async fn publish(&self, topic: &str, qos: Qos, payload: &Value) -> Result<(), ShadowError>;
}

#[async_trait]
impl<T: ShadowClient + ?Sized> ShadowClient for Arc<T> {
    async fn get_shadow(&self, thing: &str) -> Result<ShadowDocument, ShadowError> {
        (**self).get_shadow(thing).await
    }

    async fn update_desired(
        &self,
        thing: &str,
        update: &DesiredUpdate,
    ) -> Result<(), ShadowError> {
        (**self).update_desired(thing, update).await
    }

    async fn publish(&self, topic: &str, qos: Qos, payload: &Value) -> Result<(), ShadowError> {
        (**self).publish(topic, qos, payload).await
    }
}

/// Logging wrapper for shadow clients
pub struct LoggingShadowClient {
    inner: Arc<dyn ShadowClient>,
}

impl LoggingShadowClient {
    pub fn new(inner: Arc<dyn ShadowClient>) -> Self {
        Self { inner }
    }

    fn record<T>(
        operation: &str,
        resource: &str,
        start: std::time::Instant,
        result: &Result<T, ShadowError>,
    ) {
        let duration = start.elapsed();
        match result {
            Ok(_) => {
                tracing::info!(
                    operation,
                    resource,
                    duration_ms = %duration.as_millis(),
                    "Shadow call completed"
                );
            }
            Err(e) => {
                tracing::error!(
                    operation,
                    resource,
                    duration_ms = %duration.as_millis(),
                    error = %e.message,
                    kind = e.kind.as_str(),
                    "Shadow call failed"
                );
            }
        }
    }
}

#[async_trait]
impl ShadowClient for LoggingShadowClient {
    async fn get_shadow(&self, thing: &str) -> Result<ShadowDocument, ShadowError> {
        let start = std::time::Instant::now();
        let result = self.inner.get_shadow(thing).await;
        Self::record("get_shadow", thing, start, &result);
        result
    }

    async fn update_desired(
        &self,
        thing: &str,
        update: &DesiredUpdate,
    ) -> Result<(), ShadowError> {
        let start = std::time::Instant::now();
        let result = self.inner.update_desired(thing, update).await;
        Self::record("update_desired", thing, start, &result);
        result
    }

    async fn publish(&self, topic: &str, qos: Qos, payload: &Value) -> Result<(), ShadowError> {
        let start = std::time::Instant::now();
        let result = self.inner.publish(topic, qos, payload).await;
        Self::record("publish", topic, start, &result);
        result
    }
}
