//! HTTP device-shadow client
//!
//! Speaks the IoT data-plane REST shape:
//! `GET|POST /things/{thing}/shadow` and `POST /topics/{topic}?qos=N`.

use super::{DesiredUpdate, Qos, ShadowClient, ShadowDocument, ShadowError};
use crate::config::ShadowConfig;
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, Url};
use serde_json::Value;

const API_KEY_HEADER: &str = "x-api-key";

/// Shadow client backed by `reqwest`
pub struct HttpShadowClient {
    client: Client,
    endpoint: Url,
    api_key: Option<String>,
}

impl HttpShadowClient {
    pub fn new(config: &ShadowConfig) -> Result<Self, ShadowError> {
        let endpoint = Url::parse(&config.endpoint).map_err(|e| {
            ShadowError::invalid_response(format!("Invalid shadow endpoint {}: {e}", config.endpoint))
        })?;
        if endpoint.cannot_be_a_base() {
            return Err(ShadowError::invalid_response(format!(
                "Shadow endpoint cannot be used as a base URL: {}",
                config.endpoint
            )));
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ShadowError::network(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint,
            api_key: config.api_key.clone(),
        })
    }

    /// Build a URL below the endpoint; each segment is percent-encoded
    fn url<'a>(&self, segments: impl IntoIterator<Item = &'a str>) -> Url {
        let mut url = self.endpoint.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn shadow_url(&self, thing: &str) -> Url {
        self.url(["things", thing, "shadow"])
    }

    fn topic_url(&self, topic: &str, qos: Qos) -> Url {
        let mut url = self.url(std::iter::once("topics").chain(topic.split('/')));
        url.query_pairs_mut()
            .append_pair("qos", &qos.level().to_string());
        url
    }

    fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.api_key {
            Some(key) => builder.header(API_KEY_HEADER, key),
            None => builder,
        }
    }

    async fn send(&self, builder: RequestBuilder) -> Result<Response, ShadowError> {
        let response = self
            .authorize(builder)
            .send()
            .await
            .map_err(|e| ShadowError::network(format!("Request failed: {e}")))?;

        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(ShadowError::from_status(status.as_u16(), &body))
        }
    }
}

#[async_trait]
impl ShadowClient for HttpShadowClient {
    async fn get_shadow(&self, thing: &str) -> Result<ShadowDocument, ShadowError> {
        let response = self.send(self.client.get(self.shadow_url(thing))).await?;
        let body = response
            .bytes()
            .await
            .map_err(|e| ShadowError::network(format!("Failed to read shadow body: {e}")))?;

        serde_json::from_slice(&body)
            .map_err(|e| ShadowError::invalid_response(format!("Malformed shadow document: {e}")))
    }

    async fn update_desired(
        &self,
        thing: &str,
        update: &DesiredUpdate,
    ) -> Result<(), ShadowError> {
        self.send(self.client.post(self.shadow_url(thing)).json(update))
            .await
            .map(|_| ())
    }

    async fn publish(&self, topic: &str, qos: Qos, payload: &Value) -> Result<(), ShadowError> {
        self.send(self.client.post(self.topic_url(topic, qos)).json(payload))
            .await
            .map(|_| ())
    }
}
