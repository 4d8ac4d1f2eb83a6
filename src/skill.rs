//! Voice skill core
//!
//! Every request runs through the same fixed pipeline:
//! request log, dispatch, fault boundary, card generation, response log.

mod error;
mod names;
#[cfg(test)]
mod proptests;
mod request;
mod response;
mod router;
mod ssml;

pub use error::SkillError;
pub use names::FriendlyNameMap;
#[allow(unused_imports)] // Intent and RequestKind are built directly in tests
pub use request::{Intent, IntentRequest, RequestEnvelope, RequestKind};
pub use response::{Card, ResponseEnvelope, SpeechResponse};
pub use router::IntentRouter;
pub use ssml::ssml_to_text;

use crate::config::SkillConfig;
use crate::shadow::ShadowClient;
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

pub const PROBLEM_SPEECH: &str = "Sorry, there was some problem. Please try again!!";

/// Skill wired to the production shadow client
pub type ProductionSkill = Skill<Arc<dyn ShadowClient>>;

/// Request handler with its post-processing stages
pub struct Skill<C> {
    config: Arc<SkillConfig>,
    router: IntentRouter<C>,
}

impl<C: ShadowClient> Skill<C> {
    pub fn new(config: Arc<SkillConfig>, shadow: C) -> Self {
        let router = IntentRouter::new(config.clone(), shadow);
        Self { config, router }
    }

    pub fn config(&self) -> &SkillConfig {
        &self.config
    }

    /// Handle a raw platform envelope
    pub async fn handle_envelope(&self, envelope: RequestEnvelope) -> ResponseEnvelope {
        self.handle(&IntentRequest::from(envelope))
            .await
            .into_envelope()
    }

    /// Handle one request; always yields a well-formed response
    pub async fn handle(&self, request: &IntentRequest) -> SpeechResponse {
        log_request(request);

        let outcome = AssertUnwindSafe(self.router.dispatch(request))
            .catch_unwind()
            .await
            .unwrap_or_else(|panic| Err(SkillError::from_panic(panic.as_ref())));

        let response = match outcome {
            Ok(response) => response,
            Err(e) => {
                tracing::error!(
                    request = request.label(),
                    kind = e.kind(),
                    error = %e,
                    "Request handling failed"
                );
                problem_response()
            }
        };

        let response = self.attach_card(response);
        log_response(request, &response);
        response
    }

    /// Card stage: plain-text copy of the speech, titled with the skill name
    fn attach_card(&self, response: SpeechResponse) -> SpeechResponse {
        match response.speech_ssml() {
            Some(ssml) => {
                let card = Card {
                    title: self.config.skill_name.clone(),
                    content: ssml_to_text(&ssml),
                };
                response.with_card(card)
            }
            None => response,
        }
    }
}

fn problem_response() -> SpeechResponse {
    SpeechResponse::speak(PROBLEM_SPEECH).ask(PROBLEM_SPEECH)
}

fn log_request(request: &IntentRequest) {
    tracing::info!(
        request_id = ?request.request_id,
        user_id = ?request.user_id,
        request = request.label(),
        slots = ?request.slots,
        "Skill request"
    );
}

fn log_response(request: &IntentRequest, response: &SpeechResponse) {
    tracing::info!(
        request_id = ?request.request_id,
        speech = ?response.speech,
        reprompt = ?response.reprompt,
        card = ?response.card,
        should_end_session = ?response.should_end_session,
        "Skill response"
    );
}
