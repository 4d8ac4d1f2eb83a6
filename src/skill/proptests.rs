//! Property-based tests for the request pipeline
//!
//! Whatever arrives and whatever the shadow service answers, the caller gets
//! a well-formed response and never sees a transport error verbatim.

use super::router::{FRIENDLY_NAME_SLOT, ON_OFF_SLOT};
use super::*;
use crate::shadow::testing::{MockShadowClient, ShadowCall};
use crate::shadow::{ShadowDocument, ShadowError};
use proptest::prelude::*;
use serde_json::json;

const SECRET_ERROR: &str = "backend exploded with secret detail";

fn arb_kind() -> impl Strategy<Value = RequestKind> {
    prop_oneof![
        Just(RequestKind::Launch),
        Just(RequestKind::SessionEnded { reason: None }),
        "[A-Za-z.]{1,20}".prop_map(RequestKind::Unsupported),
        prop_oneof![
            Just(Intent::WhatAreMyThings),
            Just(Intent::TurnOnOff),
            Just(Intent::AskByFriendlyName),
            Just(Intent::Help),
            Just(Intent::Cancel),
            Just(Intent::Stop),
            Just(Intent::Fallback),
            "[A-Za-z]{1,20}Intent".prop_map(|name| Intent::from_name(&name)),
        ]
        .prop_map(RequestKind::Intent),
    ]
}

fn arb_name() -> impl Strategy<Value = Option<String>> {
    prop_oneof![
        Just(None),
        Just(Some("thermostat".to_string())),
        "[a-z ]{0,12}".prop_map(Some),
    ]
}

fn arb_shadow() -> impl Strategy<Value = Result<ShadowDocument, ShadowError>> {
    prop_oneof![
        Just(Err(ShadowError::network(SECRET_ERROR))),
        Just(Ok(ShadowDocument::default())),
        (0i64..40).prop_map(|t| Ok(serde_json::from_value::<ShadowDocument>(json!({
            "state": { "desired": { "led": "on" }, "reported": { "temperature": t } }
        }))
        .unwrap())),
    ]
}

fn arb_request() -> impl Strategy<Value = IntentRequest> {
    (arb_kind(), arb_name(), prop::option::of("on|off|[a-z]{0,5}")).prop_map(
        |(kind, name, on_off)| {
            let mut request = IntentRequest::new(kind);
            if let Some(name) = name {
                request = request.with_slot(FRIENDLY_NAME_SLOT, name);
            }
            if let Some(on_off) = on_off {
                request = request.with_slot(ON_OFF_SLOT, on_off);
            }
            request
        },
    )
}

fn config() -> Arc<SkillConfig> {
    Arc::new(SkillConfig::new(
        "My Things",
        FriendlyNameMap::from_pairs([("thermostat", "simulated-device-for-training")]).unwrap(),
        "iotdemo/topic/sub",
    ))
}

proptest! {
    #[test]
    fn prop_every_request_gets_a_well_formed_response(
        request in arb_request(),
        shadow in arb_shadow(),
        update_fails in any::<bool>(),
    ) {
        let mock = Arc::new(MockShadowClient::new());
        mock.queue_shadow(shadow);
        if update_fails {
            mock.queue_update(Err(ShadowError::server_error(SECRET_ERROR)));
        }
        let skill = Skill::new(config(), mock.clone());

        let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
        let response = runtime.block_on(skill.handle(&request));

        if matches!(request.kind, RequestKind::SessionEnded { .. }) {
            prop_assert_eq!(&response, &SpeechResponse::empty());
        } else {
            let speech = response.speech.clone().expect("speech");
            prop_assert!(!speech.contains(SECRET_ERROR));
            let card = response.card.clone().expect("card");
            prop_assert_eq!(card.title, "My Things");
            prop_assert_eq!(card.content, ssml_to_text(&speech));
        }

        // Only a resolved name may reach the shadow service
        if request.slot(FRIENDLY_NAME_SLOT) != Some("thermostat") {
            prop_assert!(mock.recorded_calls().is_empty());
        }
    }

    #[test]
    fn prop_resolved_turn_calls_update_first(on_off in "on|off") {
        let mock = Arc::new(MockShadowClient::new());
        mock.queue_shadow_json(json!({ "state": { "desired": { "led": on_off.clone() } } }));
        let skill = Skill::new(config(), mock.clone());
        let request = IntentRequest::intent(Intent::TurnOnOff)
            .with_slot(FRIENDLY_NAME_SLOT, "thermostat")
            .with_slot(ON_OFF_SLOT, on_off.clone());

        let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
        let response = runtime.block_on(skill.handle(&request));

        prop_assert_eq!(response.speech, Some(format!("turning thermostat {on_off}")));
        let calls = mock.recorded_calls();
        prop_assert_eq!(calls.len(), 3);
        let expected = json!({ "led": on_off.as_str() });
        prop_assert!(
            matches!(&calls[0], ShadowCall::UpdateDesired { desired, .. } if *desired == expected),
            "update first"
        );
        prop_assert!(matches!(&calls[1], ShadowCall::Publish { .. }), "publish second");
        prop_assert!(matches!(&calls[2], ShadowCall::GetShadow { .. }), "get_shadow last");
    }
}
