//! Property-based tests for schema sanitizing and message conversion
//!
//! - Sanitizing is idempotent and never leaves a stripped keyword behind
//! - Conversion never emits an empty entry and keeps message order
//! - Thought signatures survive conversion unchanged

use super::gemini::convert_messages;
use super::models::{Api, Model};
use super::schema::sanitize_schema;
use super::types::{ContentPart, Context, Message, Role};
use proptest::prelude::*;
use serde_json::{Map, Value};

// ============================================================================
// Strategies
// ============================================================================

fn arb_keyword() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("properties".to_string()),
        Just("items".to_string()),
        Just("required".to_string()),
        Just("type".to_string()),
        Just("const".to_string()),
        Just("anyOf".to_string()),
        Just("additionalProperties".to_string()),
        Just("patternProperties".to_string()),
        Just("minimum".to_string()),
        Just("description".to_string()),
        "[a-z]{1,8}",
    ]
}

fn arb_leaf() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        (-100i64..100).prop_map(|n| Value::Number(n.into())),
        "[a-z]{0,10}".prop_map(Value::String),
    ]
}

/// Arbitrary JSON trees whose keys are biased toward schema keywords
fn arb_schema() -> impl Strategy<Value = Value> {
    arb_leaf().prop_recursive(4, 48, 5, |inner| {
        prop_oneof![
            proptest::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
            proptest::collection::vec((arb_keyword(), inner), 0..5)
                .prop_map(|entries| Value::Object(entries.into_iter().collect::<Map<_, _>>())),
        ]
    })
}

fn arb_part() -> impl Strategy<Value = ContentPart> {
    prop_oneof![
        3 => "[a-zA-Z ]{0,20}".prop_map(ContentPart::text),
        2 => ("[a-zA-Z ]{0,20}", proptest::option::of("[A-Za-z0-9+/=]{1,24}"))
            .prop_map(|(t, s)| ContentPart::thinking(t, s)),
        1 => ("[a-z0-9]{4,8}", "[a-z_]{3,10}")
            .prop_map(|(id, name)| ContentPart::tool_call(id, name, Value::Null)),
    ]
}

fn arb_message() -> impl Strategy<Value = Message> {
    (
        prop_oneof![Just(Role::User), Just(Role::Assistant)],
        proptest::collection::vec(arb_part(), 0..5),
    )
        .prop_map(|(role, content)| Message::new(role, content))
}

fn arb_model() -> impl Strategy<Value = Model> {
    prop_oneof![
        Just(Model::new("gemini-2.5-pro", "google", Api::GoogleGenerativeAi)),
        Just(Model::new("claude-opus-4-5", "google-antigravity", Api::GoogleCloudCode)),
        Just(Model::new("gpt-oss-120b", "google-antigravity", Api::GoogleCloudCode)),
        Just(Model::new("llama-4", "google-vertex", Api::GoogleVertex)),
    ]
}

fn contains_stripped_keyword(value: &Value, is_schema: bool) -> bool {
    match value {
        Value::Object(map) => map.iter().any(|(k, v)| {
            let stripped = matches!(
                k.as_str(),
                "const" | "anyOf" | "additionalProperties" | "patternProperties"
            );
            if is_schema && stripped {
                return true;
            }
            match k.as_str() {
                "properties" if is_schema => match v {
                    Value::Object(props) => props.values().any(|s| contains_stripped_keyword(s, true)),
                    _ => false,
                },
                "items" if is_schema => match v {
                    Value::Array(list) => list.iter().any(|s| contains_stripped_keyword(s, true)),
                    other => contains_stripped_keyword(other, true),
                },
                _ => false,
            }
        }),
        _ => false,
    }
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn prop_sanitize_is_idempotent(schema in arb_schema()) {
        let once = sanitize_schema(&schema);
        let twice = sanitize_schema(&once);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn prop_sanitize_strips_keywords(schema in arb_schema()) {
        let sanitized = sanitize_schema(&schema);
        prop_assert!(!contains_stripped_keyword(&sanitized, true));
    }

    #[test]
    fn prop_sanitize_keeps_required(schema in arb_schema()) {
        if let Value::Object(map) = &schema {
            if let Some(required) = map.get("required") {
                let sanitized = sanitize_schema(&schema);
                prop_assert_eq!(sanitized.get("required"), Some(required));
            }
        }
    }

    #[test]
    fn prop_conversion_never_emits_empty_entries(
        model in arb_model(),
        messages in proptest::collection::vec(arb_message(), 0..6),
    ) {
        let context = Context::new(messages.clone());
        let contents = convert_messages(&model, &context);
        prop_assert!(contents.len() <= messages.len());
        for content in &contents {
            prop_assert!(!content.parts.is_empty());
        }
    }

    #[test]
    fn prop_conversion_is_deterministic(
        model in arb_model(),
        messages in proptest::collection::vec(arb_message(), 0..6),
    ) {
        let context = Context::new(messages);
        prop_assert_eq!(convert_messages(&model, &context), convert_messages(&model, &context));
    }

    #[test]
    fn prop_signed_thinking_keeps_signature(
        text in "[a-zA-Z]{1,20}",
        signature in "[A-Za-z0-9+/=]{1,40}",
    ) {
        let model = Model::new("claude-sonnet-4-5", "google-antigravity", Api::GoogleCloudCode);
        let context = Context::new(vec![Message::assistant(vec![
            ContentPart::thinking(text, Some(signature.clone())),
        ])]);
        let contents = convert_messages(&model, &context);
        prop_assert_eq!(contents.len(), 1);
        prop_assert_eq!(contents[0].parts[0].thought_signature.as_deref(), Some(signature.as_str()));
    }
}
