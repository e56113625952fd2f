//! Property-based tests for chat event reconciliation
//!
//! These verify that foreign sessions and runs can never disturb the
//! tracked stream, and that tracking fields stay paired.

use super::reconcile::{handle_chat_event, ChatEventOutcome, RunMatch};
use super::send::is_session_reset_command;
use super::ChatState;
use crate::gateway::{ChatEventPayload, ChatEventState};
use crate::llm::{ContentPart, Message};
use proptest::prelude::*;

// ============================================================================
// Test Helpers
// ============================================================================

/// Everything observable about a state except the client handle
#[derive(Debug, Clone, PartialEq)]
struct Snapshot {
    session_key: String,
    chat_run_id: Option<String>,
    chat_stream: Option<String>,
    chat_stream_started_at: Option<i64>,
    chat_messages: Vec<Message>,
    last_error: Option<String>,
}

fn snapshot(state: &ChatState) -> Snapshot {
    Snapshot {
        session_key: state.session_key.clone(),
        chat_run_id: state.chat_run_id.clone(),
        chat_stream: state.chat_stream.clone(),
        chat_stream_started_at: state.chat_stream_started_at,
        chat_messages: state.chat_messages.clone(),
        last_error: state.last_error.clone(),
    }
}

// ============================================================================
// Arbitrary Generators
// ============================================================================

fn arb_event_state() -> impl Strategy<Value = ChatEventState> {
    prop_oneof![
        Just(ChatEventState::Delta),
        Just(ChatEventState::Final),
        Just(ChatEventState::Aborted),
        Just(ChatEventState::Error),
        Just(ChatEventState::Unknown),
    ]
}

fn arb_message() -> impl Strategy<Value = Option<Message>> {
    proptest::option::of(
        "[a-zA-Z .]{0,30}".prop_map(|text| Message::assistant(vec![ContentPart::text(text)])),
    )
}

/// A session that is either idle or streaming a run
fn arb_state() -> impl Strategy<Value = ChatState> {
    (
        "[a-z]{3,8}",
        proptest::option::of(("run-[a-z]{3}", "[a-zA-Z .]{0,30}", 0i64..1_000_000)),
        proptest::collection::vec("[a-z ]{1,10}".prop_map(Message::user_text), 0..3),
    )
        .prop_map(|(session_key, run, chat_messages)| {
            let mut state = ChatState::new(session_key);
            if let Some((run_id, stream, started_at)) = run {
                state.chat_run_id = Some(run_id);
                state.chat_stream = Some(stream);
                state.chat_stream_started_at = Some(started_at);
            }
            state.chat_messages = chat_messages;
            state
        })
}

fn arb_payload() -> impl Strategy<Value = ChatEventPayload> {
    (
        "run-[a-z]{3}",
        "[a-z]{3,8}",
        arb_event_state(),
        arb_message(),
    )
        .prop_map(|(run_id, session_key, state, message)| ChatEventPayload {
            run_id,
            session_key,
            state,
            message,
            error_message: None,
        })
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn prop_other_session_never_mutates(mut state in arb_state(), mut payload in arb_payload()) {
        payload.session_key = format!("{}-other", state.session_key);
        let before = snapshot(&state);

        let outcome = handle_chat_event(&mut state, Some(&payload));

        prop_assert_eq!(outcome, ChatEventOutcome::Ignored);
        prop_assert_eq!(snapshot(&state), before);
    }

    #[test]
    fn prop_foreign_delta_never_mutates(mut state in arb_state(), mut payload in arb_payload()) {
        payload.session_key = state.session_key.clone();
        payload.state = ChatEventState::Delta;
        prop_assume!(state.chat_run_id.as_deref() != Some(payload.run_id.as_str()));
        let before = snapshot(&state);

        let outcome = handle_chat_event(&mut state, Some(&payload));

        prop_assert_eq!(outcome, ChatEventOutcome::Ignored);
        prop_assert_eq!(snapshot(&state), before);
    }

    #[test]
    fn prop_foreign_final_keeps_tracking(mut state in arb_state(), mut payload in arb_payload()) {
        payload.session_key = state.session_key.clone();
        payload.state = ChatEventState::Final;
        prop_assume!(state.chat_run_id.as_deref() != Some(payload.run_id.as_str()));
        let before = snapshot(&state);

        let outcome = handle_chat_event(&mut state, Some(&payload));

        prop_assert_eq!(
            outcome,
            ChatEventOutcome::Final { run: RunMatch::Foreign, message: payload.message.clone() }
        );
        prop_assert_eq!(snapshot(&state), before);
    }

    #[test]
    fn prop_tracked_final_clears_tracking(mut state in arb_state(), mut payload in arb_payload()) {
        prop_assume!(state.chat_run_id.is_some());
        payload.session_key = state.session_key.clone();
        payload.run_id = state.chat_run_id.clone().unwrap_or_default();
        payload.state = ChatEventState::Final;
        let messages_before = state.chat_messages.clone();

        let outcome = handle_chat_event(&mut state, Some(&payload));

        prop_assert_eq!(outcome.as_token(), Some("final"));
        prop_assert_eq!(state.chat_run_id, None);
        prop_assert_eq!(state.chat_stream, None);
        prop_assert_eq!(state.chat_stream_started_at, None);
        prop_assert_eq!(state.chat_messages, messages_before);
    }

    #[test]
    fn prop_tracking_fields_stay_paired(
        mut state in arb_state(),
        payloads in proptest::collection::vec(arb_payload(), 0..10),
    ) {
        let tracked = state.chat_run_id.clone();
        for mut payload in payloads {
            // Bias toward events that actually target this session and run
            payload.session_key = state.session_key.clone();
            if let Some(run_id) = &tracked {
                if payload.run_id.ends_with('a') {
                    payload.run_id = run_id.clone();
                }
            }
            handle_chat_event(&mut state, Some(&payload));
            prop_assert_eq!(state.chat_run_id.is_some(), state.chat_stream.is_some());
            prop_assert_eq!(state.chat_run_id.is_some(), state.chat_stream_started_at.is_some());
        }
    }

    #[test]
    fn prop_outcome_matches_state_change(mut state in arb_state(), mut payload in arb_payload()) {
        payload.session_key = state.session_key.clone();
        if let Some(run_id) = &state.chat_run_id {
            payload.run_id = run_id.clone();
        }
        let before = snapshot(&state);

        let outcome = handle_chat_event(&mut state, Some(&payload));

        match outcome {
            ChatEventOutcome::Ignored => {
                prop_assert_eq!(snapshot(&state), before);
            }
            ChatEventOutcome::DeltaApplied => {
                prop_assert_ne!(snapshot(&state), before);
            }
            _ => {}
        }
    }

    #[test]
    fn prop_chat_messages_never_touched(
        mut state in arb_state(),
        payloads in proptest::collection::vec(arb_payload(), 0..10),
    ) {
        let before = state.chat_messages.clone();
        for payload in &payloads {
            handle_chat_event(&mut state, Some(payload));
        }
        prop_assert_eq!(state.chat_messages, before);
    }

    #[test]
    fn prop_reset_command_ignores_case_and_suffix(
        command in prop_oneof![Just("/new"), Just("/reset")],
        upper in any::<bool>(),
        suffix in proptest::option::of("[a-z ]{0,20}"),
    ) {
        let mut text = if upper { command.to_uppercase() } else { command.to_string() };
        if let Some(suffix) = suffix {
            text.push(' ');
            text.push_str(&suffix);
        }
        prop_assert!(is_session_reset_command(&text));
    }
}
