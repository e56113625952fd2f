//! Chat event reconciliation
//!
//! Decides, for each gateway `chat` event, whether this session's state
//! changes. Several runs can target one session (a sub-agent announcing its
//! result while the user's own run is still streaming), so every event is
//! checked against both the session key and the tracked run id.

use super::ChatState;
use crate::gateway::{ChatEventPayload, ChatEventState};
use crate::llm::Message;

const DEFAULT_ERROR_MESSAGE: &str = "chat error";

/// Whether an event belongs to the run this session is tracking
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMatch {
    Tracked,
    Foreign,
}

/// What the caller should do after an event was reconciled
#[derive(Debug, Clone, PartialEq)]
pub enum ChatEventOutcome {
    /// Nothing changed
    Ignored,
    /// The tracked run's stream was replaced by a newer snapshot
    DeltaApplied,
    /// A run finished. For a foreign run tracking is left alone and the
    /// message, if any, is the caller's to place.
    Final {
        run: RunMatch,
        message: Option<Message>,
    },
    /// The tracked run was aborted
    Aborted,
    /// The tracked run failed; `last_error` was set
    Error { message: String },
}

impl ChatEventOutcome {
    /// Wire-style classification token for rendering layers
    pub fn as_token(&self) -> Option<&'static str> {
        match self {
            ChatEventOutcome::Ignored => None,
            ChatEventOutcome::DeltaApplied => Some("delta"),
            ChatEventOutcome::Final { .. } => Some("final"),
            ChatEventOutcome::Aborted => Some("aborted"),
            ChatEventOutcome::Error { .. } => Some("error"),
        }
    }

    pub fn is_ignored(&self) -> bool {
        matches!(self, ChatEventOutcome::Ignored)
    }
}

/// Apply one gateway event to the session state.
///
/// Only events for this session's tracked run mutate tracking fields. A
/// `final` from any other run is still reported so the caller can refresh
/// or append the announcement. `chat_messages` is never touched here.
pub fn handle_chat_event(
    state: &mut ChatState,
    payload: Option<&ChatEventPayload>,
) -> ChatEventOutcome {
    let Some(payload) = payload else {
        return ChatEventOutcome::Ignored;
    };

    if payload.session_key != state.session_key {
        tracing::trace!(
            session = %state.session_key,
            event_session = %payload.session_key,
            "Ignoring chat event for another session"
        );
        return ChatEventOutcome::Ignored;
    }

    let run = if state.chat_run_id.as_deref() == Some(payload.run_id.as_str()) {
        RunMatch::Tracked
    } else {
        RunMatch::Foreign
    };

    match (payload.state, run) {
        (ChatEventState::Final, RunMatch::Foreign) => {
            tracing::debug!(
                session = %state.session_key,
                run_id = %payload.run_id,
                tracked = ?state.chat_run_id,
                "Final event from untracked run"
            );
            ChatEventOutcome::Final {
                run,
                message: payload.message.clone(),
            }
        }

        (ChatEventState::Final, RunMatch::Tracked) => {
            state.clear_run();
            ChatEventOutcome::Final {
                run,
                message: payload.message.clone(),
            }
        }

        (ChatEventState::Delta, RunMatch::Tracked) => {
            if apply_delta(state, payload.message.as_ref()) {
                ChatEventOutcome::DeltaApplied
            } else {
                ChatEventOutcome::Ignored
            }
        }

        (ChatEventState::Aborted, RunMatch::Tracked) => {
            state.clear_run();
            ChatEventOutcome::Aborted
        }

        (ChatEventState::Error, RunMatch::Tracked) => {
            let message = payload
                .error_message
                .clone()
                .unwrap_or_else(|| DEFAULT_ERROR_MESSAGE.to_string());
            tracing::warn!(
                session = %state.session_key,
                run_id = %payload.run_id,
                error = %message,
                "Chat run failed"
            );
            state.clear_run();
            state.last_error = Some(message.clone());
            ChatEventOutcome::Error { message }
        }

        (ChatEventState::Delta | ChatEventState::Aborted | ChatEventState::Error, RunMatch::Foreign)
        | (ChatEventState::Unknown, _) => ChatEventOutcome::Ignored,
    }
}

/// Delta messages carry the reply accumulated so far. A snapshot shorter
/// than what is already shown arrived out of order and is dropped.
///
/// Returns whether the stream changed.
fn apply_delta(state: &mut ChatState, message: Option<&Message>) -> bool {
    let Some(next) = message.and_then(Message::text) else {
        return false;
    };

    let current = state.chat_stream.as_deref().unwrap_or_default();
    if next.len() < current.len() || next == current {
        return false;
    }
    state.chat_stream = Some(next);
    true
}
