//! Outbound chat messages
//!
//! A send happens in three steps so the session stays readable while the
//! request is in flight: [`begin_send`] applies the optimistic changes,
//! [`PendingSend::dispatch`] talks to the gateway without borrowing the
//! state, and [`finish_send`] reconciles the acknowledgement. Events for the
//! new run can be handled between the last two.

use super::ChatState;
use crate::gateway::{ChatAttachment, GatewayClient, GatewayError};
use crate::llm::{ContentPart, Message, Role};
use serde_json::{json, Value};
use std::sync::Arc;

const SESSION_RESET_COMMANDS: &[&str] = &["/new", "/reset"];

/// Whether `text` asks the gateway to start a fresh session.
///
/// Matches `/new` or `/reset` alone or followed by a space, ignoring case
/// and surrounding whitespace.
pub fn is_session_reset_command(text: &str) -> bool {
    let normalized = text.trim().to_lowercase();
    SESSION_RESET_COMMANDS.iter().any(|cmd| {
        normalized == *cmd
            || normalized
                .strip_prefix(*cmd)
                .is_some_and(|rest| rest.starts_with(' '))
    })
}

/// A `chat.send` request prepared by [`begin_send`]
pub struct PendingSend {
    run_id: String,
    client: Arc<dyn GatewayClient>,
    params: Value,
}

impl PendingSend {
    /// Run id the gateway will stream the reply under
    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    pub fn params(&self) -> &Value {
        &self.params
    }

    /// Issue the request
    pub async fn dispatch(&self) -> Result<Value, GatewayError> {
        self.client.request("chat.send", self.params.clone()).await
    }
}

impl std::fmt::Debug for PendingSend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PendingSend")
            .field("run_id", &self.run_id)
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

/// Apply the optimistic side of a send and prepare the request.
///
/// Conversational text is appended to `chat_messages`; reset commands get no
/// local entry. A fresh run id becomes the tracked run either way and
/// queued attachments are drained. Returns `None`, touching nothing, when
/// the session is offline or there is nothing to send.
#[must_use]
pub fn begin_send(state: &mut ChatState, text: &str) -> Option<PendingSend> {
    let Some(client) = state.ready_client() else {
        tracing::debug!(session = %state.session_key, "Not connected, dropping chat message");
        return None;
    };

    let message = text.trim();
    if message.is_empty() && state.chat_attachments.is_empty() {
        return None;
    }

    let now = chrono::Utc::now().timestamp_millis();
    let attachments = std::mem::take(&mut state.chat_attachments);
    let is_command = is_session_reset_command(message);

    if !is_command {
        let content = user_content(message, &attachments);
        state
            .chat_messages
            .push(Message::new(Role::User, content).with_timestamp(now));
    }

    let run_id = uuid::Uuid::new_v4().to_string();
    state.chat_sending = true;
    state.last_error = None;
    state.start_run(run_id.clone(), now);

    tracing::debug!(
        session = %state.session_key,
        run_id = %run_id,
        reset = is_command,
        attachments = attachments.len(),
        "Sending chat message"
    );

    Some(PendingSend {
        params: send_params(&state.session_key, message, &run_id, &attachments),
        run_id,
        client,
    })
}

/// Reconcile the gateway's answer to the send for `run_id`.
///
/// `chat_sending` is reset unless a newer send owns the session. On failure
/// tracking is cleared only if `run_id` is still the tracked run; the
/// optimistic message is left in place.
///
/// # Errors
///
/// Returns the gateway error from `result`.
pub fn finish_send(
    state: &mut ChatState,
    run_id: &str,
    result: Result<Value, GatewayError>,
) -> Result<String, GatewayError> {
    let tracked = state.chat_run_id.as_deref() == Some(run_id);
    if tracked || state.chat_run_id.is_none() {
        state.chat_sending = false;
    }

    match result {
        Ok(_) => Ok(run_id.to_string()),
        Err(e) => {
            tracing::warn!(session = %state.session_key, run_id = %run_id, error = %e, "chat.send failed");
            if tracked {
                state.clear_run();
            }
            Err(e)
        }
    }
}

/// Send `text` as a `chat.send` request and wait for the acknowledgement.
///
/// Shorthand for [`begin_send`], [`PendingSend::dispatch`] and
/// [`finish_send`] for callers that do not need the state while the request
/// is in flight. Returns the run id, or `Ok(None)` when nothing was sent.
///
/// # Errors
///
/// Returns the gateway error when the request fails.
pub async fn send_chat_message(
    state: &mut ChatState,
    text: &str,
) -> Result<Option<String>, GatewayError> {
    let Some(pending) = begin_send(state, text) else {
        return Ok(None);
    };
    let result = pending.dispatch().await;
    finish_send(state, pending.run_id(), result).map(Some)
}

fn user_content(text: &str, attachments: &[ChatAttachment]) -> Vec<ContentPart> {
    let mut content = Vec::with_capacity(attachments.len() + 1);
    if !text.is_empty() {
        content.push(ContentPart::text(text));
    }
    content.extend(attachments.iter().map(|a| ContentPart::Image {
        data: a.content.clone(),
        mime_type: a.mime_type.clone(),
    }));
    content
}

fn send_params(
    session_key: &str,
    message: &str,
    run_id: &str,
    attachments: &[ChatAttachment],
) -> Value {
    let mut params = json!({
        "sessionKey": session_key,
        "message": message,
        "deliver": false,
        "idempotencyKey": run_id,
    });

    if !attachments.is_empty() {
        let attachments: Vec<Value> = attachments
            .iter()
            .map(|a| {
                json!({
                    "type": "image",
                    "mimeType": a.mime_type,
                    "content": a.content,
                })
            })
            .collect();
        params["attachments"] = Value::Array(attachments);
    }

    params
}
