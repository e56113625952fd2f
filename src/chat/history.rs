//! Chat history loading and run abort

use super::ChatState;
use crate::gateway::GatewayError;
use crate::llm::Message;
use serde::Deserialize;
use serde_json::json;

const HISTORY_LIMIT: u32 = 200;

#[derive(Debug, Deserialize)]
struct HistoryResponse {
    #[serde(default)]
    messages: Vec<Message>,
}

/// Replace `chat_messages` with the gateway's stored history.
///
/// Does nothing while offline. `chat_loading` is set for the duration of
/// the request.
pub async fn load_chat_history(state: &mut ChatState) -> Result<(), GatewayError> {
    let Some(client) = state.ready_client() else {
        return Ok(());
    };

    state.chat_loading = true;
    let result = client
        .request(
            "chat.history",
            json!({ "sessionKey": state.session_key, "limit": HISTORY_LIMIT }),
        )
        .await;
    state.chat_loading = false;

    let response: HistoryResponse = serde_json::from_value(result?)
        .map_err(|e| GatewayError::decode("chat.history", e.to_string()))?;
    tracing::debug!(
        session = %state.session_key,
        messages = response.messages.len(),
        "Loaded chat history"
    );
    state.chat_messages = response.messages;
    Ok(())
}

/// Ask the gateway to abort the session's current run.
///
/// Returns `false` without sending anything while offline. Tracking is left
/// for the resulting `aborted` event to clear.
pub async fn abort_chat_run(state: &ChatState) -> Result<bool, GatewayError> {
    let Some(client) = state.ready_client() else {
        return Ok(false);
    };

    let mut params = json!({ "sessionKey": state.session_key });
    if let Some(run_id) = &state.chat_run_id {
        params["runId"] = json!(run_id);
    }

    client.request("chat.abort", params).await?;
    Ok(true)
}
