//! Per-session chat state

use crate::gateway::{ChatAttachment, GatewayClient};
use crate::llm::Message;
use std::fmt;
use std::sync::Arc;

/// Chat state owned by one session view.
///
/// `chat_stream` is `Some` exactly when `chat_run_id` is `Some`: both are set
/// when a run starts streaming into this session and cleared together when
/// it ends.
#[derive(Clone, Default)]
pub struct ChatState {
    pub session_key: String,
    /// Run currently streaming into this session
    pub chat_run_id: Option<String>,
    /// Partial reply text for the tracked run
    pub chat_stream: Option<String>,
    /// Milliseconds since the epoch
    pub chat_stream_started_at: Option<i64>,
    /// Confirmed turns, oldest first
    pub chat_messages: Vec<Message>,
    /// Draft input
    pub chat_message: String,
    /// Attachments queued for the next send
    pub chat_attachments: Vec<ChatAttachment>,
    pub chat_sending: bool,
    pub chat_loading: bool,
    pub connected: bool,
    pub client: Option<Arc<dyn GatewayClient>>,
    pub last_error: Option<String>,
}

impl ChatState {
    pub fn new(session_key: impl Into<String>) -> Self {
        Self {
            session_key: session_key.into(),
            ..Self::default()
        }
    }

    /// Attach a gateway client and mark the session connected
    #[must_use]
    pub fn with_client(mut self, client: Arc<dyn GatewayClient>) -> Self {
        self.connected = client.is_connected();
        self.client = Some(client);
        self
    }

    /// Whether a run is currently streaming into this session
    pub fn is_streaming(&self) -> bool {
        self.chat_run_id.is_some()
    }

    pub(crate) fn start_run(&mut self, run_id: String, started_at: i64) {
        self.chat_run_id = Some(run_id);
        self.chat_stream = Some(String::new());
        self.chat_stream_started_at = Some(started_at);
    }

    pub(crate) fn clear_run(&mut self) {
        self.chat_run_id = None;
        self.chat_stream = None;
        self.chat_stream_started_at = None;
    }

    /// Client to use for a request, if the session can reach the gateway
    pub(crate) fn ready_client(&self) -> Option<Arc<dyn GatewayClient>> {
        if !self.connected {
            return None;
        }
        self.client.clone()
    }
}

impl fmt::Debug for ChatState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChatState")
            .field("session_key", &self.session_key)
            .field("chat_run_id", &self.chat_run_id)
            .field("chat_stream", &self.chat_stream)
            .field("chat_stream_started_at", &self.chat_stream_started_at)
            .field("chat_messages", &self.chat_messages.len())
            .field("chat_sending", &self.chat_sending)
            .field("chat_loading", &self.chat_loading)
            .field("connected", &self.connected)
            .field("has_client", &self.client.is_some())
            .field("last_error", &self.last_error)
            .finish_non_exhaustive()
    }
}
