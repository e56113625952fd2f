//! Session gateway interface
//!
//! The gateway transport lives outside this crate. The chat layer only needs
//! a request/response call and the push events described here.

use crate::llm::Message;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;

/// Errors surfaced by a gateway client
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GatewayError {
    #[error("gateway not connected")]
    NotConnected,
    #[error("{method} failed: {message}")]
    Request { method: String, message: String },
    #[error("invalid {method} response: {message}")]
    Decode { method: String, message: String },
}

impl GatewayError {
    pub fn request(method: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Request {
            method: method.into(),
            message: message.into(),
        }
    }

    pub fn decode(method: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decode {
            method: method.into(),
            message: message.into(),
        }
    }
}

/// Request/response client for the session gateway
#[async_trait]
pub trait GatewayClient: Send + Sync {
    /// Issue one request and wait for its response payload
    async fn request(&self, method: &str, params: Value) -> Result<Value, GatewayError>;

    /// Whether the underlying connection is currently up
    fn is_connected(&self) -> bool;
}

#[async_trait]
impl<T: GatewayClient + ?Sized> GatewayClient for Arc<T> {
    async fn request(&self, method: &str, params: Value) -> Result<Value, GatewayError> {
        (**self).request(method, params).await
    }

    fn is_connected(&self) -> bool {
        (**self).is_connected()
    }
}

/// Lifecycle marker carried by a chat event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatEventState {
    Delta,
    Final,
    Aborted,
    Error,
    /// Any state this client does not understand
    #[serde(other)]
    Unknown,
}

/// One `chat` push event from the gateway
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatEventPayload {
    pub run_id: String,
    pub session_key: String,
    pub state: ChatEventState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<Message>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl ChatEventPayload {
    pub fn new(
        run_id: impl Into<String>,
        session_key: impl Into<String>,
        state: ChatEventState,
    ) -> Self {
        Self {
            run_id: run_id.into(),
            session_key: session_key.into(),
            state,
            message: None,
            error_message: None,
        }
    }

    #[must_use]
    pub fn with_message(mut self, message: Message) -> Self {
        self.message = Some(message);
        self
    }

    #[must_use]
    pub fn with_error_message(mut self, message: impl Into<String>) -> Self {
        self.error_message = Some(message.into());
        self
    }
}

/// Image attachment sent alongside a chat message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatAttachment {
    pub mime_type: String,
    /// Base64 payload without a data URL prefix
    pub content: String,
}

impl ChatAttachment {
    pub fn new(mime_type: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            mime_type: mime_type.into(),
            content: content.into(),
        }
    }

    /// Parse a `data:<mime>;base64,<payload>` URL
    pub fn from_data_url(url: &str) -> Option<Self> {
        let rest = url.strip_prefix("data:")?;
        let (mime_type, content) = rest.split_once(";base64,")?;
        if mime_type.is_empty() || content.is_empty() {
            return None;
        }
        Some(Self::new(mime_type, content))
    }
}
