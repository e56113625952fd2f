//! chatgate - chat event reconciliation and provider payload normalization
//!
//! Client-side core for a conversational agent talking to a session gateway:
//! reconciles streamed `chat` events into per-session state, sends user input,
//! and converts conversations and tools into provider wire formats.

pub mod chat;
pub mod config;
pub mod gateway;
pub mod llm;
pub mod runtime;

pub use chat::{
    begin_send, finish_send, handle_chat_event, send_chat_message, ChatEventOutcome, ChatState,
    PendingSend, RunMatch,
};
pub use config::ClientConfig;
pub use gateway::{ChatAttachment, ChatEventPayload, ChatEventState, GatewayClient, GatewayError};
