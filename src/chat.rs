//! Chat session state and gateway event handling
//!
//! Events flow in through [`handle_chat_event`]; user input flows out
//! through [`begin_send`] and [`finish_send`]. Both mutate one session's
//! [`ChatState`] on a single task, so no locking is involved. The gateway
//! round trip in between holds no borrow of the state.

mod history;
mod reconcile;
mod send;
mod state;

#[cfg(test)]
mod proptests;

pub use history::{abort_chat_run, load_chat_history};
pub use reconcile::{handle_chat_event, ChatEventOutcome, RunMatch};
pub use send::{begin_send, finish_send, is_session_reset_command, send_chat_message, PendingSend};
pub use state::ChatState;
