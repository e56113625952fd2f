//! Provider schema normalization
//!
//! Provider-agnostic conversation types and their translation into the
//! Gemini wire format shared by several model families.

mod error;
pub mod gemini;
mod models;
mod schema;
mod types;

#[cfg(test)]
mod proptests;

pub use error::{LlmError, LlmErrorKind};
pub use gemini::{build_request, convert_messages, convert_tools, normalize_response};
pub use models::{family_rules, Api, FamilyRules, Model, ModelFamily, ReasoningReplay};
pub use schema::sanitize_schema;
pub use types::*;
