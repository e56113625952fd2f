//! Environment configuration

use crate::llm::{Api, Model};

const DEFAULT_SESSION_KEY: &str = "main";
const DEFAULT_MODEL: &str = "gemini-2.5-pro";
const DEFAULT_PROVIDER: &str = "google";

/// Client configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Session the client reconciles events for
    pub session_key: String,
    /// Model id used when building provider payloads
    pub model: String,
    pub provider: String,
    /// Emit logs as JSON lines
    pub log_json: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            session_key: DEFAULT_SESSION_KEY.to_string(),
            model: DEFAULT_MODEL.to_string(),
            provider: DEFAULT_PROVIDER.to_string(),
            log_json: false,
        }
    }
}

impl ClientConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup; blank values fall back to defaults
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        Self {
            session_key: get("CHATGATE_SESSION_KEY").unwrap_or(defaults.session_key),
            model: get("CHATGATE_MODEL").unwrap_or(defaults.model),
            provider: get("CHATGATE_PROVIDER").unwrap_or(defaults.provider),
            log_json: get("CHATGATE_LOG_JSON")
                .is_some_and(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes")),
        }
    }

    /// Model descriptor for payload conversion
    pub fn model(&self) -> Model {
        let api = match self.provider.as_str() {
            "google-vertex" => Api::GoogleVertex,
            "google-gemini-cli" | "google-antigravity" => Api::GoogleCloudCode,
            _ => Api::GoogleGenerativeAi,
        };
        Model::new(self.model.clone(), self.provider.clone(), api)
    }
}
