//! Model identity and per-family conversion rules
//!
//! Several model families can sit behind the same wire API (a Claude model
//! served through a Gemini-shaped endpoint, for example). Conversion rules
//! are looked up by family rather than by API so the converter's control
//! flow does not change when a family is added.

use std::fmt;

/// Wire API a model is reached through
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Api {
    GoogleGenerativeAi,
    GoogleVertex,
    GoogleCloudCode,
}

impl Api {
    pub fn as_str(self) -> &'static str {
        match self {
            Api::GoogleGenerativeAi => "google-generative-ai",
            Api::GoogleVertex => "google-vertex",
            Api::GoogleCloudCode => "google-cloud-code",
        }
    }
}

/// Model family, derived from the model id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModelFamily {
    Gemini,
    Claude,
    Gpt,
    Other,
}

impl ModelFamily {
    pub fn from_model_id(id: &str) -> Self {
        let id = id.to_ascii_lowercase();
        let name = id.rsplit('/').next().unwrap_or(&id);
        if name.starts_with("gemini") {
            ModelFamily::Gemini
        } else if name.starts_with("claude") {
            ModelFamily::Claude
        } else if name.starts_with("gpt") {
            ModelFamily::Gpt
        } else {
            ModelFamily::Other
        }
    }
}

impl fmt::Display for ModelFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ModelFamily::Gemini => "gemini",
            ModelFamily::Claude => "claude",
            ModelFamily::Gpt => "gpt",
            ModelFamily::Other => "other",
        };
        f.write_str(name)
    }
}

/// How hidden reasoning from earlier turns is sent back to the provider
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReasoningReplay {
    /// Thinking parts are not sent at all
    Drop,
    /// Sent as a `thought` part carrying the original signature
    Signed,
    /// Sent as ordinary text
    AsText,
}

/// Conversion rules for one model family
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FamilyRules {
    pub reasoning: ReasoningReplay,
    /// Whether function calls and responses must carry the tool call id
    pub tool_call_ids: bool,
    /// Whether function calls are replayed with their thought signature
    pub call_signatures: bool,
}

const DEFAULT_RULES: FamilyRules = FamilyRules {
    reasoning: ReasoningReplay::AsText,
    tool_call_ids: false,
    call_signatures: false,
};

const FAMILY_RULES: &[(ModelFamily, FamilyRules)] = &[
    (
        ModelFamily::Gemini,
        FamilyRules {
            reasoning: ReasoningReplay::Drop,
            tool_call_ids: false,
            call_signatures: true,
        },
    ),
    (
        ModelFamily::Claude,
        FamilyRules {
            reasoning: ReasoningReplay::Signed,
            tool_call_ids: true,
            call_signatures: true,
        },
    ),
    (
        ModelFamily::Gpt,
        FamilyRules {
            reasoning: ReasoningReplay::AsText,
            tool_call_ids: true,
            call_signatures: false,
        },
    ),
];

/// Look up the rules for a family; unlisted families get the defaults
pub fn family_rules(family: ModelFamily) -> FamilyRules {
    FAMILY_RULES
        .iter()
        .find(|(f, _)| *f == family)
        .map_or(DEFAULT_RULES, |(_, rules)| *rules)
}

/// A concrete model reachable through a provider's API
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Model {
    /// Provider-facing model id (e.g., "gemini-2.5-pro")
    pub id: String,
    /// Provider name (e.g., "google")
    pub provider: String,
    pub api: Api,
}

impl Model {
    pub fn new(id: impl Into<String>, provider: impl Into<String>, api: Api) -> Self {
        Self {
            id: id.into(),
            provider: provider.into(),
            api,
        }
    }

    pub fn family(&self) -> ModelFamily {
        ModelFamily::from_model_id(&self.id)
    }

    pub fn rules(&self) -> FamilyRules {
        family_rules(self.family())
    }
}
