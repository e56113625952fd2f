//! Interactive add-credential flow
//!
//! Walks the user through provider, method and secret prompts. Storing the
//! resulting credential is left to the caller.

use super::Runtime;

const CANCELLED: &str = "Cancelled.";

/// Answer to one prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptResult<T> {
    Answered(T),
    Cancelled,
}

/// Source of interactive answers (terminal, scripted input, ...)
pub trait Prompter {
    /// Pick one of `options`; answers with its index
    fn select(&self, message: &str, options: &[&str]) -> PromptResult<usize>;

    /// Free-form text; `secret` input should not be echoed
    fn text(&self, message: &str, secret: bool) -> PromptResult<String>;
}

/// How a provider can be authenticated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMethod {
    ApiKey,
    Token,
}

impl AuthMethod {
    pub fn label(self) -> &'static str {
        match self {
            AuthMethod::ApiKey => "API key",
            AuthMethod::Token => "Setup token",
        }
    }

    fn prompt(self) -> &'static str {
        match self {
            AuthMethod::ApiKey => "Enter API key",
            AuthMethod::Token => "Paste token",
        }
    }
}

/// Provider offered by the flow
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthProviderOption {
    pub id: String,
    pub label: String,
    pub methods: Vec<AuthMethod>,
}

impl AuthProviderOption {
    pub fn new(id: impl Into<String>, label: impl Into<String>, methods: Vec<AuthMethod>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            methods,
        }
    }
}

/// Credential collected by the flow
#[derive(Clone, PartialEq, Eq)]
pub struct NewCredential {
    pub provider: String,
    pub method: AuthMethod,
    pub secret: String,
}

impl std::fmt::Debug for NewCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewCredential")
            .field("provider", &self.provider)
            .field("method", &self.method)
            .field("secret", &"<redacted>")
            .finish()
    }
}

/// Run the add-credential prompts.
///
/// Cancelling any prompt reports a single `Cancelled.` and stops; later
/// prompts are never shown. Returns `None` unless a non-empty secret was
/// entered.
pub fn add_credential(
    prompter: &dyn Prompter,
    runtime: &dyn Runtime,
    providers: &[AuthProviderOption],
) -> Option<NewCredential> {
    let usable: Vec<&AuthProviderOption> =
        providers.iter().filter(|p| !p.methods.is_empty()).collect();
    if usable.is_empty() {
        runtime.error("No providers available.");
        return None;
    }

    let labels: Vec<&str> = usable.iter().map(|p| p.label.as_str()).collect();
    let PromptResult::Answered(index) = prompter.select("Select provider", &labels) else {
        runtime.log(CANCELLED);
        return None;
    };
    let Some(provider) = usable.get(index) else {
        runtime.error("Invalid provider selection.");
        return None;
    };

    let method = if let [only] = provider.methods.as_slice() {
        *only
    } else {
        let labels: Vec<&str> = provider.methods.iter().map(|m| m.label()).collect();
        let PromptResult::Answered(index) = prompter.select("Select auth method", &labels) else {
            runtime.log(CANCELLED);
            return None;
        };
        let Some(method) = provider.methods.get(index) else {
            runtime.error("Invalid auth method selection.");
            return None;
        };
        *method
    };

    let PromptResult::Answered(secret) = prompter.text(method.prompt(), true) else {
        runtime.log(CANCELLED);
        return None;
    };

    let secret = secret.trim();
    if secret.is_empty() {
        runtime.error("Credential must not be empty.");
        return None;
    }

    tracing::debug!(provider = %provider.id, method = ?method, "Collected credential");
    Some(NewCredential {
        provider: provider.id.clone(),
        method,
        secret: secret.to_string(),
    })
}
