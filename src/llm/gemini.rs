//! Gemini wire format conversion
//!
//! Translates provider-agnostic [`Context`]s into `generateContent` request
//! bodies and normalizes responses back into [`AssistantTurn`]s. Several model
//! families share this wire shape, so per-family behavior comes from
//! [`Model::rules`].

use super::models::{Model, ReasoningReplay};
use super::schema::sanitize_schema;
use super::types::{
    AssistantTurn, ContentPart, Context, Message, Role, StopReason, Tool, Usage,
};
use super::LlmError;
use serde::{Deserialize, Serialize};
use serde_json::json;

/// Convert the conversation into Gemini `contents`.
///
/// Produces at most one entry per message, in input order. Messages that
/// convert to no parts at all are omitted.
pub fn convert_messages(model: &Model, context: &Context) -> Vec<GeminiContent> {
    context
        .messages
        .iter()
        .filter_map(|msg| {
            let content = convert_message(model, msg);
            if content.is_none() {
                tracing::trace!(model = %model.id, role = ?msg.role, "Message has no parts for provider");
            }
            content
        })
        .collect()
}

fn convert_message(model: &Model, msg: &Message) -> Option<GeminiContent> {
    let rules = model.rules();
    let role = match msg.role {
        Role::User | Role::ToolResult => "user",
        Role::Assistant => "model",
    };

    let parts: Vec<GeminiPart> = msg
        .content
        .iter()
        .filter_map(|part| match part {
            ContentPart::Text { text } => {
                if text.trim().is_empty() {
                    None
                } else {
                    Some(GeminiPart::text(text.clone()))
                }
            }
            ContentPart::Thinking {
                thinking,
                thinking_signature,
            } => {
                if thinking.trim().is_empty() {
                    return None;
                }
                match rules.reasoning {
                    ReasoningReplay::Drop => None,
                    ReasoningReplay::Signed => Some(GeminiPart::thought(
                        thinking.clone(),
                        thinking_signature.clone(),
                    )),
                    ReasoningReplay::AsText => Some(GeminiPart::text(thinking.clone())),
                }
            }
            ContentPart::Image { data, mime_type } => Some(GeminiPart {
                inline_data: Some(GeminiBlob {
                    mime_type: mime_type.clone(),
                    data: data.clone(),
                }),
                ..GeminiPart::default()
            }),
            ContentPart::ToolCall {
                id,
                name,
                arguments,
                thought_signature,
            } => Some(GeminiPart {
                function_call: Some(GeminiFunctionCall {
                    name: name.clone(),
                    args: arguments.clone(),
                    id: rules.tool_call_ids.then(|| id.clone()),
                }),
                thought_signature: thought_signature
                    .clone()
                    .filter(|_| rules.call_signatures),
                ..GeminiPart::default()
            }),
            ContentPart::ToolResult {
                tool_call_id,
                tool_name,
                content,
                is_error,
            } => {
                let response = if *is_error {
                    json!({ "error": content })
                } else {
                    json!({ "output": content })
                };
                Some(GeminiPart {
                    function_response: Some(GeminiFunctionResponse {
                        name: tool_name.clone(),
                        response,
                        id: rules.tool_call_ids.then(|| tool_call_id.clone()),
                    }),
                    ..GeminiPart::default()
                })
            }
        })
        .collect();

    if parts.is_empty() {
        return None;
    }

    Some(GeminiContent {
        role: Some(role.to_string()),
        parts,
    })
}

/// Convert tools into a single function declaration block.
///
/// Parameter schemas are sanitized. Returns `None` when there are no tools,
/// since the API rejects an empty declaration list.
pub fn convert_tools(tools: &[Tool]) -> Option<Vec<GeminiTool>> {
    if tools.is_empty() {
        return None;
    }

    Some(vec![GeminiTool {
        function_declarations: tools
            .iter()
            .map(|t| GeminiFunctionDeclaration {
                name: t.name.clone(),
                description: t.description.clone(),
                parameters: sanitize_schema(&t.parameters),
            })
            .collect(),
    }])
}

/// Build a full `generateContent` request body
pub fn build_request(model: &Model, context: &Context, max_tokens: Option<u32>) -> GeminiRequest {
    let system_instruction = context
        .system_prompt
        .as_ref()
        .filter(|prompt| !prompt.trim().is_empty())
        .map(|prompt| GeminiContent {
            role: None,
            parts: vec![GeminiPart::text(prompt.clone())],
        });

    GeminiRequest {
        contents: convert_messages(model, context),
        system_instruction,
        tools: convert_tools(&context.tools),
        generation_config: max_tokens.map(|tokens| GeminiGenerationConfig {
            max_output_tokens: Some(tokens),
            temperature: None,
        }),
    }
}

/// Normalize a response into an assistant turn
pub fn normalize_response(resp: GeminiResponse) -> Result<AssistantTurn, LlmError> {
    let Some(candidate) = resp.candidates.into_iter().next() else {
        if let Some(reason) = resp.prompt_feedback.and_then(|f| f.block_reason) {
            return Err(LlmError::blocked(format!("Prompt blocked: {reason}")));
        }
        return Err(LlmError::invalid_response("No candidates in response"));
    };

    let mut content = Vec::new();
    let mut call_index = 0usize;

    for part in candidate.content.map(|c| c.parts).unwrap_or_default() {
        if let Some(call) = part.function_call {
            let id = call.id.unwrap_or_else(|| format!("call_{}_{call_index}", call.name));
            call_index += 1;
            content.push(ContentPart::ToolCall {
                id,
                name: call.name,
                arguments: call.args,
                thought_signature: part.thought_signature,
            });
        } else if let Some(text) = part.text {
            if part.thought == Some(true) {
                content.push(ContentPart::Thinking {
                    thinking: text,
                    thinking_signature: part.thought_signature,
                });
            } else if !text.is_empty() {
                content.push(ContentPart::Text { text });
            }
        }
    }

    let has_tool_calls = call_index > 0;
    let stop_reason = match candidate.finish_reason.as_deref() {
        Some("STOP") if has_tool_calls => StopReason::ToolUse,
        Some("STOP") => StopReason::EndTurn,
        Some("MAX_TOKENS") => StopReason::MaxTokens,
        Some("SAFETY" | "RECITATION" | "BLOCKLIST" | "PROHIBITED_CONTENT" | "SPII") => {
            StopReason::Safety
        }
        _ if has_tool_calls => StopReason::ToolUse,
        _ => StopReason::Other,
    };

    let usage = resp.usage_metadata.map_or_else(Usage::default, |u| Usage {
        input_tokens: u.prompt_token_count,
        output_tokens: u.candidates_token_count,
        cache_read_tokens: u.cached_content_token_count,
    });

    Ok(AssistantTurn {
        content,
        stop_reason,
        usage,
    })
}

// Gemini API types

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiRequest {
    pub contents: Vec<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<GeminiTool>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GeminiGenerationConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeminiContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<GeminiPart>,
}

/// One Gemini content part; exactly one payload field is set
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiPart {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thought: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thought_signature: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inline_data: Option<GeminiBlob>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function_call: Option<GeminiFunctionCall>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function_response: Option<GeminiFunctionResponse>,
}

impl GeminiPart {
    pub fn text(text: String) -> Self {
        Self {
            text: Some(text),
            ..Self::default()
        }
    }

    pub fn thought(text: String, signature: Option<String>) -> Self {
        Self {
            text: Some(text),
            thought: Some(true),
            thought_signature: signature,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiBlob {
    pub mime_type: String,
    pub data: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeminiFunctionCall {
    pub name: String,
    #[serde(default)]
    pub args: serde_json::Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeminiFunctionResponse {
    pub name: String,
    pub response: serde_json::Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiTool {
    pub function_declarations: Vec<GeminiFunctionDeclaration>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeminiFunctionDeclaration {
    pub name: String,
    pub description: String,
    pub parameters: serde_json::Value,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiGenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiResponse {
    #[serde(default)]
    pub candidates: Vec<GeminiCandidate>,
    #[serde(default)]
    pub usage_metadata: Option<GeminiUsageMetadata>,
    #[serde(default)]
    pub prompt_feedback: Option<GeminiPromptFeedback>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiCandidate {
    #[serde(default)]
    pub content: Option<GeminiContent>,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiUsageMetadata {
    #[serde(default)]
    pub prompt_token_count: u64,
    #[serde(default)]
    pub candidates_token_count: u64,
    #[serde(default)]
    pub cached_content_token_count: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiPromptFeedback {
    #[serde(default)]
    pub block_reason: Option<String>,
}
