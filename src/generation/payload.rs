//! Translation from an inbound conversation payload to a completion request.
//!
//! Accepted payload shapes, in order of preference:
//!
//! ```text
//! {"messages": [{"role": "user", "content": "..." | [parts]}], ...}
//! {"system_prompt": "...", "user_messages": ["...", {"content": "..."}]}
//! anything else → default system prompt + raw body as the user message
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Generation parameters copied verbatim from the payload when present.
pub const PASSTHROUGH_KEYS: &[&str] = &[
    "response_format",
    "stop",
    "stream",
    "max_tokens",
    "temperature",
    "tools",
    "tool_choice",
    "seed",
    "top_p",
    "top_k",
    "frequency_penalty",
    "presence_penalty",
    "repetition_penalty",
    "logit_bias",
    "top_logprobs",
    "min_p",
    "top_a",
    "prediction",
    "transforms",
    "models",
    "route",
    "provider",
    "user",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: content.into(),
        }
    }
}

/// Body sent to the generation service.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    #[serde(flatten)]
    pub params: Map<String, Value>,
}

impl GenerationRequest {
    /// Assemble a request from a raw relay body.
    pub fn from_body(body: &[u8], default_model: &str, system_prompt: &str) -> Self {
        let text = String::from_utf8_lossy(body);
        let payload = serde_json::from_str::<Value>(&text)
            .ok()
            .and_then(|value| match value {
                Value::Object(map) => Some(map),
                _ => None,
            });

        let messages = payload
            .as_ref()
            .and_then(extract_messages)
            .unwrap_or_else(|| fallback_messages(&text, system_prompt));

        let model = payload
            .as_ref()
            .and_then(|p| p.get("model"))
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .unwrap_or(default_model)
            .to_string();

        let params = payload
            .as_ref()
            .map(|p| {
                PASSTHROUGH_KEYS
                    .iter()
                    .filter_map(|key| p.get(*key).map(|v| (key.to_string(), v.clone())))
                    .collect()
            })
            .unwrap_or_default();

        Self {
            model,
            messages,
            params,
        }
    }
}

/// Pull a message list out of a structured payload.
///
/// Returns `None` when neither structured form yields a message.
pub fn extract_messages(payload: &Map<String, Value>) -> Option<Vec<ChatMessage>> {
    if let Some(Value::Array(entries)) = payload.get("messages") {
        let messages: Vec<_> = entries.iter().filter_map(normalize_message).collect();
        if !messages.is_empty() {
            return Some(messages);
        }
    }

    let system_prompt = ["system_prompt", "systemPrompt"]
        .iter()
        .find_map(|key| payload.get(*key).and_then(Value::as_str));

    let users: Vec<&str> = ["user_messages", "userMessages"]
        .iter()
        .find_map(|key| payload.get(*key).and_then(Value::as_array))
        .map(|entries| {
            entries
                .iter()
                .filter_map(|entry| match entry {
                    Value::String(s) => Some(s.as_str()),
                    Value::Object(obj) => obj.get("content").and_then(Value::as_str),
                    _ => None,
                })
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .collect()
        })
        .unwrap_or_default();

    let mut messages = Vec::with_capacity(users.len() + 1);
    if let Some(prompt) = system_prompt.map(str::trim).filter(|p| !p.is_empty()) {
        messages.push(ChatMessage::new("system", prompt));
    }
    messages.extend(users.into_iter().map(|content| ChatMessage::new("user", content)));

    if messages.is_empty() {
        None
    } else {
        Some(messages)
    }
}

/// Normalize one entry of a `messages` array to `{role, content}`.
pub fn normalize_message(entry: &Value) -> Option<ChatMessage> {
    let obj = entry.as_object()?;
    let role = obj
        .get("role")
        .and_then(Value::as_str)
        .map(|r| r.trim().to_lowercase())
        .filter(|r| !r.is_empty())?;
    let content = flatten_content(obj.get("content")?)?;
    let content = content.trim();
    if content.is_empty() {
        return None;
    }
    Some(ChatMessage::new(role, content))
}

fn flatten_content(content: &Value) -> Option<String> {
    match content {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Array(parts) => Some(
            parts
                .iter()
                .map(|part| match part {
                    Value::String(s) => s.as_str(),
                    Value::Object(obj) => obj.get("text").and_then(Value::as_str).unwrap_or(""),
                    _ => "",
                })
                .collect(),
        ),
        other => Some(other.to_string()),
    }
}

fn fallback_messages(body: &str, system_prompt: &str) -> Vec<ChatMessage> {
    let body = body.trim();
    let user = if body.is_empty() { system_prompt } else { body };
    vec![
        ChatMessage::new("system", system_prompt),
        ChatMessage::new("user", user),
    ]
}
