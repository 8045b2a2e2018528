//! Final summary produced by the originating hop.

use serde::Serialize;
use serde_json::{json, Value};

use crate::relay::chain::HopChain;
use crate::relay::log::HopLog;

pub const PHASE_COMPLETED: &str = "completed-there-and-back";

#[derive(Debug, Clone, Serialize)]
pub struct Summary {
    pub phase: &'static str,
    pub hop_chain: String,
    pub hop_log: Vec<Value>,
    pub assistant_text: String,
    pub openrouter_response: Value,
}

impl Summary {
    /// Build the summary from the generation service's reply body.
    ///
    /// A body that is not JSON is kept as `{"raw": body}`.
    pub fn build(body: &[u8], chain: &HopChain, log: HopLog) -> Self {
        let text = String::from_utf8_lossy(body);
        let response = serde_json::from_str::<Value>(&text).unwrap_or_else(|_| json!({ "raw": text }));

        Self {
            phase: PHASE_COMPLETED,
            hop_chain: chain.as_str().to_string(),
            hop_log: log.into_records(),
            assistant_text: extract_assistant_text(&response),
            openrouter_response: response,
        }
    }

    pub fn to_json_pretty(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec_pretty(self)
    }
}

/// Assistant text from `choices[0].message.content`, or a placeholder.
pub fn extract_assistant_text(response: &Value) -> String {
    let Some(message) = response.pointer("/choices/0/message").filter(|m| !m.is_null()) else {
        return "(no assistant message found)".to_string();
    };

    match message.get("content") {
        None | Some(Value::Null) => "(no assistant content)".to_string(),
        Some(Value::String(s)) if s.is_empty() => "(no assistant content)".to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Array(parts)) => parts.iter().map(part_text).collect(),
        Some(content @ Value::Object(_)) => content.to_string(),
        Some(_) => "(unknown assistant format)".to_string(),
    }
}

fn part_text(part: &Value) -> &str {
    match part {
        Value::String(s) => s.as_str(),
        Value::Object(obj) => match (obj.get("text"), obj.get("type"), obj.get("value")) {
            (Some(Value::String(text)), _, _) => text.as_str(),
            (_, Some(Value::String(kind)), Some(Value::String(value))) if kind == "text" => {
                value.as_str()
            }
            _ => "",
        },
        _ => "",
    }
}
