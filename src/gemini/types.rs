//! Wire types for `models/{model}:streamGenerateContent`.

use crate::session::{Role, Turn};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Tool {
    GoogleSearch,
}

impl Tool {
    fn to_value(self) -> Value {
        match self {
            Self::GoogleSearch => json!({ "googleSearch": {} }),
        }
    }
}

/// Per-request configuration: system instruction plus enabled tools.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationConfig {
    pub system_instruction: String,
    pub tools: BTreeSet<Tool>,
}

impl GenerationConfig {
    pub fn new(system_instruction: impl Into<String>) -> Self {
        Self {
            system_instruction: system_instruction.into(),
            tools: BTreeSet::from([Tool::GoogleSearch]),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<Part>,
}

impl From<&Turn> for Content {
    fn from(turn: &Turn) -> Self {
        let role = match turn.role {
            Role::User => "user",
            Role::Model => "model",
        };
        Self {
            role: Some(role.to_string()),
            parts: vec![Part {
                text: Some(turn.text.clone()),
            }],
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    pub system_instruction: Content,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<Value>,
}

impl GenerateContentRequest {
    pub fn new(history: &[Turn], config: &GenerationConfig) -> Self {
        Self {
            contents: history.iter().map(Content::from).collect(),
            system_instruction: Content {
                role: None,
                parts: vec![Part {
                    text: Some(config.system_instruction.clone()),
                }],
            },
            tools: config.tools.iter().map(|tool| tool.to_value()).collect(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<Content>,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiError {
    #[serde(default)]
    pub code: Option<u16>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentChunk {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    #[serde(default)]
    pub error: Option<ApiError>,
}

impl GenerateContentChunk {
    /// Concatenated text of the first candidate; empty when the chunk only
    /// carries metadata.
    pub fn text(&self) -> String {
        self.candidates
            .first()
            .and_then(|candidate| candidate.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter_map(|part| part.text.as_deref())
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn request_serializes_history_instruction_and_tools() {
        let history = vec![Turn::user("make a clock"), Turn::model("ok")];
        let request = GenerateContentRequest::new(&history, &GenerationConfig::new("be brief"));
        let value = serde_json::to_value(&request).expect("request should serialize");

        assert_eq!(
            value,
            json!({
                "contents": [
                    {"role": "user", "parts": [{"text": "make a clock"}]},
                    {"role": "model", "parts": [{"text": "ok"}]}
                ],
                "systemInstruction": {"parts": [{"text": "be brief"}]},
                "tools": [{"googleSearch": {}}]
            })
        );
    }

    #[test]
    fn tools_are_omitted_when_empty() {
        let mut config = GenerationConfig::new("x");
        config.tools.clear();
        let value = serde_json::to_value(GenerateContentRequest::new(&[], &config))
            .expect("request should serialize");
        assert!(value.get("tools").is_none());
    }

    #[test]
    fn chunk_text_joins_parts_of_first_candidate() {
        let chunk: GenerateContentChunk = serde_json::from_str(
            r#"{"candidates":[{"content":{"role":"model","parts":[{"text":"Hel"},{"text":"lo"}]}}],"usageMetadata":{}}"#,
        )
        .expect("chunk should parse");
        assert_eq!(chunk.text(), "Hello");
    }

    #[test]
    fn metadata_only_chunk_has_empty_text() {
        let chunk: GenerateContentChunk =
            serde_json::from_str(r#"{"candidates":[{"finishReason":"STOP"}]}"#)
                .expect("chunk should parse");
        assert_eq!(chunk.text(), "");
        assert_eq!(chunk.candidates[0].finish_reason.as_deref(), Some("STOP"));
    }

    #[test]
    fn error_payload_is_parsed() {
        let chunk: GenerateContentChunk =
            serde_json::from_str(r#"{"error":{"code":429,"message":"quota","status":"RESOURCE_EXHAUSTED"}}"#)
                .expect("chunk should parse");
        let error = chunk.error.expect("error should be present");
        assert_eq!(error.code, Some(429));
        assert_eq!(error.message.as_deref(), Some("quota"));
    }
}
