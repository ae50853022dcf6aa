//! AI completion contract.
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{CollabError, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionRequest {
    pub prompt: String,
    /// Provider-specific model name; the client picks its default when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_hint: Option<String>,
}

impl CompletionRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            model_hint: None,
        }
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model_hint = Some(model.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "content", rename_all = "snake_case")]
pub enum Completion {
    Text(String),
    Structured(Value),
}

impl Completion {
    /// Structured payload, parsing a text completion as JSON when needed.
    pub fn into_structured(self) -> Result<Value> {
        match self {
            Completion::Structured(value) => Ok(value),
            Completion::Text(text) => {
                let trimmed = strip_code_fence(&text);
                serde_json::from_str(trimmed).map_err(CollabError::from)
            }
        }
    }
}

fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|rest| rest.strip_suffix("```"))
        .map(str::trim)
        .unwrap_or(trimmed)
}

#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, request: CompletionRequest) -> Result<Completion>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_text_completion_parses_fenced_json() {
        let completion = Completion::Text("```json\n{\"drivers\": 3}\n```".to_string());
        assert_eq!(completion.into_structured().unwrap(), json!({ "drivers": 3 }));
    }

    #[test]
    fn test_plain_text_is_not_structured() {
        let completion = Completion::Text("sem json aqui".to_string());
        assert!(matches!(
            completion.into_structured(),
            Err(CollabError::InvalidResponse(_))
        ));
    }

    #[test]
    fn test_request_builder() {
        let request = CompletionRequest::new("Analise o avatar").model("gemini-2.0-flash");
        assert_eq!(request.model_hint.as_deref(), Some("gemini-2.0-flash"));
        assert_eq!(
            Completion::Structured(json!({ "a": 1 })).into_structured().unwrap(),
            json!({ "a": 1 })
        );
    }
}
