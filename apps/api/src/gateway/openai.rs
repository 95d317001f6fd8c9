//! OpenAI backend — chat-completions envelope with bearer auth.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{build_http_client, status_to_error, BackendError, BackendId, TextBackend};

const OPENAI_API_URL: &str = "https://api.openai.com/v1/chat/completions";
const OPENAI_MODEL: &str = "gpt-4.1-2025-04-14";
const MAX_TOKENS: u32 = 2000;

pub const OPENAI: BackendId = BackendId::new("openai");

/// Chat-completions request body. Mistral's endpoint is API-compatible, so
/// `mistral.rs` reuses these envelope types.
#[derive(Debug, Serialize)]
pub(super) struct ChatRequest<'a> {
    pub(super) model: &'a str,
    pub(super) messages: Vec<ChatMessage<'a>>,
    pub(super) max_tokens: u32,
    pub(super) temperature: f64,
}

#[derive(Debug, Serialize)]
pub(super) struct ChatMessage<'a> {
    pub(super) role: &'a str,
    pub(super) content: &'a str,
}

#[derive(Debug, Deserialize)]
pub(super) struct ChatResponse {
    #[serde(default)]
    pub(super) choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
pub(super) struct ChatChoice {
    pub(super) message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
pub(super) struct ChatResponseMessage {
    pub(super) content: Option<String>,
}

/// Pulls the generated text out of a chat-completions response.
pub(super) fn extract_chat_text(response: ChatResponse) -> Result<String, BackendError> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .ok_or_else(|| BackendError::MalformedResponse("no generated text in choices".to_string()))
}

pub struct OpenAiBackend {
    client: Client,
    api_key: String,
}

impl OpenAiBackend {
    pub fn new(api_key: String) -> Self {
        Self {
            client: build_http_client(),
            api_key,
        }
    }
}

#[async_trait]
impl TextBackend for OpenAiBackend {
    fn id(&self) -> BackendId {
        OPENAI
    }

    async fn generate(&self, prompt: &str) -> Result<String, BackendError> {
        let body = ChatRequest {
            model: OPENAI_MODEL,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            max_tokens: MAX_TOKENS,
            temperature: 0.7,
        };

        let response = self
            .client
            .post(OPENAI_API_URL)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(status_to_error(status));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| BackendError::MalformedResponse(e.to_string()))?;

        extract_chat_text(parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_envelope_matches_api_shape() {
        let body = ChatRequest {
            model: OPENAI_MODEL,
            messages: vec![ChatMessage {
                role: "user",
                content: "hello",
            }],
            max_tokens: MAX_TOKENS,
            temperature: 0.7,
        };

        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(
            value,
            json!({
                "model": "gpt-4.1-2025-04-14",
                "messages": [{"role": "user", "content": "hello"}],
                "max_tokens": 2000,
                "temperature": 0.7
            })
        );
    }

    #[test]
    fn test_extract_chat_text_from_well_formed_response() {
        let response: ChatResponse = serde_json::from_value(json!({
            "choices": [{"message": {"role": "assistant", "content": "SCORE: 80"}}]
        }))
        .unwrap();

        assert_eq!(extract_chat_text(response).unwrap(), "SCORE: 80");
    }

    #[test]
    fn test_extract_chat_text_empty_choices_is_malformed() {
        let response: ChatResponse = serde_json::from_value(json!({"choices": []})).unwrap();
        let err = extract_chat_text(response).unwrap_err();
        assert!(matches!(err, BackendError::MalformedResponse(_)));
    }

    #[test]
    fn test_extract_chat_text_null_content_is_malformed() {
        let response: ChatResponse = serde_json::from_value(json!({
            "choices": [{"message": {"role": "assistant", "content": null}}]
        }))
        .unwrap();
        let err = extract_chat_text(response).unwrap_err();
        assert!(matches!(err, BackendError::MalformedResponse(_)));
    }
}
