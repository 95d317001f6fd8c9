//! Mistral backend — chat-completions envelope with bearer auth.
//!
//! The endpoint is OpenAI-compatible, so the envelope types live in
//! `openai.rs` and are reused here.

use async_trait::async_trait;
use reqwest::Client;

use super::openai::{extract_chat_text, ChatMessage, ChatRequest, ChatResponse};
use super::{build_http_client, status_to_error, BackendError, BackendId, TextBackend};

const MISTRAL_API_URL: &str = "https://api.mistral.ai/v1/chat/completions";
const MISTRAL_MODEL: &str = "mistral-tiny";
const MAX_TOKENS: u32 = 2000;

pub const MISTRAL: BackendId = BackendId::new("mistral");

pub struct MistralBackend {
    client: Client,
    api_key: String,
}

impl MistralBackend {
    pub fn new(api_key: String) -> Self {
        Self {
            client: build_http_client(),
            api_key,
        }
    }
}

#[async_trait]
impl TextBackend for MistralBackend {
    fn id(&self) -> BackendId {
        MISTRAL
    }

    async fn generate(&self, prompt: &str) -> Result<String, BackendError> {
        let body = ChatRequest {
            model: MISTRAL_MODEL,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            max_tokens: MAX_TOKENS,
            temperature: 0.7,
        };

        let response = self
            .client
            .post(MISTRAL_API_URL)
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
    fn test_request_uses_mistral_model() {
        let body = ChatRequest {
            model: MISTRAL_MODEL,
            messages: vec![ChatMessage {
                role: "user",
                content: "hello",
            }],
            max_tokens: MAX_TOKENS,
            temperature: 0.7,
        };

        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["model"], json!("mistral-tiny"));
        assert_eq!(value["max_tokens"], json!(2000));
    }
}
