//! LLM Client Abstraction
//!
//! A `ChatBackend` sends one chat-completion request and hands back the raw
//! JSON payload. Interpreting that payload is the caller's job, so a
//! non-conforming upstream reply is still visible to it.
//!
//! `GroqClient` talks to the Groq OpenAI-compatible endpoint;
//! `FakeChatBackend` returns canned payloads for tests.

use crate::config::GroqConfig;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Mutex;
use std::time::Duration;
use tracing::{debug, warn};

/// LLM errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum LlmError {
    #[error("GROQ_API_KEY is not configured")]
    MissingApiKey,

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Request timeout after {0} seconds")]
    Timeout(u64),

    #[error("Invalid JSON response: {0}")]
    InvalidJson(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

/// One chat message in OpenAI format
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Generic chat-completion backend
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Send messages, return the response body as JSON whatever its shape
    async fn chat(&self, messages: &[ChatMessage]) -> Result<Value, LlmError>;
}

/// Groq chat-completion client
pub struct GroqClient {
    client: reqwest::Client,
    endpoint: String,
    model: String,
    api_key: Option<String>,
    timeout_secs: u64,
}

impl GroqClient {
    pub fn new(config: &GroqConfig) -> Result<Self, LlmError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| LlmError::Http(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            model: config.model.clone(),
            api_key: config.api_key.clone(),
            timeout_secs: config.timeout_secs,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl ChatBackend for GroqClient {
    async fn chat(&self, messages: &[ChatMessage]) -> Result<Value, LlmError> {
        let api_key = self.api_key.as_deref().ok_or(LlmError::MissingApiKey)?;

        let body = serde_json::json!({
            "model": self.model,
            "messages": messages,
        });

        debug!("Sending {} messages to {} ({})", messages.len(), self.endpoint, self.model);

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    LlmError::Timeout(self.timeout_secs)
                } else {
                    LlmError::Http(format!("Request failed: {}", e))
                }
            })?;

        // Error bodies are JSON too; status is only logged
        let status = response.status();
        if !status.is_success() {
            warn!("Groq returned HTTP {}", status);
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| LlmError::InvalidJson(format!("Failed to parse response: {}", e)))
    }
}

/// Fake chat backend for testing
pub struct FakeChatBackend {
    responses: Mutex<Vec<Result<Value, LlmError>>>,
    call_count: Mutex<usize>,
    last_messages: Mutex<Vec<ChatMessage>>,
}

impl FakeChatBackend {
    /// Create a fake backend with pre-defined responses
    pub fn new(responses: Vec<Result<Value, LlmError>>) -> Self {
        Self {
            responses: Mutex::new(responses),
            call_count: Mutex::new(0),
            last_messages: Mutex::new(Vec::new()),
        }
    }

    /// Always answer with an OpenAI-shaped completion carrying `content`
    pub fn replying(content: &str) -> Self {
        Self::always(serde_json::json!({
            "choices": [{"index": 0, "message": {"role": "assistant", "content": content}}]
        }))
    }

    /// Always return this payload
    pub fn always(payload: Value) -> Self {
        Self::new(vec![Ok(payload)])
    }

    /// Always fail
    pub fn always_error(error: LlmError) -> Self {
        Self::new(vec![Err(error)])
    }

    pub fn call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }

    /// Messages of the most recent call
    pub fn last_messages(&self) -> Vec<ChatMessage> {
        self.last_messages.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatBackend for FakeChatBackend {
    async fn chat(&self, messages: &[ChatMessage]) -> Result<Value, LlmError> {
        *self.call_count.lock().unwrap() += 1;
        *self.last_messages.lock().unwrap() = messages.to_vec();

        let mut responses = self.responses.lock().unwrap();
        match responses.len() {
            0 => Err(LlmError::MalformedResponse("no canned response left".to_string())),
            // Keep returning the same response
            1 => responses[0].clone(),
            _ => responses.remove(0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_serialization() {
        let json = serde_json::to_value(ChatMessage::user("[ENGLISH MODE] hi")).unwrap();
        assert_eq!(json, serde_json::json!({"role": "user", "content": "[ENGLISH MODE] hi"}));
    }

    #[tokio::test]
    async fn test_missing_api_key_fails_before_request() {
        let config = GroqConfig {
            // Unroutable on purpose: the request must never be sent
            endpoint: "http://127.0.0.1:9/never".to_string(),
            ..GroqConfig::default()
        };
        let client = GroqClient::new(&config).unwrap();

        let err = client.chat(&[ChatMessage::user("hi")]).await.unwrap_err();
        assert!(matches!(err, LlmError::MissingApiKey));
    }

    #[tokio::test]
    async fn test_fake_backend_repeats_single_response() {
        let fake = FakeChatBackend::replying("Hello");

        let first = fake.chat(&[ChatMessage::user("a")]).await.unwrap();
        let second = fake.chat(&[ChatMessage::user("b")]).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(fake.call_count(), 2);
        assert_eq!(fake.last_messages(), vec![ChatMessage::user("b")]);
    }

    #[tokio::test]
    async fn test_fake_backend_sequence() {
        let fake = FakeChatBackend::new(vec![
            Ok(serde_json::json!({"n": 1})),
            Err(LlmError::Timeout(60)),
        ]);

        assert_eq!(fake.chat(&[]).await.unwrap()["n"], 1);
        assert!(matches!(fake.chat(&[]).await, Err(LlmError::Timeout(60))));
        assert_eq!(fake.call_count(), 2);
    }
}
