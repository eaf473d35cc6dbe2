//! AI fallback for questions the knowledge base cannot answer.
//!
//! One request per question, no retries, no caching. Every failure is
//! folded into an `AnswerResult` carrying a readable error string, so the
//! chat endpoint always has something to show and speak.

use crate::llm_client::{ChatBackend, ChatMessage, LlmError};
use agribot_common::{AnswerResult, Language, Source};
use serde_json::Value;
use std::sync::Arc;
use tracing::{info, warn};

/// Fixed instruction sent ahead of every question
pub const SYSTEM_PROMPT: &str = "You are a helpful assistant. \
If the user selects English, reply only in English. \
If the user selects Hindi, reply only in Hindi. \
If the user asks for code, return it in clean code blocks using triple backticks.";

/// Answer text when the upstream reply has no `choices`
pub const NO_RESPONSE_ANSWER: &str = "Error: No response from Groq";

pub struct AiFallback {
    backend: Arc<dyn ChatBackend>,
}

impl AiFallback {
    pub fn new(backend: Arc<dyn ChatBackend>) -> Self {
        Self { backend }
    }

    /// System prompt plus the question tagged with its language mode
    pub fn build_messages(question: &str, language: &Language) -> Vec<ChatMessage> {
        vec![
            ChatMessage::system(SYSTEM_PROMPT),
            ChatMessage::user(format!("{} {}", language.mode_tag(), question)),
        ]
    }

    /// Ask the model. The reply is placed by requested language; its actual
    /// language is never checked.
    pub async fn ask(&self, question: &str, language: &Language) -> AnswerResult {
        let messages = Self::build_messages(question, language);

        let result = self
            .backend
            .chat(&messages)
            .await
            .and_then(|payload| interpret(&payload, language));

        match result {
            Ok(answer) => {
                info!("[AI]  Answered via {} ({})", answer.source.as_str(), language);
                answer
            }
            Err(e) => {
                warn!("[AI]  Groq API error: {}", e);
                AnswerResult::error(format!("Groq API error: {}", e), Source::Error)
            }
        }
    }
}

/// Turn a chat-completion payload into an answer
fn interpret(payload: &Value, language: &Language) -> Result<AnswerResult, LlmError> {
    if payload.get("choices").is_none() {
        return Ok(AnswerResult::error(NO_RESPONSE_ANSWER, Source::Groq));
    }

    let content = payload
        .pointer("/choices/0/message/content")
        .and_then(Value::as_str)
        .ok_or_else(|| {
            LlmError::MalformedResponse("no message content in first choice".to_string())
        })?;

    Ok(AnswerResult::from_model(content.to_string(), language))
}
