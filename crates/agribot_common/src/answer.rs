//! Answer types returned by the lookup and fallback paths.

use crate::language::Language;
use serde::{Deserialize, Serialize};

/// Where an answer came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    /// Static knowledge base
    Json,
    /// Remote model
    Groq,
    /// Something failed on the way to the model
    Error,
}

impl Source {
    pub fn as_str(&self) -> &'static str {
        match self {
            Source::Json => "json",
            Source::Groq => "groq",
            Source::Error => "error",
        }
    }
}

/// Answer in one or both languages
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerResult {
    pub answer: Option<String>,
    pub hindi_answer: Option<String>,
    pub source: Source,
}

impl AnswerResult {
    pub fn from_knowledge(answer: String, hindi_answer: Option<String>) -> Self {
        Self {
            answer: Some(answer),
            hindi_answer,
            source: Source::Json,
        }
    }

    /// Model reply, placed in the field matching the requested language
    pub fn from_model(content: String, language: &Language) -> Self {
        if language.is_hindi() {
            Self {
                answer: None,
                hindi_answer: Some(content),
                source: Source::Groq,
            }
        } else {
            Self {
                answer: Some(content),
                hindi_answer: None,
                source: Source::Groq,
            }
        }
    }

    /// Error text surfaced to the user in place of an answer
    pub fn error(message: impl Into<String>, source: Source) -> Self {
        Self {
            answer: Some(message.into()),
            hindi_answer: None,
            source,
        }
    }

    /// Text to read aloud: the Hindi answer for Hindi, the English one otherwise
    pub fn speak_text(&self, language: &Language) -> Option<&str> {
        if language.is_hindi() {
            self.hindi_answer.as_deref()
        } else {
            self.answer.as_deref()
        }
    }

    /// English answer, or the Hindi one when the English text is empty or missing
    pub fn primary_text(&self) -> Option<&str> {
        match self.answer.as_deref() {
            Some(text) if !text.is_empty() => Some(text),
            _ => self.hindi_answer.as_deref(),
        }
    }
}

/// Answer plus the link the client uses to fetch its audio
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutedAnswer {
    #[serde(flatten)]
    pub result: AnswerResult,
    pub audio_url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Source::Json).unwrap(), "\"json\"");
        assert_eq!(serde_json::to_string(&Source::Groq).unwrap(), "\"groq\"");
        assert_eq!(serde_json::to_string(&Source::Error).unwrap(), "\"error\"");
    }

    #[test]
    fn test_model_answer_gated_by_language() {
        let hindi = AnswerResult::from_model("नमस्ते".to_string(), &Language::hindi());
        assert_eq!(hindi.answer, None);
        assert_eq!(hindi.hindi_answer.as_deref(), Some("नमस्ते"));

        let english = AnswerResult::from_model("Hello".to_string(), &Language::english());
        assert_eq!(english.answer.as_deref(), Some("Hello"));
        assert_eq!(english.hindi_answer, None);
    }

    #[test]
    fn test_speak_text_follows_language() {
        let result = AnswerResult::from_knowledge("Rice".to_string(), Some("चावल".to_string()));
        assert_eq!(result.speak_text(&Language::english()), Some("Rice"));
        assert_eq!(result.speak_text(&Language::hindi()), Some("चावल"));
        assert_eq!(result.speak_text(&Language::from_request(Some("tamil"))), Some("Rice"));
    }

    #[test]
    fn test_primary_text_prefers_non_empty_english() {
        let both = AnswerResult::from_knowledge("Rice".to_string(), Some("चावल".to_string()));
        assert_eq!(both.primary_text(), Some("Rice"));

        let empty_english = AnswerResult::from_knowledge(String::new(), Some("चावल".to_string()));
        assert_eq!(empty_english.primary_text(), Some("चावल"));

        let nothing = AnswerResult::from_knowledge(String::new(), None);
        assert_eq!(nothing.primary_text(), None);
    }

    #[test]
    fn test_routed_answer_is_flat() {
        let routed = RoutedAnswer {
            result: AnswerResult::error("boom", Source::Error),
            audio_url: "/api/audio?text=boom&lang=english".to_string(),
        };
        let json = serde_json::to_value(&routed).unwrap();
        assert_eq!(json["answer"], "boom");
        assert!(json["hindi_answer"].is_null());
        assert_eq!(json["source"], "error");
        assert_eq!(json["audio_url"], "/api/audio?text=boom&lang=english");
    }
}
