//! Request language handling.
//!
//! The service understands two languages, but clients may send anything.
//! Unknown values are kept verbatim: they still show up in the prompt tag
//! and in the audio URL, and are treated as English everywhere else.

use serde::{Deserialize, Serialize};
use std::fmt;

const ENGLISH: &str = "english";
const HINDI: &str = "hindi";

/// Normalized request language (trimmed, lowercased, never empty)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Language(String);

impl Language {
    pub fn english() -> Self {
        Self(ENGLISH.to_string())
    }

    pub fn hindi() -> Self {
        Self(HINDI.to_string())
    }

    /// Normalize an optional raw value; blank or missing means English
    pub fn from_request(raw: Option<&str>) -> Self {
        let normalized = raw.unwrap_or_default().trim().to_lowercase();
        if normalized.is_empty() {
            Self::english()
        } else {
            Self(normalized)
        }
    }

    pub fn is_hindi(&self) -> bool {
        self.0 == HINDI
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Tag prefixed to the user message sent to the model, e.g. `[HINDI MODE]`
    pub fn mode_tag(&self) -> String {
        format!("[{} MODE]", self.0.to_uppercase())
    }
}

impl Default for Language {
    fn default() -> Self {
        Self::english()
    }
}

impl From<String> for Language {
    fn from(raw: String) -> Self {
        Self::from_request(Some(&raw))
    }
}

impl From<Language> for String {
    fn from(language: Language) -> Self {
        language.0
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
