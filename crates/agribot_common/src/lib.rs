//! AgriBot Common - shared types for the AgriBot daemon.
//!
//! Knowledge base model and lookup, answer types, language handling and the
//! interaction log. Everything here is free of network calls.

pub mod answer;
pub mod error;
pub mod interaction_log;
pub mod knowledge;
pub mod language;
pub mod matcher;

pub use answer::{AnswerResult, RoutedAnswer, Source};
pub use error::AgriError;
pub use interaction_log::{InteractionLog, LogEntry};
pub use knowledge::{KnowledgeBase, PlantRecord, QaRecord};
pub use language::Language;
pub use matcher::lookup;

/// Version shared by every AgriBot component
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
