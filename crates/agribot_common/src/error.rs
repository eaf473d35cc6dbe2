//! Error types for AgriBot.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AgriError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Knowledge base at {path} is malformed: {source}")]
    KnowledgeParse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Interaction log writer has stopped")]
    LogChannelClosed,
}
