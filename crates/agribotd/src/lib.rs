//! AgriBot daemon library - exposes modules for testing.

pub mod config;
pub mod fallback;
pub mod llm_client;
pub mod routes;
pub mod server;
pub mod tts;
