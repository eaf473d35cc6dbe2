//! Configuration management for agribotd.
//!
//! Loads settings from `$AGRIBOT_CONFIG`, /etc/agribot/config.toml or
//! ./agribot.toml, in that order, or uses defaults. A few values can be
//! overridden from the environment so secrets stay out of files.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use tracing::{info, warn};

/// Environment variable naming an explicit config file
pub const CONFIG_ENV: &str = "AGRIBOT_CONFIG";

/// System config file path
pub const CONFIG_PATH: &str = "/etc/agribot/config.toml";

/// Working-directory config file for fallback
pub const LOCAL_CONFIG_PATH: &str = "agribot.toml";

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Listen address
    #[serde(default = "default_bind")]
    pub bind: String,

    /// Directory holding index.html and the page assets
    #[serde(default = "default_static_dir")]
    pub static_dir: PathBuf,
}

fn default_bind() -> String {
    "0.0.0.0:5000".to_string()
}

fn default_static_dir() -> PathBuf {
    PathBuf::from("static")
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            static_dir: default_static_dir(),
        }
    }
}

/// Knowledge base location
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnowledgeConfig {
    #[serde(default = "default_knowledge_path")]
    pub path: PathBuf,
}

fn default_knowledge_path() -> PathBuf {
    PathBuf::from("agriculture_knowledge.json")
}

impl Default for KnowledgeConfig {
    fn default() -> Self {
        Self {
            path: default_knowledge_path(),
        }
    }
}

/// Interaction log location
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    #[serde(default = "default_log_path")]
    pub path: PathBuf,
}

fn default_log_path() -> PathBuf {
    PathBuf::from("chat_logs.json")
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            path: default_log_path(),
        }
    }
}

/// Groq chat-completion API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroqConfig {
    #[serde(default = "default_groq_endpoint")]
    pub endpoint: String,

    #[serde(default = "default_groq_model")]
    pub model: String,

    /// Bearer token; `GROQ_API_KEY` wins when set
    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "default_groq_timeout")]
    pub timeout_secs: u64,
}

fn default_groq_endpoint() -> String {
    "https://api.groq.com/openai/v1/chat/completions".to_string()
}

fn default_groq_model() -> String {
    "llama3-8b-8192".to_string()
}

fn default_groq_timeout() -> u64 {
    60
}

impl Default for GroqConfig {
    fn default() -> Self {
        Self {
            endpoint: default_groq_endpoint(),
            model: default_groq_model(),
            api_key: None,
            timeout_secs: default_groq_timeout(),
        }
    }
}

/// Text-to-speech service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TtsConfig {
    #[serde(default = "default_tts_endpoint")]
    pub endpoint: String,

    #[serde(default = "default_tts_timeout")]
    pub timeout_secs: u64,
}

fn default_tts_endpoint() -> String {
    "https://translate.google.com/translate_tts".to_string()
}

fn default_tts_timeout() -> u64 {
    30
}

impl Default for TtsConfig {
    fn default() -> Self {
        Self {
            endpoint: default_tts_endpoint(),
            timeout_secs: default_tts_timeout(),
        }
    }
}

/// Full daemon configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub knowledge: KnowledgeConfig,

    #[serde(default)]
    pub log: LogConfig,

    #[serde(default)]
    pub groq: GroqConfig,

    #[serde(default)]
    pub tts: TtsConfig,
}

impl Config {
    /// Load config from the first readable file, or return defaults,
    /// then apply environment overrides
    pub fn load() -> Self {
        let explicit = std::env::var(CONFIG_ENV).ok();
        let candidates = explicit
            .iter()
            .map(String::as_str)
            .chain([CONFIG_PATH, LOCAL_CONFIG_PATH]);

        let mut config = None;
        for path in candidates {
            match Self::load_from_path(path) {
                Ok(loaded) => {
                    config = Some(loaded);
                    break;
                }
                Err(e) => warn!("Config {} not used: {}", path, e),
            }
        }

        let mut config = config.unwrap_or_else(|| {
            info!("No config file found, using defaults");
            Config::default()
        });
        config.apply_env_overrides(|key| std::env::var(key).ok());
        config
    }

    /// Load config from specific path
    pub fn load_from_path(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        info!("Loaded config from {}", path);
        Ok(config)
    }

    /// Apply `GROQ_API_KEY` and `AGRIBOT_BIND`
    pub fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(key) = lookup("GROQ_API_KEY").filter(|k| !k.trim().is_empty()) {
            self.groq.api_key = Some(key);
        }
        if let Some(bind) = lookup("AGRIBOT_BIND").filter(|b| !b.trim().is_empty()) {
            self.server.bind = bind;
        }
    }
}
