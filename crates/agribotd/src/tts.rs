//! Speech synthesis.
//!
//! `GoogleTts` uses the public Google Translate speech endpoint the same way
//! the gTTS client library does: long text is cut into short chunks, each
//! chunk is fetched as MP3 and the frames are concatenated in order.

use crate::config::TtsConfig;
use agribot_common::Language;
use async_trait::async_trait;
use std::sync::Mutex;
use std::time::Duration;
use tracing::{debug, info};

/// Longest chunk the endpoint accepts reliably, in characters
pub const MAX_CHUNK_CHARS: usize = 100;

/// Characters a chunk may end on, kept with the chunk
const SENTENCE_BREAKS: &[char] = &['.', '!', '?', ',', ';', ':', '।', '\n'];

/// TTS errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum TtsError {
    #[error("No text to speak")]
    EmptyText,

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Speech service returned HTTP {0}")]
    Status(u16),

    #[error("Speech service returned no audio")]
    EmptyAudio,
}

/// Two-letter voice code sent to the speech service
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoiceCode {
    En,
    Hi,
}

impl VoiceCode {
    /// Hindi gets the Hindi voice, everything else English
    pub fn for_language(language: &Language) -> Self {
        if language.is_hindi() {
            VoiceCode::Hi
        } else {
            VoiceCode::En
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            VoiceCode::En => "en",
            VoiceCode::Hi => "hi",
        }
    }
}

/// Text to MPEG audio
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    async fn synthesize(&self, text: &str, language: &Language) -> Result<Vec<u8>, TtsError>;
}

/// Split text into chunks of at most `max_chars` characters, preferring to
/// cut after punctuation, then at whitespace, then anywhere
pub fn chunk_text(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut chunks = Vec::new();
    let mut rest = text.trim();

    while !rest.is_empty() {
        let limit = match rest.char_indices().nth(max_chars) {
            Some((idx, _)) => idx,
            None => {
                chunks.push(rest.to_string());
                break;
            }
        };
        let window = &rest[..limit];

        let cut = window
            .char_indices()
            .rev()
            .find(|(_, c)| SENTENCE_BREAKS.contains(c))
            .map(|(idx, c)| idx + c.len_utf8())
            .or_else(|| {
                window
                    .char_indices()
                    .rev()
                    .find(|(_, c)| c.is_whitespace())
                    .map(|(idx, _)| idx)
            })
            .filter(|&idx| idx > 0)
            .unwrap_or(limit);

        let (head, tail) = rest.split_at(cut);
        let head = head.trim();
        if !head.is_empty() {
            chunks.push(head.to_string());
        }
        rest = tail.trim_start();
    }

    chunks
}

/// Google Translate speech client
pub struct GoogleTts {
    client: reqwest::Client,
    endpoint: String,
}

impl GoogleTts {
    pub fn new(config: &TtsConfig) -> Result<Self, TtsError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent("Mozilla/5.0 (X11; Linux x86_64) agribotd")
            .build()
            .map_err(|e| TtsError::Http(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
        })
    }

    async fn fetch_chunk(
        &self,
        chunk: &str,
        voice: VoiceCode,
        idx: usize,
        total: usize,
    ) -> Result<Vec<u8>, TtsError> {
        let params = [
            ("ie", "UTF-8".to_string()),
            ("client", "tw-ob".to_string()),
            ("tl", voice.as_str().to_string()),
            ("q", chunk.to_string()),
            ("total", total.to_string()),
            ("idx", idx.to_string()),
            ("textlen", chunk.chars().count().to_string()),
        ];

        let response = self
            .client
            .get(&self.endpoint)
            .query(&params)
            .send()
            .await
            .map_err(|e| TtsError::Http(format!("Request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TtsError::Status(status.as_u16()));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| TtsError::Http(format!("Failed to read audio: {}", e)))?;
        Ok(bytes.to_vec())
    }
}

#[async_trait]
impl SpeechSynthesizer for GoogleTts {
    async fn synthesize(&self, text: &str, language: &Language) -> Result<Vec<u8>, TtsError> {
        let chunks = chunk_text(text, MAX_CHUNK_CHARS);
        if chunks.is_empty() {
            return Err(TtsError::EmptyText);
        }

        let voice = VoiceCode::for_language(language);
        let total = chunks.len();
        let mut audio = Vec::new();

        for (idx, chunk) in chunks.iter().enumerate() {
            debug!("[TTS]  chunk {}/{} ({} chars)", idx + 1, total, chunk.chars().count());
            audio.extend(self.fetch_chunk(chunk, voice, idx, total).await?);
        }

        if audio.is_empty() {
            return Err(TtsError::EmptyAudio);
        }

        info!("[TTS]  {} bytes of {} audio from {} chunks", audio.len(), voice.as_str(), total);
        Ok(audio)
    }
}

/// Fake synthesizer for testing
pub struct FakeSpeechSynthesizer {
    response: Result<Vec<u8>, TtsError>,
    call_count: Mutex<usize>,
    last_request: Mutex<Option<(String, VoiceCode)>>,
}

impl FakeSpeechSynthesizer {
    /// Always return these bytes
    pub fn returning(audio: &[u8]) -> Self {
        Self::with_response(Ok(audio.to_vec()))
    }

    /// Always fail
    pub fn failing(error: TtsError) -> Self {
        Self::with_response(Err(error))
    }

    fn with_response(response: Result<Vec<u8>, TtsError>) -> Self {
        Self {
            response,
            call_count: Mutex::new(0),
            last_request: Mutex::new(None),
        }
    }

    pub fn call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }

    /// Text and voice of the most recent call
    pub fn last_request(&self) -> Option<(String, VoiceCode)> {
        self.last_request.lock().unwrap().clone()
    }
}

#[async_trait]
impl SpeechSynthesizer for FakeSpeechSynthesizer {
    async fn synthesize(&self, text: &str, language: &Language) -> Result<Vec<u8>, TtsError> {
        if text.trim().is_empty() {
            return Err(TtsError::EmptyText);
        }
        *self.call_count.lock().unwrap() += 1;
        *self.last_request.lock().unwrap() =
            Some((text.to_string(), VoiceCode::for_language(language)));
        self.response.clone()
    }
}
