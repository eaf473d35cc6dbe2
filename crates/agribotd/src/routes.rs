//! API routes for agribotd

use crate::server::AppState;
use crate::tts::TtsError;
use agribot_common::{lookup, Language, RoutedAnswer, VERSION};
use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info};

type AppStateArc = Arc<AppState>;

/// JSON error body: `{"error": "..."}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
        .into_response()
}

/// Link the client uses to fetch audio for `speak_text`
pub fn audio_url(speak_text: &str, language: &Language) -> String {
    format!(
        "/api/audio?text={}&lang={}",
        urlencoding::encode(speak_text),
        urlencoding::encode(language.as_str())
    )
}

// ============================================================================
// Chat Routes
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub question: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    pub mode: String,
    pub result: RoutedAnswer,
}

pub fn chat_routes() -> Router<AppStateArc> {
    Router::new().route("/api/chat", post(chat))
}

impl ChatRequest {
    /// Only a JSON object is a request. Anything else reads as `{}`.
    pub fn from_body(body: Option<Value>) -> Self {
        match body {
            Some(body @ Value::Object(_)) => serde_json::from_value(body).unwrap_or_default(),
            _ => Self::default(),
        }
    }
}

/// Knowledge base first, then the model. A missing or unreadable body is
/// treated as an empty request.
async fn chat(State(state): State<AppStateArc>, body: Option<Json<Value>>) -> Response {
    let req = ChatRequest::from_body(body.map(|Json(body)| body));
    let question = req.question.unwrap_or_default().trim().to_string();
    let language = Language::from_request(req.language.as_deref());

    if question.is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "No question provided");
    }

    let start = Instant::now();
    info!("[Q]  {} ({})", question, language);

    let (result, logged_answer) = match lookup(&state.knowledge, &question, &language) {
        Some(hit) => {
            let logged = hit.primary_text().map(str::to_string);
            (hit, logged)
        }
        None => {
            let answer = state.fallback.ask(&question, &language).await;
            let logged = answer.speak_text(&language).map(str::to_string);
            (answer, logged)
        }
    };

    let speak_text = result.speak_text(&language).unwrap_or_default();
    let audio_url = audio_url(speak_text, &language);
    state
        .log
        .log(&question, logged_answer.as_deref(), &language, result.source);

    info!(
        "[A]  Answered from {} in {}ms",
        result.source.as_str(),
        start.elapsed().as_millis()
    );

    Json(ChatResponse {
        mode: "json".to_string(),
        result: RoutedAnswer { result, audio_url },
    })
    .into_response()
}

// ============================================================================
// Audio Routes
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AudioParams {
    pub text: Option<String>,
    pub lang: Option<String>,
}

impl AudioParams {
    /// First occurrence of each key wins
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut params = Self::default();
        for (key, value) in pairs {
            match key.as_str() {
                "text" if params.text.is_none() => params.text = Some(value),
                "lang" if params.lang.is_none() => params.lang = Some(value),
                _ => {}
            }
        }
        params
    }
}

pub fn audio_routes() -> Router<AppStateArc> {
    Router::new().route("/api/audio", get(audio))
}

async fn audio(
    State(state): State<AppStateArc>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Response {
    let params = AudioParams::from_pairs(pairs);
    let text = params.text.unwrap_or_default();
    if text.trim().is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "No text provided");
    }
    let language = Language::from_request(params.lang.as_deref());

    match state.speech.synthesize(&text, &language).await {
        Ok(audio) => (
            [
                (header::CONTENT_TYPE, "audio/mpeg"),
                (header::CONTENT_DISPOSITION, "inline; filename=\"response.mp3\""),
            ],
            audio,
        )
            .into_response(),
        Err(TtsError::EmptyText) => error_response(StatusCode::BAD_REQUEST, "No text provided"),
        Err(e) => {
            error!("[TTS]  Failed: {}", e);
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("TTS failed: {}", e),
            )
        }
    }
}

// ============================================================================
// Health Routes
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub plants: usize,
    pub basic_qa: usize,
}

pub fn health_routes() -> Router<AppStateArc> {
    Router::new().route("/api/health", get(health_check))
}

async fn health_check(State(state): State<AppStateArc>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: VERSION.to_string(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        plants: state.knowledge.plant_count(),
        basic_qa: state.knowledge.qa_count(),
    })
}
