//! HTTP server for agribotd

use crate::config::Config;
use crate::fallback::AiFallback;
use crate::llm_client::GroqClient;
use crate::routes;
use crate::tts::{GoogleTts, SpeechSynthesizer};
use agribot_common::{InteractionLog, KnowledgeBase};
use anyhow::{Context, Result};
use axum::Router;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

/// Application state shared across handlers
pub struct AppState {
    /// Read-only for the life of the process
    pub knowledge: Arc<KnowledgeBase>,
    pub fallback: AiFallback,
    pub speech: Arc<dyn SpeechSynthesizer>,
    pub log: InteractionLog,
    pub static_dir: PathBuf,
    pub start_time: Instant,
}

impl AppState {
    pub fn new(
        knowledge: KnowledgeBase,
        fallback: AiFallback,
        speech: Arc<dyn SpeechSynthesizer>,
        log: InteractionLog,
        static_dir: PathBuf,
    ) -> Self {
        Self {
            knowledge: Arc::new(knowledge),
            fallback,
            speech,
            log,
            static_dir,
            start_time: Instant::now(),
        }
    }
}

/// Build the router: API routes plus the landing page and its assets
pub fn router(state: Arc<AppState>) -> Router {
    let index = ServeFile::new(state.static_dir.join("index.html"));
    let assets = ServeDir::new(&state.static_dir);

    Router::new()
        .merge(routes::chat_routes())
        .merge(routes::audio_routes())
        .merge(routes::health_routes())
        .route_service("/", index)
        .nest_service("/static", assets)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Run the HTTP server until Ctrl-C
pub async fn run(config: Config) -> Result<()> {
    let knowledge = KnowledgeBase::load(&config.knowledge.path)
        .context("Failed to load knowledge base")?;

    if config.groq.api_key.is_none() {
        warn!("GROQ_API_KEY is not set; questions outside the knowledge base will return an error");
    }
    let backend = GroqClient::new(&config.groq)?;
    info!("  Fallback model: {}", backend.model());
    let fallback = AiFallback::new(Arc::new(backend));

    let speech = GoogleTts::new(&config.tts)?;
    let log = InteractionLog::spawn(&config.log.path);
    info!("  Logging interactions to {}", log.path().display());

    let state = AppState::new(
        knowledge,
        fallback,
        Arc::new(speech),
        log.clone(),
        config.server.static_dir.clone(),
    );
    let app = router(Arc::new(state));

    let listener = tokio::net::TcpListener::bind(&config.server.bind)
        .await
        .with_context(|| format!("Failed to bind {}", config.server.bind))?;
    info!("  Listening on http://{}", config.server.bind);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!("Failed to listen for Ctrl-C: {}", e);
                std::future::pending::<()>().await;
            }
            info!("Shutting down gracefully");
        })
        .await?;

    if let Err(e) = log.flush().await {
        warn!("Interaction log not flushed: {}", e);
    }
    Ok(())
}
