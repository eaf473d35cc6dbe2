//! AgriBot Daemon - agriculture question answering service
//!
//! Answers from the local knowledge base when it can, asks the model when it
//! cannot, and speaks the answer on request.

use agribot_common::VERSION;
use agribotd::config::Config;
use agribotd::server;
use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("AgriBot Daemon v{} starting", VERSION);

    let config = Config::load();
    server::run(config).await
}
