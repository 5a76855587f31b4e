//! Stand-alone HTTP server for the debate control surface.
//!
//! Reads `.env` if present, then `PORT`, `DUOLOGUE_*` settings and the provider keys
//! (`OPENAI_API_KEY`, `ANTHROPIC_API_KEY`, `GEMINI_API_KEY`) from the environment.
//!
//! Run with: cargo run --features server --bin duologue-server

use dotenvy::dotenv;
use std::error::Error;
use std::sync::Arc;

use duologue::orchestrator::TurnOrchestrator;
use duologue::registry::BackendRegistry;
use duologue::{server, Credentials, DebateConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    dotenv().ok();
    duologue::init_logger();

    let config = DebateConfig::from_env();
    let registry = Arc::new(BackendRegistry::with_defaults(&config));
    let orchestrator = Arc::new(TurnOrchestrator::new(registry, Credentials::Environment));

    server::serve(orchestrator, config.socket_addr()).await
}
