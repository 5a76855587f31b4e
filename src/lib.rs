//! # Duologue
//!
//! Duologue runs a turn-based debate between two independently chosen LLM providers,
//! alternating turns, while letting a human interject at any point.
//!
//! The crate provides carefully layered abstractions for:
//!
//! * **Prompt construction**: [`prompt_builder::build_prompt`] renders topic, numbered
//!   transcript, the speaker's role and optional moderator instructions into one
//!   provider-agnostic prompt.
//! * **Provider adapters**: the [`backend_adapter::BackendAdapter`] trait, implemented for
//!   OpenAI Chat Completions, Anthropic Messages and Google Gemini `generateContent`. Each
//!   adapter speaks its provider's wire protocol and normalizes the reply to plain text.
//! * **Backend registry**: [`registry::BackendRegistry`] maps a key such as `"gemini"` to a
//!   display label, model id, credential variable and adapter.
//! * **Turn orchestration**: [`orchestrator::TurnOrchestrator`] builds the prompt, calls the
//!   right adapter and returns one [`CanonicalReply`], or a typed [`DebateError`], without
//!   mutating any transcript.
//! * **Sessions**: [`DebateSession`] owns the two sides and the [`Transcript`], derives whose
//!   turn it is from transcript parity, and records human interjections.
//! * **HTTP surface** (feature `server`): `POST /api/step` and `GET /api/providers`.
//!
//! ## Getting Started
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use duologue::orchestrator::TurnOrchestrator;
//! use duologue::registry::BackendRegistry;
//! use duologue::{Credentials, DebateConfig, DebateSession};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     duologue::init_logger();
//!
//!     let config = DebateConfig::from_env();
//!     let registry = Arc::new(BackendRegistry::with_defaults(&config));
//!     let orchestrator = TurnOrchestrator::new(registry, Credentials::Environment);
//!
//!     let mut session = DebateSession::new("openai", "anthropic", "Is a hot dog a sandwich?");
//!     session.start_and_take_turn(&orchestrator).await?;
//!     session.take_turn(&orchestrator).await?;
//!
//!     for entry in session.transcript() {
//!         println!("{}: {}", entry.speaker, entry.text);
//!     }
//!     Ok(())
//! }
//! ```

use std::sync::Once;

static INIT_LOGGER: Once = Once::new();

/// Initialise the global [`env_logger`] subscriber exactly once.
///
/// Applications embedding Duologue can opt in to `RUST_LOG` driven diagnostics without
/// choosing a logging backend up front.
///
/// ```rust
/// duologue::init_logger();
/// log::info!("Logger is ready");
/// ```
pub fn init_logger() {
    INIT_LOGGER.call_once(|| {
        env_logger::init();
    });
}

// Import the top-level `duologue` module.
pub mod duologue;

// Re-exporting key items for easier external access.
pub use duologue::backend_adapter;
pub use duologue::backend_adapter::BackendAdapter;
pub use duologue::clients;
pub use duologue::config;
pub use duologue::config::{Credentials, DebateConfig, SamplingParams};
pub use duologue::error::DebateError;
pub use duologue::event;
pub use duologue::event::{EventHandler, TurnEvent};
pub use duologue::http_client_pool;
pub use duologue::orchestrator;
pub use duologue::orchestrator::{StepRequest, TurnOrchestrator};
pub use duologue::prompt_builder;
pub use duologue::registry;
pub use duologue::registry::{BackendIdentity, BackendRegistry, ProviderInfo, RegisteredBackend};
#[cfg(feature = "server")]
pub use duologue::server;
pub use duologue::session;
pub use duologue::session::{DebateSession, PendingTurn, SessionState, Side};
pub use duologue::transcript::{CanonicalReply, Transcript, TranscriptEntry, HUMAN_SPEAKER};
