// src/duologue/mod.rs

pub mod backend_adapter;
pub mod clients;
pub mod config;
pub mod error;
pub mod event;
pub mod http_client_pool;
pub mod orchestrator;
pub mod prompt_builder;
pub mod registry;
#[cfg(feature = "server")]
pub mod server;
pub mod session;
pub mod transcript;

// Let's explicitly export DebateSession so we don't have to access it via
// duologue::session::DebateSession and instead as duologue::DebateSession
pub use session::DebateSession;
pub use transcript::{CanonicalReply, Transcript, TranscriptEntry};
