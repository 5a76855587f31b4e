//! Turn event system.
//!
//! Implement [`EventHandler`] to observe the orchestrator: when a turn is dispatched to a
//! backend, when it completes and when it fails. The handler is shared as
//! `Arc<dyn EventHandler>` and registered with
//! [`TurnOrchestrator::with_event_handler`](crate::orchestrator::TurnOrchestrator::with_event_handler).
//!
//! # Example
//!
//! ```rust,no_run
//! use duologue::event::{EventHandler, TurnEvent};
//! use async_trait::async_trait;
//!
//! struct PrintHandler;
//!
//! #[async_trait]
//! impl EventHandler for PrintHandler {
//!     async fn on_turn_event(&self, event: &TurnEvent) {
//!         match event {
//!             TurnEvent::TurnCompleted { speaker, response_length, .. } => {
//!                 println!("{} answered ({} chars)", speaker, response_length);
//!             }
//!             other => println!("{:?}", other),
//!         }
//!     }
//! }
//! ```

use async_trait::async_trait;

/// Events emitted by the [`TurnOrchestrator`](crate::orchestrator::TurnOrchestrator).
#[derive(Debug, Clone, PartialEq)]
pub enum TurnEvent {
    /// The prompt was built and the backend is about to be called.
    TurnStarted {
        backend: String,
        speaker: String,
        /// Number of transcript entries the prompt was built from.
        transcript_len: usize,
    },
    /// The backend answered and the reply was normalized.
    TurnCompleted {
        backend: String,
        speaker: String,
        response_length: usize,
    },
    /// The turn failed; nothing was produced.
    TurnFailed { backend: String, error: String },
}

#[async_trait]
pub trait EventHandler: Send + Sync {
    /// Called for every [`TurnEvent`]. The default implementation is a no-op.
    async fn on_turn_event(&self, _event: &TurnEvent) {}
}
